// インフラストラクチャ層モジュール
pub mod config;
pub mod dynamo_table_repository;
pub mod logging;
pub mod table_repository;

// 再エクスポート
pub use config::{ConnectionSettings, TableStoreConfig, TableStoreConfigError};
pub use dynamo_table_repository::DynamoTableRepository;
pub use logging::init_logging;
pub use table_repository::{TableRepository, TableStoreError};
