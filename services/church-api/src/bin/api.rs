/// 教会API HTTP Lambdaエントリポイント
///
/// Lambda Function URL / API Gateway経由のHTTPリクエストを
/// axumルーターで処理する。
use std::sync::Arc;

use church_api::application::{create_router, AppState};
use church_api::infrastructure::{init_logging, DynamoTableRepository, TableStoreConfig};
use lambda_http::{run, Error};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    info!("教会API Lambda関数を初期化");

    // 接続設定がない場合は起動しない
    let config = TableStoreConfig::from_env().await.map_err(|e| {
        error!(error = %e, "テーブルストア設定の読み込みに失敗");
        e
    })?;

    info!(table_name = %config.table_name(), "テーブルストアに接続");

    let repository =
        DynamoTableRepository::new(config.client().clone(), config.table_name().to_string());
    let app = create_router(AppState::new(Arc::new(repository)));

    run(app).await
}
