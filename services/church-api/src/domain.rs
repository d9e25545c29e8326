// ドメイン層モジュール
pub mod collection_query;
pub mod event;
pub mod field_resolver;
pub mod multilingual_content;
pub mod opening_hours;
pub mod table_row;

// 再エクスポート
pub use collection_query::{
    map_rows, parse_limit, query_events, query_opening_hours, CollectionResult, EventQuery,
    SkippedRow,
};
pub use event::{default_event_date, generate_row_key, Event, EVENTS_PARTITION_KEY};
pub use field_resolver::{first_present, FieldNames};
pub use multilingual_content::{LanguageSlot, MultilingualContent};
pub use opening_hours::{OpeningHours, OPENING_HOURS_PARTITION_KEY};
pub use table_row::{CellValue, RowDecodeError, StorageMetadata, TableRow};
