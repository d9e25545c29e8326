// アプリケーション層モジュール
pub mod api_error;
pub mod events_handler;
pub mod opening_hours_handler;
pub mod resource_view;
pub mod router;

// 再エクスポート
pub use api_error::{ApiError, ApiErrorBody, INTERNAL_ERROR_MESSAGE};
pub use events_handler::{get_event, list_events, missing_event_id, EventListParams};
pub use opening_hours_handler::{get_opening_hours, list_opening_hours, missing_day_of_week};
pub use resource_view::{EventView, LocalizedText, OpeningHoursView};
pub use router::{create_router, system_now, AppState, Clock, LangParams};
