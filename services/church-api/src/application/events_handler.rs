// イベントAPIハンドラー
//
// GET /events と GET /events/{id} を処理する。

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::api_error::ApiError;
use super::resource_view::EventView;
use super::router::{log_skipped_rows, normalize_lang, query_or_default, AppState, LangParams};
use crate::domain::{query_events, Event, EventQuery, EVENTS_PARTITION_KEY};

/// テーブルが存在しない場合のメッセージ
pub const EVENTS_TABLE_NOT_FOUND: &str = "Events table not found";

/// IDが空の場合のメッセージ
pub const EVENT_ID_REQUIRED: &str = "Event ID is required";

/// IDをパスから取り出せない場合のメッセージ
pub const INVALID_EVENT_ID: &str = "Invalid event ID";

/// GET /events のクエリパラメータ
///
/// 不正な`limit`は無視するため、すべて文字列で受け取る。
/// クエリ文字列自体を解釈できない場合（キーの重複など）はすべて未指定として扱う。
#[derive(Debug, Default, Deserialize)]
pub struct EventListParams {
    pub limit: Option<String>,
    pub upcoming: Option<String>,
    pub lang: Option<String>,
}

/// イベント一覧エンドポイント (GET /events)
///
/// # Returns
/// - 200 OK: 日時昇順のイベント配列（変換できない行は除外）
/// - 404 Not Found: テーブルが存在しない
/// - 500 Internal Server Error: ストアエラー
pub async fn list_events(
    State(state): State<AppState>,
    params: Result<Query<EventListParams>, QueryRejection>,
) -> Response {
    let params = query_or_default(params);
    let query = EventQuery::from_params(params.limit.as_deref(), params.upcoming.as_deref());
    if let Some(limit) = params.limit.as_deref()
        && query.limit.is_none()
    {
        warn!(limit = limit, "limitパラメータが不正なため無視");
    }

    info!(
        limit = ?query.limit,
        upcoming_only = query.upcoming_only,
        "イベント一覧リクエストを受信"
    );

    let rows = match state.repository.list_partition(EVENTS_PARTITION_KEY).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "イベント一覧の取得エラー");
            return ApiError::from_store_error(&e, EVENTS_TABLE_NOT_FOUND).into_response();
        }
    };

    let result = query_events(rows, &query, (state.clock)());
    log_skipped_rows(EVENTS_PARTITION_KEY, &result.skipped);

    let lang = normalize_lang(params.lang.as_deref());
    let views: Vec<EventView> = result
        .items
        .iter()
        .map(|event| EventView::from_event(event, lang))
        .collect();

    info!(
        count = views.len(),
        skipped = result.skipped.len(),
        "イベント一覧を返却"
    );
    Json(views).into_response()
}

/// イベント取得エンドポイント (GET /events/{id})
///
/// # Returns
/// - 200 OK: イベント
/// - 400 Bad Request: IDが空、またはUTF-8として解釈できない
/// - 404 Not Found: 該当行なし、またはテーブルが存在しない
/// - 500 Internal Server Error: ストアエラー、行の変換エラー
pub async fn get_event(
    State(state): State<AppState>,
    event_id: Result<Path<String>, PathRejection>,
    params: Result<Query<LangParams>, QueryRejection>,
) -> Response {
    let Path(event_id) = match event_id {
        Ok(path) => path,
        Err(rejection) => {
            warn!(error = %rejection, "イベントIDを解釈できない");
            return ApiError::bad_request(INVALID_EVENT_ID).into_response();
        }
    };
    let params = query_or_default(params);

    if event_id.trim().is_empty() {
        return ApiError::bad_request(EVENT_ID_REQUIRED).into_response();
    }

    info!(event_id = %event_id, "イベント取得リクエストを受信");

    match state.repository.get_row(EVENTS_PARTITION_KEY, &event_id).await {
        Ok(Some(row)) => match Event::from_row(&row) {
            Ok(event) => {
                let lang = normalize_lang(params.lang.as_deref());
                Json(EventView::from_event(&event, lang)).into_response()
            }
            Err(e) => {
                error!(event_id = %event_id, error = %e, "イベント行の変換エラー");
                ApiError::internal_error().into_response()
            }
        },
        Ok(None) => {
            info!(event_id = %event_id, "イベントが見つからない");
            ApiError::not_found(format!("Event with ID '{}' not found", event_id)).into_response()
        }
        Err(e) => {
            error!(event_id = %event_id, error = %e, "イベント取得エラー");
            ApiError::from_store_error(&e, EVENTS_TABLE_NOT_FOUND).into_response()
        }
    }
}

/// IDなしのイベント取得 (GET /events/)
pub async fn missing_event_id() -> ApiError {
    ApiError::bad_request(EVENT_ID_REQUIRED)
}
