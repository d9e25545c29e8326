// 開館時間APIハンドラー
//
// GET /openinghours と GET /openinghours/{dayOfWeek} を処理する。

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, warn};

use super::api_error::ApiError;
use super::resource_view::OpeningHoursView;
use super::router::{log_skipped_rows, normalize_lang, query_or_default, AppState, LangParams};
use crate::domain::{query_opening_hours, OpeningHours, OPENING_HOURS_PARTITION_KEY};

/// テーブルが存在しない場合のメッセージ
pub const OPENING_HOURS_TABLE_NOT_FOUND: &str = "Opening hours table not found";

/// 曜日が空の場合のメッセージ
pub const DAY_OF_WEEK_REQUIRED: &str = "Day of week is required";

/// 曜日をパスから取り出せない場合のメッセージ
pub const INVALID_DAY_OF_WEEK: &str = "Invalid day of week";

/// 開館時間一覧エンドポイント (GET /openinghours)
///
/// 曜日番号昇順で返す。変換できない行は除外する。
pub async fn list_opening_hours(
    State(state): State<AppState>,
    params: Result<Query<LangParams>, QueryRejection>,
) -> Response {
    let params = query_or_default(params);
    info!("開館時間一覧リクエストを受信");

    let rows = match state
        .repository
        .list_partition(OPENING_HOURS_PARTITION_KEY)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "開館時間一覧の取得エラー");
            return ApiError::from_store_error(&e, OPENING_HOURS_TABLE_NOT_FOUND).into_response();
        }
    };

    let result = query_opening_hours(rows);
    log_skipped_rows(OPENING_HOURS_PARTITION_KEY, &result.skipped);

    let lang = normalize_lang(params.lang.as_deref());
    let views: Vec<OpeningHoursView> = result
        .items
        .iter()
        .map(|hours| OpeningHoursView::from_opening_hours(hours, lang))
        .collect();

    info!(
        count = views.len(),
        skipped = result.skipped.len(),
        "開館時間一覧を返却"
    );
    Json(views).into_response()
}

/// 曜日別の開館時間取得エンドポイント (GET /openinghours/{dayOfWeek})
///
/// 行キーは曜日番号の文字列。
pub async fn get_opening_hours(
    State(state): State<AppState>,
    day_of_week: Result<Path<String>, PathRejection>,
    params: Result<Query<LangParams>, QueryRejection>,
) -> Response {
    let Path(day_of_week) = match day_of_week {
        Ok(path) => path,
        Err(rejection) => {
            warn!(error = %rejection, "曜日を解釈できない");
            return ApiError::bad_request(INVALID_DAY_OF_WEEK).into_response();
        }
    };
    let params = query_or_default(params);

    if day_of_week.trim().is_empty() {
        return ApiError::bad_request(DAY_OF_WEEK_REQUIRED).into_response();
    }

    info!(day_of_week = %day_of_week, "開館時間取得リクエストを受信");

    match state
        .repository
        .get_row(OPENING_HOURS_PARTITION_KEY, &day_of_week)
        .await
    {
        Ok(Some(row)) => match OpeningHours::from_row(&row) {
            Ok(hours) => {
                let lang = normalize_lang(params.lang.as_deref());
                Json(OpeningHoursView::from_opening_hours(&hours, lang)).into_response()
            }
            Err(e) => {
                error!(day_of_week = %day_of_week, error = %e, "開館時間行の変換エラー");
                ApiError::internal_error().into_response()
            }
        },
        Ok(None) => {
            ApiError::not_found(format!("Opening hours with ID '{}' not found", day_of_week))
                .into_response()
        }
        Err(e) => {
            error!(day_of_week = %day_of_week, error = %e, "開館時間取得エラー");
            ApiError::from_store_error(&e, OPENING_HOURS_TABLE_NOT_FOUND).into_response()
        }
    }
}

/// 曜日なしの開館時間取得 (GET /openinghours/)
pub async fn missing_day_of_week() -> ApiError {
    ApiError::bad_request(DAY_OF_WEEK_REQUIRED)
}
