// HTTPルーター
//
// Lambda（lambda_http）とローカルサーバーの両方で同じRouterを使う。

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query},
    http::StatusCode,
    routing::get,
    Router,
};
use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::api_error::ApiError;
use super::events_handler::{get_event, list_events, missing_event_id};
use super::opening_hours_handler::{get_opening_hours, list_opening_hours, missing_day_of_week};
use crate::domain::{LanguageSlot, SkippedRow};
use crate::infrastructure::TableRepository;

/// 現在時刻（UTC）を返す関数
pub type Clock = fn() -> NaiveDateTime;

/// システム時計
pub fn system_now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// ハンドラー間で共有する状態
///
/// リポジトリは起動時に1度だけ生成し、全リクエストで共有する。
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn TableRepository>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(repository: Arc<dyn TableRepository>) -> Self {
        Self {
            repository,
            clock: system_now,
        }
    }

    /// 時計を差し替える（テスト用）
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

/// `lang`のみを受け取るクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct LangParams {
    pub lang: Option<String>,
}

/// 解釈できないクエリ文字列はすべて未指定として扱う
pub(crate) fn query_or_default<T: Default>(params: Result<Query<T>, QueryRejection>) -> T {
    match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            warn!(error = %rejection, "クエリ文字列を解釈できないため無視");
            T::default()
        }
    }
}

/// 空の`lang`は指定なしとして扱う
///
/// 未知の言語コードはそのまま渡し、表示時に英語へフォールバックさせる。
pub(crate) fn normalize_lang(lang: Option<&str>) -> Option<&str> {
    let lang = lang.map(str::trim).filter(|code| !code.is_empty())?;
    if LanguageSlot::from_code(lang).is_none() {
        warn!(lang = lang, "未対応の言語コード、英語で返却");
    }
    Some(lang)
}

/// 変換できずに除外した行を警告ログに出力
pub(crate) fn log_skipped_rows(partition_key: &str, skipped: &[SkippedRow]) {
    for row in skipped {
        warn!(
            partition_key = partition_key,
            row_key = %row.row_key,
            error = %row.error,
            "行の変換に失敗したためスキップ"
        );
    }
}

/// 未定義のパス
async fn route_not_found() -> ApiError {
    ApiError::not_found("Not found")
}

/// 定義済みのパスに対する未対応メソッド
async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// ルーターを作成
///
/// エラー応答はすべて`{"error": "<message>"}`形式になる。
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/", get(missing_event_id))
        .route("/events/{id}", get(get_event))
        .route("/openinghours", get(list_opening_hours))
        .route("/openinghours/", get(missing_day_of_week))
        .route("/openinghours/{day_of_week}", get(get_opening_hours))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
