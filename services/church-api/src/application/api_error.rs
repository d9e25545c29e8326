//! APIエラーハンドリング
//!
//! すべてのエラーは`{"error": "<message>"}`形式のJSONで返却する。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::infrastructure::TableStoreError;

/// 500応答で返す固定メッセージ（詳細はログにのみ出力）
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// APIエラーレスポンスのボディ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    pub error: String,
}

/// APIエラー
///
/// ステータスコードとJSON形式のエラーボディを含む。
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                error: message.into(),
            },
        }
    }

    /// 400 Bad Requestエラーを作成
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 404 Not Foundエラーを作成
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 500 Internal Server Errorを作成（メッセージは固定）
    pub fn internal_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }

    /// テーブルストアのエラーを変換
    ///
    /// テーブルが存在しない場合は404（`not_found_message`）、それ以外は汎用の500。
    pub fn from_store_error(error: &TableStoreError, not_found_message: &str) -> Self {
        match error {
            TableStoreError::TableNotFound(_) => Self::not_found(not_found_message),
            TableStoreError::ReadError(_) => Self::internal_error(),
        }
    }

    pub fn message(&self) -> &str {
        &self.body.error
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
