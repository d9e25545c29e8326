// テーブル行モデル
//
// スキーマレスなテーブルストアの1行を、閉じたセル値の型で表現する。
// ストアの型（DynamoDBのAttributeValue等）への変換はインフラ層が担う。

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;

/// セル値
///
/// テーブル行の1フィールドが取り得る値の型。
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
}

impl CellValue {
    /// エラーメッセージ用の型名
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Text(_) => "text",
            CellValue::Integer(_) => "integer",
            CellValue::Boolean(_) => "boolean",
            CellValue::Timestamp(_) => "timestamp",
        }
    }
}

/// ストアが付与するメタデータ
///
/// 楽観的更新用の同時実行トークンと最終更新日時。
/// ローカルで計算せず、クライアントにも返さない。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageMetadata {
    pub etag: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// テーブル行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    pub partition_key: String,
    pub row_key: String,
    pub cells: HashMap<String, CellValue>,
    pub metadata: StorageMetadata,
}

impl TableRow {
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            ..Default::default()
        }
    }

    /// セルを追加したTableRowを返す（ビルダー形式）
    pub fn with_cell(mut self, name: impl Into<String>, value: CellValue) -> Self {
        self.cells.insert(name.into(), value);
        self
    }

    /// テキストセルを追加したTableRowを返す
    pub fn with_text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_cell(name, CellValue::Text(value.into()))
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.cells.get(name)
    }
}

/// 行からリソースへの変換エラー
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RowDecodeError {
    /// セルの型が期待と異なる
    #[error("Type mismatch for field '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// 日時として解釈できない
    #[error("Invalid timestamp in field '{field}': {value}")]
    InvalidTimestamp { field: String, value: String },
}
