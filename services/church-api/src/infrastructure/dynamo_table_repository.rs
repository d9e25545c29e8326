/// DynamoDBによるTableRepository実装
///
/// テーブルはハッシュキー`PartitionKey`、レンジキー`RowKey`を持つ。
/// `ETag`と`Timestamp`属性はストアメタデータとして扱い、セルには含めない。
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use tracing::debug;

use super::table_repository::{TableRepository, TableStoreError};
use crate::domain::{CellValue, StorageMetadata, TableRow};

/// パーティションキー属性名
pub const PARTITION_KEY_ATTR: &str = "PartitionKey";
/// 行キー属性名
pub const ROW_KEY_ATTR: &str = "RowKey";
/// 同時実行トークン属性名
pub const ETAG_ATTR: &str = "ETag";
/// 最終更新日時属性名
pub const TIMESTAMP_ATTR: &str = "Timestamp";

/// TableRepositoryのDynamoDB実装
#[derive(Debug, Clone)]
pub struct DynamoTableRepository {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// テーブル名
    table_name: String,
}

impl DynamoTableRepository {
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

/// DynamoDBのアイテムをテーブル行に変換
///
/// `S`はテキスト、整数の`N`は整数（小数は文字列のまま）、`BOOL`は真偽値。
/// それ以外の属性型は読み飛ばす。
pub fn item_to_row(item: HashMap<String, AttributeValue>) -> Result<TableRow, TableStoreError> {
    let mut partition_key = None;
    let mut row_key = None;
    let mut metadata = StorageMetadata::default();
    let mut cells = HashMap::new();

    for (name, value) in item {
        match name.as_str() {
            PARTITION_KEY_ATTR => partition_key = value.as_s().ok().cloned(),
            ROW_KEY_ATTR => row_key = value.as_s().ok().cloned(),
            ETAG_ATTR => metadata.etag = value.as_s().ok().cloned(),
            TIMESTAMP_ATTR => {
                metadata.timestamp = value
                    .as_s()
                    .ok()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|dt| dt.with_timezone(&Utc));
            }
            _ => match attribute_to_cell(value) {
                Some(cell) => {
                    cells.insert(name, cell);
                }
                None => debug!(attribute = %name, "未対応の属性型のため読み飛ばし"),
            },
        }
    }

    let partition_key = partition_key.ok_or_else(|| missing_key(PARTITION_KEY_ATTR))?;
    let row_key = row_key.ok_or_else(|| missing_key(ROW_KEY_ATTR))?;

    Ok(TableRow {
        partition_key,
        row_key,
        cells,
        metadata,
    })
}

fn missing_key(attr: &str) -> TableStoreError {
    TableStoreError::ReadError(format!("Missing key attribute: {}", attr))
}

fn attribute_to_cell(value: AttributeValue) -> Option<CellValue> {
    match value {
        AttributeValue::S(s) => Some(CellValue::Text(s)),
        AttributeValue::N(n) => Some(match n.parse::<i64>() {
            Ok(i) => CellValue::Integer(i),
            Err(_) => CellValue::Text(n),
        }),
        AttributeValue::Bool(b) => Some(CellValue::Boolean(b)),
        _ => None,
    }
}

/// テーブル行をDynamoDBのアイテムに変換
///
/// 日時はRFC 3339文字列で保存する。メタデータはストアが付与するため書き込まない。
pub fn row_to_item(row: &TableRow) -> HashMap<String, AttributeValue> {
    let mut item: HashMap<String, AttributeValue> = row
        .cells
        .iter()
        .map(|(name, cell)| {
            let value = match cell {
                CellValue::Text(s) => AttributeValue::S(s.clone()),
                CellValue::Integer(n) => AttributeValue::N(n.to_string()),
                CellValue::Boolean(b) => AttributeValue::Bool(*b),
                CellValue::Timestamp(dt) => {
                    AttributeValue::S(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                }
            };
            (name.clone(), value)
        })
        .collect();

    item.insert(PARTITION_KEY_ATTR.to_string(), AttributeValue::S(row.partition_key.clone()));
    item.insert(ROW_KEY_ATTR.to_string(), AttributeValue::S(row.row_key.clone()));
    item
}

#[async_trait]
impl TableRepository for DynamoTableRepository {
    async fn list_partition(&self, partition_key: &str) -> Result<Vec<TableRow>, TableStoreError> {
        let mut rows = Vec::new();
        let mut last_evaluated_key = None;

        // ページネーション: LastEvaluatedKeyがある限りクエリを続ける
        loop {
            let mut query_builder = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("#pk = :pk")
                .expression_attribute_names("#pk", PARTITION_KEY_ATTR)
                .expression_attribute_values(":pk", AttributeValue::S(partition_key.to_string()));

            if let Some(key) = last_evaluated_key.take() {
                query_builder = query_builder.set_exclusive_start_key(Some(key));
            }

            let result = query_builder.send().await.map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_resource_not_found_exception() {
                    TableStoreError::TableNotFound(self.table_name.clone())
                } else {
                    TableStoreError::ReadError(service_error.to_string())
                }
            })?;

            for item in result.items.unwrap_or_default() {
                rows.push(item_to_row(item)?);
            }

            match result.last_evaluated_key {
                Some(key) => last_evaluated_key = Some(key),
                None => break,
            }
        }

        debug!(
            table = %self.table_name,
            partition_key = partition_key,
            count = rows.len(),
            "パーティションのクエリ完了"
        );

        Ok(rows)
    }

    async fn get_row(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<TableRow>, TableStoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(PARTITION_KEY_ATTR, AttributeValue::S(partition_key.to_string()))
            .key(ROW_KEY_ATTR, AttributeValue::S(row_key.to_string()))
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_resource_not_found_exception() {
                    TableStoreError::TableNotFound(self.table_name.clone())
                } else {
                    TableStoreError::ReadError(service_error.to_string())
                }
            })?;

        result.item.map(item_to_row).transpose()
    }
}
