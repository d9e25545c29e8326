/// テーブルストア読み取り用リポジトリ
///
/// パーティション単位のクエリと、(パーティションキー, 行キー)によるポイント取得を
/// 抽象化する。実装はDynamoDB（本番）とモック（テスト）。
use async_trait::async_trait;
use thiserror::Error;

use crate::domain::TableRow;

/// テーブルストア操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableStoreError {
    /// テーブルが存在しない
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// ストアからの読み取りに失敗
    #[error("Read error: {0}")]
    ReadError(String),
}

/// テーブル読み取り用トレイト
///
/// 各リクエストは独立しており、実装は共有可変状態を持たない。
#[async_trait]
pub trait TableRepository: Send + Sync {
    /// パーティション内の全行を取得
    ///
    /// パーティション条件はストア側で評価する。返却順は保証しない。
    async fn list_partition(&self, partition_key: &str) -> Result<Vec<TableRow>, TableStoreError>;

    /// 1行を取得
    ///
    /// # 戻り値
    /// * 見つかった場合は`Ok(Some(TableRow))`
    /// * 見つからなかった場合は`Ok(None)`
    /// * 失敗時は`Err(TableStoreError)`
    async fn get_row(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<TableRow>, TableStoreError>;
}
