// 開館時間
//
// 曜日ごとの開館時間リソースと、テーブル行との相互変換を定義する。

use super::field_resolver::{
    resolve_bool, resolve_integer, resolve_multilingual, resolve_text, FieldNames,
};
use super::multilingual_content::{LanguageSlot, MultilingualContent};
use super::table_row::{CellValue, RowDecodeError, StorageMetadata, TableRow};

/// 開館時間のパーティションキー（固定値）
pub const OPENING_HOURS_PARTITION_KEY: &str = "openinghours";

const DAY_NAME: FieldNames = FieldNames::new("DayName", &["day_name", "dayName"]);
const DAY_OF_WEEK: FieldNames = FieldNames::new("DayOfWeek", &["day_of_week", "dayOfWeek"]);
const OPEN_TIME: FieldNames = FieldNames::new("OpenTime", &["open_time", "openTime"]);
const CLOSE_TIME: FieldNames = FieldNames::new("CloseTime", &["close_time", "closeTime"]);
const IS_CLOSED: FieldNames = FieldNames::new("IsClosed", &["is_closed", "isClosed"]);

/// 曜日ごとの開館時間
///
/// 行キーは曜日番号の文字列。曜日番号（0が週の初日）と時刻文字列は検証しない。
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningHours {
    pub partition_key: String,
    pub row_key: String,
    pub day_of_week: i64,
    pub day_name: MultilingualContent,
    /// 開館時刻（慣習的に`HH:mm`）
    pub open_time: String,
    /// 閉館時刻（慣習的に`HH:mm`）
    pub close_time: String,
    pub is_closed: bool,
    pub metadata: StorageMetadata,
}

impl OpeningHours {
    pub fn new(
        day_of_week: i64,
        day_name: MultilingualContent,
        open_time: impl Into<String>,
        close_time: impl Into<String>,
        is_closed: bool,
    ) -> Self {
        Self {
            partition_key: OPENING_HOURS_PARTITION_KEY.to_string(),
            row_key: day_of_week.to_string(),
            day_of_week,
            day_name,
            open_time: open_time.into(),
            close_time: close_time.into(),
            is_closed,
            metadata: StorageMetadata::default(),
        }
    }

    /// テーブル行から開館時間を作成
    pub fn from_row(row: &TableRow) -> Result<Self, RowDecodeError> {
        Ok(Self {
            partition_key: row.partition_key.clone(),
            row_key: row.row_key.clone(),
            day_of_week: resolve_integer(row, &DAY_OF_WEEK.candidates())?.unwrap_or(0),
            day_name: resolve_multilingual(row, &DAY_NAME)?,
            open_time: resolve_text(row, &OPEN_TIME.candidates())?.unwrap_or_default(),
            close_time: resolve_text(row, &CLOSE_TIME.candidates())?.unwrap_or_default(),
            is_closed: resolve_bool(row, &IS_CLOSED.candidates())?.unwrap_or(false),
            metadata: row.metadata.clone(),
        })
    }

    /// 開館時間をテーブル行に変換（正規名のみ書き込む）
    pub fn to_row(&self) -> TableRow {
        let mut row = TableRow::new(self.partition_key.clone(), self.row_key.clone())
            .with_cell(DAY_OF_WEEK.canonical, CellValue::Integer(self.day_of_week))
            .with_text(OPEN_TIME.canonical, self.open_time.clone())
            .with_text(CLOSE_TIME.canonical, self.close_time.clone())
            .with_cell(IS_CLOSED.canonical, CellValue::Boolean(self.is_closed));

        for slot in LanguageSlot::ALL {
            row.cells.insert(
                DAY_NAME.canonical_suffixed(slot),
                CellValue::Text(self.day_name.slot(slot).to_string()),
            );
        }
        row.metadata = self.metadata.clone();

        row
    }
}
