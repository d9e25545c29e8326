// 教会イベント
//
// イベントリソースと、テーブル行との相互変換（FromRow / ToRow）を定義する。

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::field_resolver::{resolve_multilingual, resolve_timestamp, FieldNames};
use super::multilingual_content::{LanguageSlot, MultilingualContent};
use super::table_row::{CellValue, RowDecodeError, StorageMetadata, TableRow};

/// イベントのパーティションキー（固定値）
pub const EVENTS_PARTITION_KEY: &str = "events";

/// 行キー生成時のタイトルスラッグ最大文字数
pub const ROW_KEY_SLUG_MAX_CHARS: usize = 20;

/// イベント日時が保存されていない行のデフォルト値（0001-01-01T00:00:00）
pub fn default_event_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN)
}

const TITLE: FieldNames = FieldNames::new("Title", &["title"]);
const DESCRIPTION: FieldNames = FieldNames::new("Description", &["description"]);
const LOCATION: FieldNames = FieldNames::new("Location", &["location"]);
const EVENT_DATE: FieldNames = FieldNames::new("EventDate", &["event_date", "eventDate"]);

/// 教会イベント
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub partition_key: String,
    pub row_key: String,
    pub title: MultilingualContent,
    pub description: MultilingualContent,
    pub location: MultilingualContent,
    /// イベント日時（タイムゾーンなし）
    pub event_date: NaiveDateTime,
    /// ストアが付与するメタデータ
    pub metadata: StorageMetadata,
}

impl Event {
    /// 新しいイベントを作成
    ///
    /// `row_key`が未指定の場合は日時とタイトルから生成する（`generate_row_key`）。
    pub fn new(
        title: MultilingualContent,
        description: MultilingualContent,
        location: MultilingualContent,
        event_date: NaiveDateTime,
        row_key: Option<String>,
    ) -> Self {
        let row_key = row_key
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| generate_row_key(event_date, &title.en));

        Self {
            partition_key: EVENTS_PARTITION_KEY.to_string(),
            row_key,
            title,
            description,
            location,
            event_date,
            metadata: StorageMetadata::default(),
        }
    }

    /// テーブル行からイベントを作成
    ///
    /// 欠落フィールドは空文字列・デフォルト日時で補う。
    /// 型不一致や解釈できない日時のみエラーになる。
    pub fn from_row(row: &TableRow) -> Result<Self, RowDecodeError> {
        let event_date =
            resolve_timestamp(row, &EVENT_DATE.candidates())?.unwrap_or_else(default_event_date);

        Ok(Self {
            partition_key: row.partition_key.clone(),
            row_key: row.row_key.clone(),
            title: resolve_multilingual(row, &TITLE)?,
            description: resolve_multilingual(row, &DESCRIPTION)?,
            location: resolve_multilingual(row, &LOCATION)?,
            event_date,
            metadata: row.metadata.clone(),
        })
    }

    /// イベントをテーブル行に変換
    ///
    /// 多言語フィールドは正規名で3スロットすべてを書き込む（空でも書く）。
    /// サフィックスなしの旧フィールドは書かない。
    pub fn to_row(&self) -> TableRow {
        let mut row = TableRow::new(self.partition_key.clone(), self.row_key.clone());

        for (names, content) in [
            (&TITLE, &self.title),
            (&DESCRIPTION, &self.description),
            (&LOCATION, &self.location),
        ] {
            for slot in LanguageSlot::ALL {
                row.cells.insert(
                    names.canonical_suffixed(slot),
                    CellValue::Text(content.slot(slot).to_string()),
                );
            }
        }

        row.cells.insert(
            EVENT_DATE.canonical.to_string(),
            CellValue::Timestamp(self.event_date.and_utc()),
        );
        row.metadata = self.metadata.clone();

        row
    }
}

/// 行キーを生成する
///
/// `yyyyMMddHHmmss` + `_` + タイトルの空白を`_`に置換し20文字に切り詰めたもの。
/// 同一日時・同一タイトル接頭辞のイベントは衝突するが検出しない。
pub fn generate_row_key(event_date: NaiveDateTime, title: &str) -> String {
    let slug: String = title
        .replace(' ', "_")
        .chars()
        .take(ROW_KEY_SLUG_MAX_CHARS)
        .collect();
    format!("{}_{}", event_date.format("%Y%m%d%H%M%S"), slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn naive(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    fn sample_event() -> Event {
        Event::new(
            MultilingualContent::new("Sunday Service", "Sunnuntain jumalanpalvelus", "የእሁድ አገልግሎት"),
            MultilingualContent::new("Weekly service", "Viikoittainen", ""),
            MultilingualContent::new("Main hall", "", ""),
            naive("2025-02-01T12:00:00"),
            None,
        )
    }

    // ==================== 行キー生成 ====================

    #[test]
    fn test_generate_row_key() {
        let key = generate_row_key(naive("2025-02-01T12:00:00"), "Sunday Service");
        assert_eq!(key, "20250201120000_Sunday_Service");
    }

    #[test]
    fn test_generate_row_key_truncates_slug_to_20_chars() {
        let key = generate_row_key(
            naive("2025-02-01T12:00:00"),
            "Annual Parish Meeting and Dinner",
        );
        let slug = key.strip_prefix("20250201120000_").unwrap();
        assert_eq!(slug.chars().count(), 20);
        assert_eq!(slug, "Annual_Parish_Meetin");
    }

    /// 非ASCII文字でも文字単位で切り詰める
    #[test]
    fn test_generate_row_key_truncates_by_chars() {
        let key = generate_row_key(naive("2025-02-01T12:00:00"), &"ä".repeat(30));
        let slug = key.strip_prefix("20250201120000_").unwrap();
        assert_eq!(slug.chars().count(), 20);
    }

    #[test]
    fn test_new_generates_row_key_when_absent() {
        let event = sample_event();
        assert_eq!(event.row_key, "20250201120000_Sunday_Service");
        assert_eq!(event.partition_key, EVENTS_PARTITION_KEY);
    }

    #[test]
    fn test_new_keeps_supplied_row_key() {
        let event = Event::new(
            MultilingualContent::from_plain("Choir"),
            MultilingualContent::default(),
            MultilingualContent::default(),
            naive("2025-03-01T18:00:00"),
            Some("custom-key".to_string()),
        );
        assert_eq!(event.row_key, "custom-key");
    }

    // ==================== FromRow ====================

    #[test]
    fn test_from_row_multilingual_row() {
        let row = TableRow::new(EVENTS_PARTITION_KEY, "rk1")
            .with_text("Title_en", "Mass")
            .with_text("Title_fi", "Messu")
            .with_text("Title_am", "ቅዳሴ")
            .with_text("Title", "Ignored legacy")
            .with_text("Description_en", "Morning mass")
            .with_text("Location_en", "Chapel")
            .with_text("EventDate", "2025-03-01T10:00:00");

        let event = Event::from_row(&row).unwrap();

        assert_eq!(event.row_key, "rk1");
        assert_eq!(event.title, MultilingualContent::new("Mass", "Messu", "ቅዳሴ"));
        assert_eq!(event.description, MultilingualContent::from_plain("Morning mass"));
        assert_eq!(event.location, MultilingualContent::from_plain("Chapel"));
        assert_eq!(event.event_date, naive("2025-03-01T10:00:00"));
    }

    /// 多言語化以前の行（camelCase / 小文字のフィールド名）
    #[test]
    fn test_from_row_legacy_row() {
        let row = TableRow::new("EVENT", "legacy")
            .with_text("title", "Bible study")
            .with_text("description", "Weekly")
            .with_text("location", "Room 2")
            .with_text("eventDate", "2025-01-15T19:00:00Z");

        let event = Event::from_row(&row).unwrap();

        assert_eq!(event.title, MultilingualContent::from_plain("Bible study"));
        assert_eq!(event.description, MultilingualContent::from_plain("Weekly"));
        assert_eq!(event.location, MultilingualContent::from_plain("Room 2"));
        assert_eq!(event.event_date, naive("2025-01-15T19:00:00"));
        assert_eq!(event.partition_key, "EVENT");
    }

    #[test]
    fn test_from_row_missing_fields_degrade_to_defaults() {
        let row = TableRow::new(EVENTS_PARTITION_KEY, "empty");
        let event = Event::from_row(&row).unwrap();

        assert!(event.title.is_empty());
        assert!(event.description.is_empty());
        assert!(event.location.is_empty());
        assert_eq!(event.event_date, default_event_date());
        assert_eq!(event.event_date, naive("0001-01-01T00:00:00"));
    }

    #[test]
    fn test_from_row_malformed_date_fails() {
        let row = TableRow::new(EVENTS_PARTITION_KEY, "bad")
            .with_text("Title_en", "Broken")
            .with_text("EventDate", "sometime soon");
        assert!(matches!(
            Event::from_row(&row),
            Err(RowDecodeError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_from_row_copies_storage_metadata() {
        let mut row = TableRow::new(EVENTS_PARTITION_KEY, "rk");
        row.metadata = StorageMetadata {
            etag: Some("W/\"1\"".to_string()),
            timestamp: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
        };
        let event = Event::from_row(&row).unwrap();
        assert_eq!(event.metadata, row.metadata);
    }

    // ==================== ToRow ====================

    #[test]
    fn test_to_row_writes_all_slots_with_canonical_names() {
        let row = sample_event().to_row();

        for field in ["Title", "Description", "Location"] {
            for suffix in ["en", "fi", "am"] {
                let name = format!("{field}_{suffix}");
                assert!(
                    matches!(row.get(&name), Some(CellValue::Text(_))),
                    "{name} should be written"
                );
            }
            assert!(row.get(field).is_none(), "{field} should not be written");
            assert!(row.get(&field.to_lowercase()).is_none());
        }
        assert_eq!(row.get("Location_fi"), Some(&CellValue::Text(String::new())));
        assert_eq!(
            row.get("EventDate"),
            Some(&CellValue::Timestamp(Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap()))
        );
        assert_eq!(row.partition_key, EVENTS_PARTITION_KEY);
        assert_eq!(row.row_key, "20250201120000_Sunday_Service");
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let mut event = sample_event();
        event.metadata = StorageMetadata {
            etag: Some("etag-1".to_string()),
            timestamp: Some(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()),
        };

        let restored = Event::from_row(&event.to_row()).unwrap();
        assert_eq!(restored, event);
    }

    #[test]
    fn test_round_trip_with_empty_english_title() {
        let event = Event::new(
            MultilingualContent::new("", "Vain suomeksi", ""),
            MultilingualContent::default(),
            MultilingualContent::default(),
            naive("2025-05-05T05:05:05"),
            Some("fi-only".to_string()),
        );
        let restored = Event::from_row(&event.to_row()).unwrap();
        assert_eq!(restored, event);
    }
}
