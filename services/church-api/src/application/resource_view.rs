// レスポンス用のリソース表現
//
// ドメインのリソースをJSON（camelCase）に変換する。
// `lang`指定なしでは多言語オブジェクト、指定ありでは単一言語の文字列で返す。
// ストアメタデータは含めない。

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{Event, MultilingualContent, OpeningHours};

/// テキストフィールドの表現
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LocalizedText {
    /// 単一言語の文字列
    Plain(String),
    /// `{en, fi, am}`オブジェクト
    Multilingual(MultilingualContent),
}

impl LocalizedText {
    /// 言語指定に応じた表現を作成
    pub fn render(content: &MultilingualContent, lang: Option<&str>) -> Self {
        match lang {
            Some(code) => LocalizedText::Plain(content.get_content(Some(code)).to_string()),
            None => LocalizedText::Multilingual(content.clone()),
        }
    }
}

/// イベントのJSON表現
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub location: LocalizedText,
    /// ISO 8601（例: 2025-02-01T12:00:00）
    pub event_date: NaiveDateTime,
    pub partition_key: String,
    pub row_key: String,
}

impl EventView {
    pub fn from_event(event: &Event, lang: Option<&str>) -> Self {
        Self {
            title: LocalizedText::render(&event.title, lang),
            description: LocalizedText::render(&event.description, lang),
            location: LocalizedText::render(&event.location, lang),
            event_date: event.event_date,
            partition_key: event.partition_key.clone(),
            row_key: event.row_key.clone(),
        }
    }
}

/// 開館時間のJSON表現
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHoursView {
    pub day_of_week: i64,
    pub day_name: LocalizedText,
    pub open_time: String,
    pub close_time: String,
    pub is_closed: bool,
    pub partition_key: String,
    pub row_key: String,
}

impl OpeningHoursView {
    pub fn from_opening_hours(hours: &OpeningHours, lang: Option<&str>) -> Self {
        Self {
            day_of_week: hours.day_of_week,
            day_name: LocalizedText::render(&hours.day_name, lang),
            open_time: hours.open_time.clone(),
            close_time: hours.close_time.clone(),
            is_closed: hours.is_closed,
            partition_key: hours.partition_key.clone(),
            row_key: hours.row_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StorageMetadata;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn event() -> Event {
        let mut event = Event::new(
            MultilingualContent::new("Sunday Service", "Jumalanpalvelus", ""),
            MultilingualContent::from_plain("Weekly"),
            MultilingualContent::new("Main hall", "Pääsali", "ዋና አዳራሽ"),
            "2025-02-01T12:00:00".parse().unwrap(),
            None,
        );
        event.metadata = StorageMetadata {
            etag: Some("etag".to_string()),
            timestamp: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
        };
        event
    }

    #[test]
    fn test_event_view_multilingual_json() {
        let json = serde_json::to_value(EventView::from_event(&event(), None)).unwrap();
        assert_eq!(
            json,
            json!({
                "title": {"en": "Sunday Service", "fi": "Jumalanpalvelus", "am": ""},
                "description": {"en": "Weekly", "fi": "", "am": ""},
                "location": {"en": "Main hall", "fi": "Pääsali", "am": "ዋና አዳራሽ"},
                "eventDate": "2025-02-01T12:00:00",
                "partitionKey": "events",
                "rowKey": "20250201120000_Sunday_Service"
            })
        );
    }

    /// 言語指定時は文字列（空スロットは英語にフォールバック）
    #[test]
    fn test_event_view_single_language_json() {
        let json = serde_json::to_value(EventView::from_event(&event(), Some("fi"))).unwrap();
        assert_eq!(json["title"], "Jumalanpalvelus");
        assert_eq!(json["description"], "Weekly");
        assert_eq!(json["location"], "Pääsali");
    }

    #[test]
    fn test_event_view_never_contains_metadata() {
        let json = serde_json::to_value(EventView::from_event(&event(), None)).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 6);
        assert!(!object.contains_key("etag"));
        assert!(!object.contains_key("timestamp"));
    }

    #[test]
    fn test_opening_hours_view_json() {
        let hours = OpeningHours::new(
            1,
            MultilingualContent::new("Monday", "Maanantai", "ሰኞ"),
            "09:00",
            "17:00",
            false,
        );

        let json =
            serde_json::to_value(OpeningHoursView::from_opening_hours(&hours, None)).unwrap();
        assert_eq!(
            json,
            json!({
                "dayOfWeek": 1,
                "dayName": {"en": "Monday", "fi": "Maanantai", "am": "ሰኞ"},
                "openTime": "09:00",
                "closeTime": "17:00",
                "isClosed": false,
                "partitionKey": "openinghours",
                "rowKey": "1"
            })
        );

        let json = serde_json::to_value(OpeningHoursView::from_opening_hours(&hours, Some("am")))
            .unwrap();
        assert_eq!(json["dayName"], "ሰኞ");
    }
}
