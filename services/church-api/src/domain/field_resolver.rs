// フィールド解決
//
// 論理フィールドを複数の候補キー（正規名 → 旧名）で優先順に探し、
// 最初に見つかった空でない値をデコードする。
// 多言語フィールドのサフィックス付き/なしフォールバックもここで扱う。

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use super::multilingual_content::{LanguageSlot, MultilingualContent};
use super::table_row::{CellValue, RowDecodeError, TableRow};

/// 1つの論理フィールドの命名規則
///
/// `canonical`が現行の書き込み名（PascalCase）、`legacy`は旧バージョンが
/// 書き込んでいた名前（snake_case / camelCase）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldNames {
    pub canonical: &'static str,
    pub legacy: &'static [&'static str],
}

impl FieldNames {
    pub const fn new(canonical: &'static str, legacy: &'static [&'static str]) -> Self {
        Self { canonical, legacy }
    }

    /// 候補キー（正規名が先）
    pub fn candidates(&self) -> Vec<String> {
        std::iter::once(self.canonical)
            .chain(self.legacy.iter().copied())
            .map(str::to_string)
            .collect()
    }

    /// 言語サフィックス付きの候補キー
    pub fn suffixed_candidates(&self, slot: LanguageSlot) -> Vec<String> {
        std::iter::once(self.canonical)
            .chain(self.legacy.iter().copied())
            .map(|name| Self::suffixed_name(name, slot))
            .collect()
    }

    /// 正規名にサフィックスを付けたキー（書き込み用）
    pub fn canonical_suffixed(&self, slot: LanguageSlot) -> String {
        Self::suffixed_name(self.canonical, slot)
    }

    fn suffixed_name(name: &str, slot: LanguageSlot) -> String {
        format!("{}_{}", name, slot.suffix())
    }
}

/// 候補キーを優先順に探し、最初にデコードできた値を返す
///
/// `decode`が`Ok(None)`を返した値（空文字列など）は未設定とみなし次の候補へ進む。
/// 型不一致などのデコードエラーはそのまま返す。
pub fn first_present<K, T, F>(
    row: &TableRow,
    candidates: &[K],
    decode: F,
) -> Result<Option<T>, RowDecodeError>
where
    K: AsRef<str>,
    F: Fn(&str, &CellValue) -> Result<Option<T>, RowDecodeError>,
{
    for key in candidates {
        let key = key.as_ref();
        if let Some(value) = row.get(key)
            && let Some(decoded) = decode(key, value)?
        {
            return Ok(Some(decoded));
        }
    }
    Ok(None)
}

fn type_mismatch(field: &str, expected: &'static str, found: &CellValue) -> RowDecodeError {
    RowDecodeError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: found.type_name(),
    }
}

fn decode_text(field: &str, value: &CellValue) -> Result<Option<String>, RowDecodeError> {
    match value {
        CellValue::Text(text) if text.is_empty() => Ok(None),
        CellValue::Text(text) => Ok(Some(text.clone())),
        other => Err(type_mismatch(field, "text", other)),
    }
}

fn decode_integer(field: &str, value: &CellValue) -> Result<Option<i64>, RowDecodeError> {
    match value {
        CellValue::Integer(n) => Ok(Some(*n)),
        other => Err(type_mismatch(field, "integer", other)),
    }
}

fn decode_bool(field: &str, value: &CellValue) -> Result<Option<bool>, RowDecodeError> {
    match value {
        CellValue::Boolean(b) => Ok(Some(*b)),
        other => Err(type_mismatch(field, "boolean", other)),
    }
}

fn decode_timestamp(
    field: &str,
    value: &CellValue,
) -> Result<Option<NaiveDateTime>, RowDecodeError> {
    match value {
        CellValue::Timestamp(dt) => Ok(Some(dt.naive_utc())),
        CellValue::Text(text) if text.trim().is_empty() => Ok(None),
        CellValue::Text(text) => parse_timestamp(text).map(Some).ok_or_else(|| {
            RowDecodeError::InvalidTimestamp {
                field: field.to_string(),
                value: text.clone(),
            }
        }),
        other => Err(type_mismatch(field, "timestamp", other)),
    }
}

/// テキストの日時を解釈する
///
/// RFC 3339（オフセットはUTCに変換）、オフセットなしのISO 8601、
/// 空白区切り、日付のみ（0時）を受け付ける。
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(dt);
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// テキストフィールドを解決（空文字列は未設定扱い）
pub fn resolve_text<K: AsRef<str>>(
    row: &TableRow,
    candidates: &[K],
) -> Result<Option<String>, RowDecodeError> {
    first_present(row, candidates, decode_text)
}

/// 整数フィールドを解決
pub fn resolve_integer<K: AsRef<str>>(
    row: &TableRow,
    candidates: &[K],
) -> Result<Option<i64>, RowDecodeError> {
    first_present(row, candidates, decode_integer)
}

/// 真偽値フィールドを解決
pub fn resolve_bool<K: AsRef<str>>(
    row: &TableRow,
    candidates: &[K],
) -> Result<Option<bool>, RowDecodeError> {
    first_present(row, candidates, decode_bool)
}

/// 日時フィールドを解決（テキストは`parse_timestamp`で解釈）
pub fn resolve_timestamp<K: AsRef<str>>(
    row: &TableRow,
    candidates: &[K],
) -> Result<Option<NaiveDateTime>, RowDecodeError> {
    first_present(row, candidates, decode_timestamp)
}

/// 多言語フィールドを解決
///
/// 各言語について `<名前>_<suffix>` を正規名 → 旧名の順に探す。
/// 英語スロットが空のままなら、サフィックスなしのフィールド（多言語化以前の行）を
/// 英語スロットにだけ読み込む。
pub fn resolve_multilingual(
    row: &TableRow,
    names: &FieldNames,
) -> Result<MultilingualContent, RowDecodeError> {
    let mut content = MultilingualContent::default();

    for slot in LanguageSlot::ALL {
        if let Some(value) = resolve_text(row, &names.suffixed_candidates(slot))? {
            content.set_slot(slot, value);
        }
    }

    if content.en.is_empty()
        && let Some(value) = resolve_text(row, &names.candidates())?
    {
        content.en = value;
    }

    Ok(content)
}
