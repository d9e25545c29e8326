// コレクションクエリ
//
// パーティション内の全行をリソースに変換し、絞り込み・ソート・件数制限を行う。
// 変換できない行は結果から除外し、診断情報として別に集める。

use chrono::NaiveDateTime;

use super::event::Event;
use super::opening_hours::OpeningHours;
use super::table_row::{RowDecodeError, TableRow};

/// 変換できずに除外された行
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub row_key: String,
    pub error: RowDecodeError,
}

/// コレクションクエリの結果
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionResult<T> {
    /// 変換に成功したリソース
    pub items: Vec<T>,
    /// 除外された行
    pub skipped: Vec<SkippedRow>,
}

impl<T> Default for CollectionResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// 各行を変換し、成功と失敗を振り分ける
///
/// 1行の失敗でクエリ全体を中断しない。
pub fn map_rows<T, I, F>(rows: I, mapper: F) -> CollectionResult<T>
where
    I: IntoIterator<Item = TableRow>,
    F: Fn(&TableRow) -> Result<T, RowDecodeError>,
{
    rows.into_iter()
        .fold(CollectionResult::default(), |mut acc, row| {
            match mapper(&row) {
                Ok(item) => acc.items.push(item),
                Err(error) => acc.skipped.push(SkippedRow {
                    row_key: row.row_key,
                    error,
                }),
            }
            acc
        })
}

/// イベント一覧のクエリ条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    /// 最大件数（`None`は無制限）
    pub limit: Option<usize>,
    /// 現在以降のイベントのみ
    pub upcoming_only: bool,
}

impl EventQuery {
    /// クエリパラメータから条件を作成
    ///
    /// `limit`は負数や数値以外なら無視（無制限）。
    /// `upcoming`は大文字小文字を区別せず`"true"`の場合のみ有効。
    pub fn from_params(limit: Option<&str>, upcoming: Option<&str>) -> Self {
        Self {
            limit: limit.and_then(parse_limit),
            upcoming_only: upcoming.is_some_and(|value| value.trim().eq_ignore_ascii_case("true")),
        }
    }
}

/// `limit`パラメータを解釈（負数・非数値は`None`）
pub fn parse_limit(value: &str) -> Option<usize> {
    match value.trim().parse::<i64>() {
        Ok(n) if n >= 0 => usize::try_from(n).ok(),
        _ => None,
    }
}

/// イベント一覧を取得
///
/// 変換 → upcoming絞り込み（`event_date >= now`） → 日時昇順の安定ソート → 件数制限。
pub fn query_events<I>(rows: I, query: &EventQuery, now: NaiveDateTime) -> CollectionResult<Event>
where
    I: IntoIterator<Item = TableRow>,
{
    let mut result = map_rows(rows, Event::from_row);

    if query.upcoming_only {
        result.items.retain(|event| event.event_date >= now);
    }

    result.items.sort_by_key(|event| event.event_date);

    if let Some(limit) = query.limit {
        result.items.truncate(limit);
    }

    result
}

/// 開館時間一覧を取得（曜日番号昇順）
pub fn query_opening_hours<I>(rows: I) -> CollectionResult<OpeningHours>
where
    I: IntoIterator<Item = TableRow>,
{
    let mut result = map_rows(rows, OpeningHours::from_row);
    result.items.sort_by_key(|hours| hours.day_of_week);
    result
}
