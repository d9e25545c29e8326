// 多言語テキスト
//
// 英語・フィンランド語・アムハラ語の3スロットを持つテキスト値と、
// 言語コードによるスロット選択（英語フォールバック付き）を定義する。

use serde::{Deserialize, Serialize};

/// 多言語スロット
///
/// テーブル行では `<フィールド名>_<suffix>` の形式で保存される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageSlot {
    /// 英語（プライマリ言語）
    En,
    /// フィンランド語
    Fi,
    /// アムハラ語
    Am,
}

impl LanguageSlot {
    /// 全スロット（解決順）
    pub const ALL: [LanguageSlot; 3] = [LanguageSlot::En, LanguageSlot::Fi, LanguageSlot::Am];

    /// 行フィールド名に付与するサフィックス
    pub fn suffix(self) -> &'static str {
        match self {
            LanguageSlot::En => "en",
            LanguageSlot::Fi => "fi",
            LanguageSlot::Am => "am",
        }
    }

    /// 言語コードからスロットを判定（大文字小文字は区別しない）
    ///
    /// 未知のコードは`None`
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(LanguageSlot::En),
            "fi" => Some(LanguageSlot::Fi),
            "am" => Some(LanguageSlot::Am),
            _ => None,
        }
    }
}

/// 3言語分のテキストを保持する値
///
/// 各スロットのデフォルトは空文字列。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultilingualContent {
    pub en: String,
    pub fi: String,
    pub am: String,
}

impl MultilingualContent {
    pub fn new(en: impl Into<String>, fi: impl Into<String>, am: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            fi: fi.into(),
            am: am.into(),
        }
    }

    /// 英語スロットのみを持つ値を作成（単一言語データ用）
    pub fn from_plain(text: impl Into<String>) -> Self {
        Self {
            en: text.into(),
            ..Default::default()
        }
    }

    /// スロットの値を取得
    pub fn slot(&self, slot: LanguageSlot) -> &str {
        match slot {
            LanguageSlot::En => &self.en,
            LanguageSlot::Fi => &self.fi,
            LanguageSlot::Am => &self.am,
        }
    }

    /// スロットに値を設定
    pub fn set_slot(&mut self, slot: LanguageSlot, value: String) {
        match slot {
            LanguageSlot::En => self.en = value,
            LanguageSlot::Fi => self.fi = value,
            LanguageSlot::Am => self.am = value,
        }
    }

    /// 言語コードに対応するテキストを取得
    ///
    /// 要求スロットが空、コードが未知、またはコード未指定の場合は英語スロットを返す。
    pub fn get_content(&self, code: Option<&str>) -> &str {
        match code.and_then(LanguageSlot::from_code) {
            Some(slot) if !self.slot(slot).is_empty() => self.slot(slot),
            _ => &self.en,
        }
    }

    /// 全スロットが空かどうか
    pub fn is_empty(&self) -> bool {
        self.en.is_empty() && self.fi.is_empty() && self.am.is_empty()
    }
}
