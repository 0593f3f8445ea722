//! UI string lookup
//!
//! [`Translations`] maps a menu/label key to display text for one language.
//! Callers own an instance and pass it where strings are needed; switching
//! language means replacing that instance.

use log::debug;
use std::borrow::Cow;

/// Supported UI languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Japanese,
}

impl Language {
    /// Settings tag for this language.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Japanese => "jp",
        }
    }

    /// Parse a settings tag; unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Language> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::English),
            "jp" | "ja" => Some(Language::Japanese),
            _ => None,
        }
    }

    fn table(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Language::English => EN,
            Language::Japanese => JP,
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("File", "File"),
    ("New", "New"),
    ("Open", "Open"),
    ("Save", "Save"),
    ("SaveAs", "Save As..."),
    ("CloseTab", "Close Tab"),
    ("Exit", "Exit"),
    ("Format", "Format"),
    ("FormatJSON", "Format JSON"),
    ("FormatYAML", "Format YAML"),
    ("View", "View"),
    ("RefreshTree", "Refresh Tree"),
    ("LineEndings", "Line Endings"),
    ("Language", "Language"),
    ("English", "English"),
    ("Japanese", "Japanese"),
    ("Untitled", "Untitled"),
];

const JP: &[(&str, &str)] = &[
    ("File", "ファイル"),
    ("New", "新規作成"),
    ("Open", "開く..."),
    ("Save", "保存"),
    ("SaveAs", "名前を付けて保存..."),
    ("CloseTab", "タブを閉じる"),
    ("Exit", "終了"),
    ("Format", "整形"),
    ("FormatJSON", "JSON整形"),
    ("FormatYAML", "YAML整形"),
    ("View", "表示"),
    ("RefreshTree", "ツリー更新"),
    ("LineEndings", "改行コード"),
    ("Language", "言語"),
    ("English", "英語"),
    ("Japanese", "日本語"),
    ("Untitled", "無題"),
];

/// Key to display-string lookup for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Translations {
    language: Language,
}

impl Translations {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Build from a settings tag, falling back to English.
    pub fn from_tag(tag: &str) -> Self {
        let language = Language::from_tag(tag).unwrap_or_else(|| {
            debug!("Unknown language tag {:?}, using English", tag);
            Language::English
        });
        Self::new(language)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Look up `key`.
    ///
    /// Missing entries fall back to English, then to `[key]` so gaps are
    /// visible in the UI.
    pub fn get(&self, key: &str) -> Cow<'static, str> {
        lookup(self.language.table(), key)
            .or_else(|| lookup(EN, key))
            .map(Cow::Borrowed)
            .unwrap_or_else(|| Cow::Owned(format!("[{}]", key)))
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}
