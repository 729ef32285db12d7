use serde::{Deserialize, Serialize};

/// Locale used when a display name has no entry in the table
pub const GENERIC_LOCALE: &str = "en";

/// Languages the reader curates content for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "ru")]
    Russian,
}

impl LanguageCode {
    pub const ALL: [LanguageCode; 10] = [
        LanguageCode::English,
        LanguageCode::Spanish,
        LanguageCode::French,
        LanguageCode::German,
        LanguageCode::Italian,
        LanguageCode::Portuguese,
        LanguageCode::Japanese,
        LanguageCode::Chinese,
        LanguageCode::Korean,
        LanguageCode::Russian,
    ];

    /// Get the ISO 639-1 code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::English => "en",
            LanguageCode::Spanish => "es",
            LanguageCode::French => "fr",
            LanguageCode::German => "de",
            LanguageCode::Italian => "it",
            LanguageCode::Portuguese => "pt",
            LanguageCode::Japanese => "ja",
            LanguageCode::Chinese => "zh",
            LanguageCode::Korean => "ko",
            LanguageCode::Russian => "ru",
        }
    }

    /// English display name, as shown in the language picker and used in prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageCode::English => "English",
            LanguageCode::Spanish => "Spanish",
            LanguageCode::French => "French",
            LanguageCode::German => "German",
            LanguageCode::Italian => "Italian",
            LanguageCode::Portuguese => "Portuguese",
            LanguageCode::Japanese => "Japanese",
            LanguageCode::Chinese => "Chinese",
            LanguageCode::Korean => "Korean",
            LanguageCode::Russian => "Russian",
        }
    }

    /// Resolve a display name ("Spanish") or ISO code ("es"), case-insensitive
    pub fn from_display_name(name: &str) -> Option<Self> {
        let needle = name.trim();
        Self::ALL.into_iter().find(|code| {
            code.display_name().eq_ignore_ascii_case(needle) || code.as_str().eq_ignore_ascii_case(needle)
        })
    }

    /// Languages written without spaces between words
    pub fn is_cjk(&self) -> bool {
        matches!(
            self,
            LanguageCode::Japanese | LanguageCode::Chinese | LanguageCode::Korean
        )
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LanguageCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_display_name(s).ok_or_else(|| format!("unsupported language: {}", s))
    }
}

/// Map a display language name to the locale the segmenter is keyed by.
/// Unmapped names get the generic locale.
pub fn locale_for_display_name(name: &str) -> &'static str {
    LanguageCode::from_display_name(name)
        .map(|code| code.as_str())
        .unwrap_or(GENERIC_LOCALE)
}
