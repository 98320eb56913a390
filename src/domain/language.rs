//! Bilingual display text and language selection.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Placeholder returned when no localized variant is available.
pub const MISSING_TEXT: &str = "error";

/// A display language supported by the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Finnish, the primary language of the catalog.
    #[default]
    Fi,
    /// English.
    En,
}

impl Language {
    /// The language tried when the preferred one has no text.
    #[must_use]
    pub const fn fallback(self) -> Self {
        match self {
            Self::Fi => Self::En,
            Self::En => Self::Fi,
        }
    }

    /// The two-letter code of the language.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fi => "fi",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unsupported language code.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unsupported language '{0}': expected 'fi' or 'en'")]
pub struct UnknownLanguage(String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fi" | "finnish" => Ok(Self::Fi),
            "en" | "english" => Ok(Self::En),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

/// A text value with Finnish and English variants, either of which may be
/// missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedString {
    /// Finnish variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fi: Option<String>,
    /// English variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
}

impl LocalizedString {
    /// Creates a value with both variants present.
    pub fn new(fi: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            fi: Some(fi.into()),
            en: Some(en.into()),
        }
    }

    /// Creates a value with only the Finnish variant.
    pub fn finnish(fi: impl Into<String>) -> Self {
        Self {
            fi: Some(fi.into()),
            en: None,
        }
    }

    /// Creates a value with only the English variant.
    pub fn english(en: impl Into<String>) -> Self {
        Self {
            fi: None,
            en: Some(en.into()),
        }
    }

    /// Returns the variant for `language` if it is present and non-empty.
    #[must_use]
    pub fn get(&self, language: Language) -> Option<&str> {
        let variant = match language {
            Language::Fi => self.fi.as_deref(),
            Language::En => self.en.as_deref(),
        };
        variant.filter(|text| !text.is_empty())
    }

    /// Returns the preferred variant, falling back to the other language.
    #[must_use]
    pub fn preferred(&self, language: Language) -> Option<&str> {
        self.get(language).or_else(|| self.get(language.fallback()))
    }
}

/// Selects display text for `language`, returning [`MISSING_TEXT`] when
/// neither variant is usable.
#[must_use]
pub fn select(text: Option<&LocalizedString>, language: Language) -> &str {
    select_or(text, language, MISSING_TEXT)
}

/// Selects display text for `language`, returning `default` when neither
/// variant is usable.
#[must_use]
pub fn select_or<'a>(
    text: Option<&'a LocalizedString>,
    language: Language,
    default: &'a str,
) -> &'a str {
    text.and_then(|text| text.preferred(language))
        .unwrap_or(default)
}
