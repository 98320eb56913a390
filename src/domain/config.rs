use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{index::PeriodFilter, language::Language};

/// Configuration for building prerequisite trees.
///
/// This struct holds settings that control which courses are considered
/// current and which language node names are displayed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The preferred display language.
    ///
    /// When a course has no name in this language, the other language is
    /// used instead.
    language: Language,

    /// A token identifying the active curriculum periods.
    ///
    /// A course is current if any of its curriculum period IDs contains this
    /// token. For example, `2024` matches `uta-lvv-2024`.
    active_period: String,

    /// Whether courses outside the active period are dropped from the index.
    ///
    /// When `false`, every course in the catalog is listed and resolvable.
    pub filter_periods: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            active_period: default_active_period(),
            filter_periods: true,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))
    }

    /// Returns the preferred display language.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Sets the preferred display language.
    pub const fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Returns the active curriculum period token.
    #[must_use]
    pub fn active_period(&self) -> &str {
        &self.active_period
    }

    /// Sets the active curriculum period token.
    ///
    /// Surrounding whitespace is trimmed.
    pub fn set_active_period(&mut self, period: &str) {
        period.trim().clone_into(&mut self.active_period);
    }

    /// The filter to apply when building the course index.
    ///
    /// An empty period token matches every course, so it is treated the same
    /// as disabled filtering.
    #[must_use]
    pub fn period_filter(&self) -> PeriodFilter {
        if self.filter_periods && !self.active_period.is_empty() {
            PeriodFilter::Containing(self.active_period.clone())
        } else {
            PeriodFilter::All
        }
    }
}

fn default_active_period() -> String {
    "2024".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        language: Language,

        /// Substring matched against curriculum period IDs.
        #[serde(default = "default_active_period")]
        active_period: String,

        #[serde(default = "default_true")]
        filter_periods: bool,
    },
}

const fn default_true() -> bool {
    true
}

impl From<Versions> for super::Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                language,
                active_period,
                filter_periods,
            } => Self {
                language,
                active_period: active_period.trim().to_string(),
                filter_periods,
            },
        }
    }
}

impl From<super::Config> for Versions {
    fn from(config: super::Config) -> Self {
        Self::V1 {
            language: config.language,
            active_period: config.active_period,
            filter_periods: config.filter_periods,
        }
    }
}
