//! Board configuration.
//!
//! # Responsibility
//! - Hold store key namespace and export naming settings.
//! - Derive store keys for tabs.
//!
//! # Invariants
//! - Tab keys are `<namespace>_<tab>`; the tab list lives at
//!   `<namespace>_tabs`, which can never collide with a numeric tab key.
//! - `validate()` must pass before a config is used by a board.

use crate::service::board_service::TabId;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_NAMESPACE: &str = "clipboard_data";
pub const DEFAULT_EXPORT_SUFFIX: &str = ".notes.json";
pub const DEFAULT_EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M";

/// Invalid configuration input.
#[derive(Debug)]
pub enum ConfigError {
    /// Config text is not valid JSON of the expected shape.
    Parse(serde_json::Error),
    /// A field that must be non-blank is blank.
    BlankField(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid board config: {err}"),
            Self::BlankField(field) => write!(f, "board config field `{field}` must not be blank"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::BlankField(_) => None,
        }
    }
}

/// Settings for one board instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct BoardConfig {
    /// Prefix of every store key written by the board.
    pub namespace: String,
    /// Suffix appended to export file names.
    pub export_suffix: String,
    /// strftime pattern for default export file names.
    pub export_timestamp_format: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            export_suffix: DEFAULT_EXPORT_SUFFIX.to_string(),
            export_timestamp_format: DEFAULT_EXPORT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl BoardConfig {
    /// Parses a JSON config; omitted fields keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.trim().is_empty() {
            return Err(ConfigError::BlankField("namespace"));
        }
        if self.export_suffix.trim().is_empty() {
            return Err(ConfigError::BlankField("export_suffix"));
        }
        if self.export_timestamp_format.trim().is_empty() {
            return Err(ConfigError::BlankField("export_timestamp_format"));
        }
        Ok(())
    }

    /// Store key holding one tab's encoded snapshot.
    pub fn tab_key(&self, tab: TabId) -> String {
        format!("{}_{tab}", self.namespace)
    }

    /// Store key holding the known tab list.
    pub fn tabs_key(&self) -> String {
        format!("{}_tabs", self.namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardConfig, ConfigError};

    #[test]
    fn default_keys_match_stored_layout() {
        let config = BoardConfig::default();
        assert_eq!(config.tab_key(0), "clipboard_data_0");
        assert_eq!(config.tab_key(12), "clipboard_data_12");
        assert_eq!(config.tabs_key(), "clipboard_data_tabs");
    }

    #[test]
    fn from_json_keeps_defaults_for_missing_fields() {
        let config = BoardConfig::from_json_str(r#"{"namespace": "scratch"}"#).unwrap();
        assert_eq!(config.namespace, "scratch");
        assert_eq!(config.export_suffix, ".notes.json");
    }

    #[test]
    fn blank_namespace_is_rejected() {
        let err = BoardConfig::from_json_str(r#"{"namespace": "  "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::BlankField("namespace")));
    }
}
