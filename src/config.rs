//! Runtime settings.

use crate::aggregate::DEFAULT_MAX_ROWS;
use crate::error::ConfigError;
use crate::intent::Vocabulary;
use crate::normalize::FieldKeys;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default readiness wait for the property database, in milliseconds.
pub const DEFAULT_READY_TIMEOUT_MS: u64 = 20_000;

/// Tunables and keyword tables, loadable from a JSON file. Sections missing
/// from the file keep their built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub max_rows: usize,
    pub ready_timeout_ms: u64,
    pub vocabulary: Vocabulary,
    pub field_keys: FieldKeys,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            ready_timeout_ms: DEFAULT_READY_TIMEOUT_MS,
            vocabulary: Vocabulary::default(),
            field_keys: FieldKeys::default(),
        }
    }
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref).map_err(|source| ConfigError::FileRead {
            path: path_ref.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::InvalidJson {
            path: path_ref.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "max_rows": 10 }"#).unwrap();
        assert_eq!(settings.max_rows, 10);
        assert_eq!(settings.ready_timeout(), Duration::from_secs(20));
        assert_eq!(settings.vocabulary, Vocabulary::default());
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            Settings::load("/nonexistent/bim-settings.json"),
            Err(ConfigError::FileRead { .. })
        ));
    }
}
