//! Document configuration
//!
//! Loaded from YAML or JSON; every field has a default so partial files work.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Which lines `remove_trailing_spaces` cleans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoveSpaces {
    /// Never strip
    #[default]
    None,
    /// Only lines modified or saved since load
    Modified,
    /// Every line
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Tab width for virtual columns
    pub tab_width: usize,
    /// Static word wrap after each outermost edit session
    pub word_wrap: bool,
    /// Virtual column to wrap at
    pub word_wrap_at: usize,
    pub remove_spaces: RemoveSpaces,
    /// Upper bound on retained history groups, even for locked revisions
    pub max_locked_history: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            word_wrap: false,
            word_wrap_at: 80,
            remove_spaces: RemoveSpaces::None,
            max_locked_history: 10_000,
        }
    }
}

impl DocumentConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a `.yaml`, `.yml` or `.json` file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let content = fs::read_to_string(path)?;
        let config = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&content)?,
            "json" => Self::from_json_str(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        log::info!("loaded document config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tab_width == 0 {
            return Err(ConfigError::InvalidValue("tab_width must be at least 1".into()));
        }
        if self.word_wrap && self.word_wrap_at == 0 {
            return Err(ConfigError::InvalidValue(
                "word_wrap_at must be at least 1 when word_wrap is on".into(),
            ));
        }
        if self.max_locked_history == 0 {
            return Err(ConfigError::InvalidValue(
                "max_locked_history must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = DocumentConfig::from_yaml_str("tab_width: 8\nremove_spaces: all\n").unwrap();
        assert_eq!(config.tab_width, 8);
        assert_eq!(config.remove_spaces, RemoveSpaces::All);
        assert_eq!(config.word_wrap_at, 80);
        assert!(!config.word_wrap);
    }

    #[test]
    fn test_json_config() {
        let config =
            DocumentConfig::from_json_str(r#"{"word_wrap": true, "word_wrap_at": 40}"#).unwrap();
        assert!(config.word_wrap);
        assert_eq!(config.word_wrap_at, 40);
        assert_eq!(config.tab_width, 4);
    }

    #[test]
    fn test_zero_tab_width_is_rejected() {
        let err = DocumentConfig::from_yaml_str("tab_width: 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_load_by_extension() {
        let mut file = Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(b"word_wrap: true\nword_wrap_at: 20\n").unwrap();
        file.flush().unwrap();
        let config = DocumentConfig::load(file.path()).unwrap();
        assert_eq!(config.word_wrap_at, 20);

        let mut other = Builder::new().suffix(".toml").tempfile().unwrap();
        other.write_all(b"tab_width = 2").unwrap();
        other.flush().unwrap();
        assert!(matches!(
            DocumentConfig::load(other.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DocumentConfig::load(Path::new("/nonexistent/editor-config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
