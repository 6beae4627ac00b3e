//! Maru configuration
//!
//! Config file: `--config` path, then `$MARU_CONFIG`, then
//! `~/.config/maru/config.toml`, then built-in defaults.
//! The API key only ever comes from the environment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::error::ConfigError;
use crate::llm_client::LlmConfig;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const CONFIG_ENV: &str = "MARU_CONFIG";

/// Data file settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// TOML file replacing the built-in weather/translation/movie tables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaruConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub data: DataConfig,
}

impl MaruConfig {
    /// Default user config path: ~/.config/maru/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("maru").join("config.toml"))
    }

    /// Load from the first config file that applies, or defaults.
    ///
    /// An explicitly named file must exist; the user config is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load_file(Path::new(&path));
        }
        match Self::user_config_path() {
            Some(path) if path.exists() => Self::load_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: MaruConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::Invalid("llm.timeout_secs must be at least 1".to_string()));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".to_string()));
        }
        let endpoint = &self.llm.endpoint;
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "llm.endpoint must be an http(s) URL, got '{}'",
                endpoint
            )));
        }
        Ok(())
    }

    /// Fill in the API key from the process environment
    pub fn with_api_key_from_env(self) -> Result<Self, ConfigError> {
        self.with_api_key_from(|name| std::env::var(name).ok())
    }

    /// Fill in the API key using `lookup` for environment access.
    ///
    /// A missing or blank key is the one fatal startup condition.
    pub fn with_api_key_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(API_KEY_ENV)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey(API_KEY_ENV))?;
        self.llm.api_key = Some(key);
        Ok(self)
    }

    /// Catalog named by `data.catalog`, or the built-in one
    pub fn load_catalog(&self) -> Result<Arc<Catalog>, ConfigError> {
        let catalog = match &self.data.catalog {
            Some(path) => Catalog::load(path)?,
            None => Catalog::builtin(),
        };
        Ok(Arc::new(catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = MaruConfig::default();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert!(config.data.catalog.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("[llm]\nmodel = \"gpt-4o\"\ntimeout_secs = 5\n");
        let config = MaruConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.timeout_secs, 5);
        assert_eq!(config.llm.endpoint, "https://api.openai.com");
        assert!(config.llm.enabled);
    }

    #[test]
    fn test_api_key_is_not_read_from_file() {
        let file = write_config("[llm]\napi_key = \"sk-file\"\n");
        let config = MaruConfig::load(Some(file.path())).unwrap();
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = write_config("[llm]\ntimeout_secs = 0\n");
        assert!(matches!(
            MaruConfig::load(Some(file.path())),
            Err(ConfigError::Invalid(_))
        ));

        let file = write_config("[llm]\nendpoint = \"ftp://example\"\n");
        assert!(matches!(
            MaruConfig::load(Some(file.path())),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_unparseable_file() {
        let file = write_config("[llm\n");
        assert!(matches!(
            MaruConfig::load(Some(file.path())),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_explicit_file() {
        assert!(matches!(
            MaruConfig::load(Some(Path::new("/nonexistent/maru.toml"))),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_api_key_lookup() {
        let config = MaruConfig::default()
            .with_api_key_from(|name| (name == API_KEY_ENV).then(|| " sk-test ".to_string()))
            .unwrap();
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));

        let err = MaruConfig::default().with_api_key_from(|_| None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey(API_KEY_ENV)));

        let err = MaruConfig::default()
            .with_api_key_from(|_| Some("   ".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey(_)));
    }

    #[test]
    fn test_catalog_selection() {
        let config = MaruConfig::default();
        assert_eq!(*config.load_catalog().unwrap(), Catalog::builtin());

        let data = write_config("[weather]\n\"Oslo\" = \"snow\"\n");
        let file = write_config(&format!("[data]\ncatalog = {:?}\n", data.path()));
        let config = MaruConfig::load(Some(file.path())).unwrap();
        let catalog = config.load_catalog().unwrap();
        assert_eq!(catalog.weather("Oslo"), Some("snow"));
        assert!(catalog.movies.is_empty());
    }
}
