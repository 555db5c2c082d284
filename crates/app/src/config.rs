use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tally_client::endpoint_url;
use tally_editor::Language;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the finance server.
    pub server_url: String,
    /// Path of the categorization endpoint on that server.
    pub endpoint: String,
    pub language: Language,
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            endpoint: "/categorization".to_string(),
            language: Language::En,
            timeout_secs: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "Tally")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, server_url: Option<String>, language: Option<Language>) -> Result<()> {
        if let Some(url) = server_url {
            self.server_url = url;
        }
        if let Some(language) = language {
            self.language = language;
        }
        self.validate()
    }

    pub fn endpoint_url(&self) -> String {
        endpoint_url(&self.server_url, &self.endpoint)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn validate(&self) -> Result<()> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            bail!("server_url must start with http:// or https://, got '{}'", self.server_url);
        }
        if self.timeout_secs == Some(0) {
            bail!("timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.endpoint_url(), "http://localhost:8080/categorization");
        assert!(config.timeout().is_none());
    }

    #[test]
    fn parses_all_keys() {
        let config = Config::from_toml(
            r#"
            server_url = "https://books.example.org/"
            endpoint = "categorization"
            language = "ru"
            timeout_secs = 15
            "#,
        )
        .unwrap();
        assert_eq!(config.language, Language::Ru);
        assert_eq!(config.endpoint_url(), "https://books.example.org/categorization");
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::from_toml("serverUrl = \"http://x\"").is_err());
    }

    #[test]
    fn rejects_unsupported_language() {
        assert!(Config::from_toml("language = \"de\"").is_err());
    }

    #[test]
    fn rejects_non_http_url() {
        assert!(Config::from_toml("server_url = \"localhost:8080\"").is_err());
    }

    #[test]
    fn overrides_take_precedence() {
        let mut config = Config::default();
        config
            .apply_overrides(Some("http://10.0.0.2:9000".into()), Some(Language::Ru))
            .unwrap();
        assert_eq!(config.server_url, "http://10.0.0.2:9000");
        assert_eq!(config.language, Language::Ru);
        assert!(config.apply_overrides(Some("ftp://x".into()), None).is_err());
    }

    #[test]
    fn loads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "language = \"ru\"").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.language, Language::Ru);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
