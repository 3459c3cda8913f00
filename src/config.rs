// src/config.rs

//! Configuration file parsing
//!
//! Supports an optional TOML file with the following sections:
//! - [download] - Output directory and overwrite policy
//! - [http] - Headers, timeouts and retry count
//!
//! Lookup order: explicit path, `$SEDOT_CONFIG`, then
//! `<config dir>/sedot/config.toml`. A missing default file is not an
//! error; built-in defaults apply. Command-line flags override file values.

use crate::client::{DEFAULT_ACCEPT_LANGUAGE, DEFAULT_USER_AGENT};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "SEDOT_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SedotConfig {
    #[serde(default)]
    pub download: DownloadSection,

    #[serde(default)]
    pub http: HttpSection,
}

/// Download behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadSection {
    /// Directory videos are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Replace existing files instead of skipping them
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for DownloadSection {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            overwrite: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("downloads")
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSection {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Timeout for page fetches, also used as the connect timeout
    #[serde(default = "default_page_timeout")]
    pub page_timeout_secs: u64,

    /// Optional cap on a whole video transfer, body included
    ///
    /// Unset means no limit; a dead peer is still noticed through TCP
    /// keepalive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_timeout_secs: Option<u64>,

    /// Attempts per request when the connection fails
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            page_timeout_secs: default_page_timeout(),
            download_timeout_secs: None,
            max_retries: default_max_retries(),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_accept_language() -> String {
    DEFAULT_ACCEPT_LANGUAGE.to_string()
}

fn default_page_timeout() -> u64 {
    20
}

fn default_max_retries() -> u32 {
    3
}

impl SedotConfig {
    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: SedotConfig = toml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::parse(&content)
    }

    /// Resolve and load the effective configuration
    ///
    /// An explicit path (flag or environment) must exist; the per-user
    /// default is only read when present.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!("Loading config from {}", path.display());
            return Self::load(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            let path = PathBuf::from(path);
            debug!("Loading config from ${} = {}", CONFIG_ENV, path.display());
            return Self::load(&path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(Error::ConfigError("http.user_agent must not be empty".to_string()));
        }
        if self.http.page_timeout_secs == 0 {
            return Err(Error::ConfigError("http.page_timeout_secs must be greater than 0".to_string()));
        }
        if self.http.download_timeout_secs == Some(0) {
            return Err(Error::ConfigError(
                "http.download_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.download.output_dir.as_os_str().is_empty() {
            return Err(Error::ConfigError("download.output_dir must not be empty".to_string()));
        }
        Ok(())
    }
}

/// `<config dir>/sedot/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sedot").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SedotConfig::default();
        assert_eq!(config.download.output_dir, PathBuf::from("downloads"));
        assert!(!config.download.overwrite);
        assert_eq!(config.http.page_timeout_secs, 20);
        assert_eq!(config.http.max_retries, 3);
        assert!(config.http.user_agent.contains("Mozilla"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = SedotConfig::parse(
            r#"
[download]
output_dir = "/tmp/videos"
"#,
        )
        .unwrap();
        assert_eq!(config.download.output_dir, PathBuf::from("/tmp/videos"));
        assert_eq!(config.http.accept_language, DEFAULT_ACCEPT_LANGUAGE);
    }

    #[test]
    fn test_empty_file_is_valid() {
        assert!(SedotConfig::parse("").is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = SedotConfig::parse("[http]\npage_timeout_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("page_timeout_secs"));
    }

    #[test]
    fn test_transfer_cap_is_opt_in() {
        assert_eq!(SedotConfig::default().http.download_timeout_secs, None);

        let config = SedotConfig::parse("[http]\ndownload_timeout_secs = 900\n").unwrap();
        assert_eq!(config.http.download_timeout_secs, Some(900));

        let err = SedotConfig::parse("[http]\ndownload_timeout_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("download_timeout_secs"));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(matches!(
            SedotConfig::parse("[download\noutput_dir = 1"),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(SedotConfig::discover(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[download]\noverwrite = true\n[http]\nmax_retries = 5\n").unwrap();

        let config = SedotConfig::discover(Some(&path)).unwrap();
        assert!(config.download.overwrite);
        assert_eq!(config.http.max_retries, 5);
    }
}
