//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `~/.paperspace/config.json`
//! 3. Environment variables: `PAPERSPACE_*` prefix
//! 4. `--apiKey` on the command line (applied by the caller, never stored)
//!
//! The file is only read. Writing credentials is out of scope.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use gradient_core::config::{DEFAULT_API_HOST, DEFAULT_EXPERIMENTS_HOST};
use gradient_core::{ApiConfig, GradientClient};
use serde::Deserialize;
use tracing::debug;

use crate::error::{CliError, CliResult};

const ENV_PREFIX: &str = "PAPERSPACE";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub api_host: String,
    pub experiments_host: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_host: DEFAULT_API_HOST.to_string(),
            experiments_host: DEFAULT_EXPERIMENTS_HOST.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Raw file contents; `None` means "not specified, keep the lower layer".
///
/// Both the camelCase spelling and its lowercased form are accepted since
/// the config crate may normalize key case.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    #[serde(alias = "apiKey", alias = "apikey")]
    pub api_key: Option<String>,
    #[serde(alias = "apiHost", alias = "apihost")]
    pub api_host: Option<String>,
    #[serde(alias = "experimentsHost", alias = "experimentshost")]
    pub experiments_host: Option<String>,
    #[serde(alias = "requestTimeoutSecs", alias = "requesttimeoutsecs")]
    pub request_timeout_secs: Option<u64>,
}

/// Get the path to the config file, if a home directory is known.
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".paperspace").join("config.json"))
}

impl Settings {
    /// Load settings from the config file and the process environment.
    pub fn load() -> CliResult<Self> {
        Self::load_layers(config_file_path().as_deref(), None)
    }

    /// Load settings from `file` (skipped when missing) and environment.
    ///
    /// `env` replaces the process environment when given; tests use it to
    /// stay hermetic.
    pub fn load_layers(
        file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> CliResult<Self> {
        let mut current = Self::default();

        if let Some(path) = file.filter(|path| path.exists()) {
            debug!(path = %path.display(), "loading config file");
            current = current.merge(&load_raw_settings(path)?);
        }

        current.apply_env_overrides(env)?;
        if current.request_timeout_secs == 0 {
            return Err(CliError::Config(
                "request timeout must be at least one second".to_string(),
            ));
        }
        Ok(current)
    }

    /// Overlay wins where it specifies a value.
    fn merge(&self, overlay: &RawSettings) -> Self {
        Self {
            api_key: overlay
                .api_key
                .clone()
                .unwrap_or_else(|| self.api_key.clone()),
            api_host: overlay
                .api_host
                .clone()
                .unwrap_or_else(|| self.api_host.clone()),
            experiments_host: overlay
                .experiments_host
                .clone()
                .unwrap_or_else(|| self.experiments_host.clone()),
            request_timeout_secs: overlay
                .request_timeout_secs
                .unwrap_or(self.request_timeout_secs),
        }
    }

    /// Apply PAPERSPACE_* environment variables as explicit overrides.
    fn apply_env_overrides(
        &mut self,
        env: Option<config::Map<String, String>>,
    ) -> CliResult<()> {
        let config = Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
            .build()?;

        if let Ok(val) = config.get_string("api_key") {
            self.api_key = val;
        }
        if let Ok(val) = config.get_string("api_host") {
            self.api_host = val;
        }
        if let Ok(val) = config.get_string("experiments_host") {
            self.experiments_host = val;
        }
        match config.get::<u64>("request_timeout_secs") {
            Ok(val) => self.request_timeout_secs = val,
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Client carrying the configured hosts and API key.
    pub fn client(&self) -> GradientClient {
        GradientClient::new(
            ApiConfig::new(&self.api_host, &self.experiments_host),
            &self.api_key,
        )
    }
}

/// Load a JSON config file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> CliResult<RawSettings> {
    let raw = Config::builder()
        .add_source(File::from(path).format(FileFormat::Json))
        .build()?
        .try_deserialize()?;
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_without_file_or_env() {
        let settings = Settings::load_layers(None, env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.api_host, "https://api.paperspace.io");
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let settings = Settings::load_layers(Some(&path), env(&[])).unwrap();
        assert_eq!(settings.api_key, "");
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"apiKey": "file_key", "apiHost": "http://localhost:9"}"#).unwrap();

        let settings = Settings::load_layers(Some(&path), env(&[])).unwrap();
        assert_eq!(settings.api_key, "file_key");
        assert_eq!(settings.api_host, "http://localhost:9");
        assert_eq!(settings.experiments_host, DEFAULT_EXPERIMENTS_HOST);
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"apiKey": "file_key"}"#).unwrap();

        let settings = Settings::load_layers(
            Some(&path),
            env(&[
                ("PAPERSPACE_API_KEY", "env_key"),
                ("PAPERSPACE_REQUEST_TIMEOUT_SECS", "5"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.api_key, "env_key");
        assert_eq!(settings.request_timeout_secs, 5);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        let err = Settings::load_layers(Some(&path), env(&[])).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn invalid_timeout_is_config_error() {
        let err = Settings::load_layers(None, env(&[("PAPERSPACE_REQUEST_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn zero_timeout_is_config_error() {
        let err = Settings::load_layers(None, env(&[("PAPERSPACE_REQUEST_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"requestTimeoutSecs": 0}"#).unwrap();
        let err = Settings::load_layers(Some(&path), env(&[])).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn client_uses_configured_key() {
        let settings = Settings {
            api_key: "configured".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.client().headers().api_key(), Some("configured"));
    }
}
