use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    coordinate::Coordinate,
    error::ValidationError,
    provider::{nws, usno},
};

pub const DEFAULT_USER_AGENT: &str = concat!("stargazer/", env!("CARGO_PKG_VERSION"));

/// Base URLs of the upstream services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub nws: String,
    pub usno: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            nws: nws::DEFAULT_BASE_URL.to_string(),
            usno: usno::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Used when no coordinates are given on the command line,
    /// e.g. "39.7456, -97.0892".
    pub default_location: Option<String>,

    /// api.weather.gov asks for a User-Agent that identifies the caller.
    pub user_agent: Option<String>,

    pub request_timeout_secs: u64,

    /// Example TOML:
    /// [endpoints]
    /// nws = "https://api.weather.gov"
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_location: None,
            user_agent: None,
            request_timeout_secs: 30,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// The configured default location as a parsed coordinate.
    pub fn default_coordinate(&self) -> Result<Coordinate, ValidationError> {
        let raw = self.default_location.as_deref().ok_or(ValidationError::Missing)?;
        Coordinate::parse(raw)
    }

    pub fn set_default_location(&mut self, coordinate: Coordinate) {
        self.default_location =
            Some(format!("{}, {}", coordinate.latitude, coordinate.longitude));
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "stargazer", "stargazer")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_coordinate_errors_when_not_set() {
        let cfg = Config::default();
        assert_eq!(cfg.default_coordinate(), Err(ValidationError::Missing));
    }

    #[test]
    fn set_default_location_round_trips_through_parser() {
        let mut cfg = Config::default();
        cfg.set_default_location(Coordinate::new(39.7456, -97.0892));

        assert_eq!(cfg.default_location.as_deref(), Some("39.7456, -97.0892"));
        assert_eq!(cfg.default_coordinate(), Ok(Coordinate::new(39.7456, -97.0892)));
    }

    #[test]
    fn malformed_default_location_is_reported() {
        let cfg = Config {
            default_location: Some("somewhere".into()),
            ..Config::default()
        };
        assert!(matches!(cfg.default_coordinate(), Err(ValidationError::Malformed { .. })));
    }

    #[test]
    fn user_agent_falls_back_to_builtin() {
        let mut cfg = Config::default();
        assert!(cfg.user_agent().starts_with("stargazer/"));

        cfg.user_agent = Some("stargazer/0.1 (me@example.com)".into());
        assert_eq!(cfg.user_agent(), "stargazer/0.1 (me@example.com)");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_default_location(Coordinate::new(47.6062, -122.3321));
        cfg.request_timeout_secs = 5;
        cfg.endpoints.nws = "http://localhost:9000".into();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_location = \"1, 2\"\n[endpoints]\nusno = \"http://usno.test\"\n")
            .unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.endpoints.nws, nws::DEFAULT_BASE_URL);
        assert_eq!(cfg.endpoints.usno, "http://usno.test");
    }

    #[test]
    fn load_reads_the_platform_config_file() {
        // Hosts without a home directory have no platform path to compare against.
        let Ok(path) = Config::config_file_path() else {
            return;
        };
        assert!(path.ends_with("config.toml"));
        assert_eq!(Config::load().unwrap(), Config::load_from(&path).unwrap());
    }

    #[test]
    fn garbage_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_location = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
