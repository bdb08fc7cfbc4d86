//! Configuration loading and resolution
//!
//! All runtime settings live in one [`AppConfig`] constructed at startup and
//! passed into constructors. Call sites never read the process environment
//! themselves.
//!
//! Resolution priority for each setting:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default HTTP bind address
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5780;
/// Default session lifetime in minutes
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60 * 24;

/// Application configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Path to the SQLite database backing identities, sessions and profiles
    pub database_path: PathBuf,
    /// Session lifetime in minutes
    pub session_ttl_minutes: i64,
}

/// Settings overridable from the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
}

/// Subset of settings readable from the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    database_path: Option<PathBuf>,
    session_ttl_minutes: Option<i64>,
}

impl AppConfig {
    /// Resolve configuration from CLI overrides, environment, TOML file and
    /// compiled defaults, in that priority order.
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let file = match config_file_path() {
            Some(path) if path.exists() => load_file_config(&path)?,
            _ => FileConfig::default(),
        };

        let port = resolve_setting(
            "port",
            cli.port,
            env_parsed("EQX_PORT")?,
            file.port,
            DEFAULT_PORT,
        );

        let database_path = resolve_setting(
            "database_path",
            cli.database_path.clone(),
            std::env::var("EQX_DATABASE").ok().map(PathBuf::from),
            file.database_path,
            default_database_path(),
        );

        let host = resolve_setting(
            "host",
            None,
            std::env::var("EQX_HOST").ok(),
            file.host,
            DEFAULT_HOST.to_string(),
        );

        let session_ttl_minutes = resolve_setting(
            "session_ttl_minutes",
            None,
            env_parsed("EQX_SESSION_TTL_MINUTES")?,
            file.session_ttl_minutes,
            DEFAULT_SESSION_TTL_MINUTES,
        );

        if session_ttl_minutes <= 0 {
            return Err(Error::Config(format!(
                "session_ttl_minutes must be positive, got {}",
                session_ttl_minutes
            )));
        }

        Ok(Self {
            host,
            port,
            database_path,
            session_ttl_minutes,
        })
    }
}

/// Pick the highest-priority source that supplied a value
fn resolve_setting<T>(
    name: &str,
    cli: Option<T>,
    env: Option<T>,
    file: Option<T>,
    default: T,
) -> T {
    let supplied =
        [cli.is_some(), env.is_some(), file.is_some()].iter().filter(|s| **s).count();
    if supplied > 1 {
        warn!(
            "{} supplied by multiple sources; using highest priority (CLI > env > file)",
            name
        );
    }

    if let Some(v) = cli {
        return v;
    }
    if let Some(v) = env {
        return v;
    }
    if let Some(v) = file {
        info!("{} loaded from config file", name);
        return v;
    }
    default
}

/// Read and parse an environment variable, erroring on malformed values
fn env_parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("Invalid {} value {:?}: {}", key, raw, e))),
        Err(_) => Ok(None),
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Config file location: user config dir first, then /etc on Linux
fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("equinox").join("config.toml"));
    if let Some(path) = &user_config {
        if path.exists() {
            return user_config;
        }
    }
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/equinox/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }
    user_config
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("equinox"))
        .unwrap_or_else(|| PathBuf::from("./equinox_data"))
        .join("equinox.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("EQX_PORT");
        std::env::remove_var("EQX_HOST");
        std::env::remove_var("EQX_DATABASE");
        std::env::remove_var("EQX_SESSION_TTL_MINUTES");
    }

    #[test]
    #[serial]
    fn defaults_apply_when_nothing_is_set() {
        clear_env();
        let config = AppConfig::resolve(&CliOverrides::default()).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.session_ttl_minutes, DEFAULT_SESSION_TTL_MINUTES);
    }

    #[test]
    #[serial]
    fn cli_beats_environment() {
        clear_env();
        std::env::set_var("EQX_PORT", "6000");
        let cli = CliOverrides {
            port: Some(7000),
            database_path: None,
        };
        let config = AppConfig::resolve(&cli).unwrap();
        assert_eq!(config.port, 7000);
        clear_env();
    }

    #[test]
    #[serial]
    fn environment_beats_default() {
        clear_env();
        std::env::set_var("EQX_PORT", "6000");
        let config = AppConfig::resolve(&CliOverrides::default()).unwrap();
        assert_eq!(config.port, 6000);
        clear_env();
    }

    #[test]
    #[serial]
    fn malformed_env_port_is_a_config_error() {
        clear_env();
        std::env::set_var("EQX_PORT", "not-a-port");
        let result = AppConfig::resolve(&CliOverrides::default());
        assert!(matches!(result, Err(Error::Config(_))));
        clear_env();
    }

    #[test]
    fn file_config_parses_partial_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "port = 6100\nsession_ttl_minutes = 30\n").unwrap();

        let file = load_file_config(&path).unwrap();
        assert_eq!(file.port, Some(6100));
        assert_eq!(file.session_ttl_minutes, Some(30));
        assert_eq!(file.host, None);
    }

    #[test]
    fn malformed_file_config_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "port = [not toml").unwrap();

        assert!(matches!(load_file_config(&path), Err(Error::Config(_))));
    }

    #[test]
    #[serial]
    fn nonpositive_session_ttl_rejected() {
        clear_env();
        std::env::set_var("EQX_SESSION_TTL_MINUTES", "0");
        let result = AppConfig::resolve(&CliOverrides::default());
        assert!(matches!(result, Err(Error::Config(_))));
        clear_env();
    }
}
