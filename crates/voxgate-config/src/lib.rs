//! Process settings read once from the environment.
//!
//! [`Settings`] is built at startup and handed to every component that needs
//! it. Nothing here reads the environment after construction.

use std::env;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("{0} must be greater than 0")]
    Zero(&'static str),

    #[error("Invalid bind address: {0}")]
    BindAddr(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_ELEVENLABS_API_BASE: &str = "https://api.elevenlabs.io";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_STATIC_DIR: &str = "dist";

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// MySQL connection parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// ElevenLabs API access.
#[derive(Clone, PartialEq, Eq)]
pub struct VoiceSettings {
    /// `None` when `XI_API_KEY` is unset or empty.
    pub api_key: Option<String>,
    pub api_base: String,
}

impl std::fmt::Debug for VoiceSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// HTTP listener and frontend bundle location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub voice: VoiceSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Reads settings through an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_connections = parse_or(&get, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(ConfigError::Zero("DB_MAX_CONNECTIONS"));
        }

        let database = DatabaseSettings {
            host: get("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.into()),
            port: parse_or(&get, "DB_PORT", DEFAULT_DB_PORT)?,
            user: get("DB_USER"),
            password: get("DB_PASSWORD").or_else(|| get("DB_PASS")),
            name: get("DB_NAME"),
            max_connections,
        };

        let voice = VoiceSettings {
            api_key: get("XI_API_KEY"),
            api_base: get("ELEVENLABS_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_ELEVENLABS_API_BASE.into()),
        };

        let server = ServerSettings {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port: parse_or(&get, "PORT", DEFAULT_PORT)?,
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        };

        Ok(Self { database, voice, server })
    }

    /// Socket address the HTTP server binds to.
    ///
    /// `HOST` may be an IPv4 or IPv6 literal or a hostname; hostnames bind to
    /// their first resolved address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.server.host.trim_start_matches('[').trim_end_matches(']');
        let invalid = || ConfigError::BindAddr(format!("{}:{}", self.server.host, self.server.port));

        (host, self.server.port)
            .to_socket_addrs()
            .map_err(|_| invalid())?
            .next()
            .ok_or_else(invalid)
    }

    /// `user@host:port/name` for logging. Never includes the password.
    pub fn database_summary(&self) -> String {
        let db = &self.database;
        let user = db.user.as_deref().unwrap_or("<default>");
        let name = db.name.as_deref().unwrap_or("");
        format!("{}@{}:{}/{}", user, db.host, db.port, name)
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.database.host, "localhost");
        assert_eq!(s.database.port, 3306);
        assert_eq!(s.database.user, None);
        assert_eq!(s.database.max_connections, 5);
        assert_eq!(s.voice.api_key, None);
        assert_eq!(s.voice.api_base, "https://api.elevenlabs.io");
        assert_eq!(s.server.port, 8000);
        assert_eq!(s.server.static_dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_reads_database_and_api_key() {
        let s = settings(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "3307"),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "hunter2"),
            ("DB_NAME", "assistentes_db"),
            ("XI_API_KEY", "xi-123"),
        ])
        .unwrap();

        assert_eq!(s.database.host, "db.internal");
        assert_eq!(s.database.port, 3307);
        assert_eq!(s.database.user.as_deref(), Some("app"));
        assert_eq!(s.database.password.as_deref(), Some("hunter2"));
        assert_eq!(s.database.name.as_deref(), Some("assistentes_db"));
        assert_eq!(s.voice.api_key.as_deref(), Some("xi-123"));
    }

    #[test]
    fn test_empty_api_key_counts_as_missing() {
        let s = settings(&[("XI_API_KEY", "  ")]).unwrap();
        assert_eq!(s.voice.api_key, None);
    }

    #[test]
    fn test_api_base_trailing_slash_is_trimmed() {
        let s = settings(&[("ELEVENLABS_API_BASE", "http://127.0.0.1:9999/")]).unwrap();
        assert_eq!(s.voice.api_base, "http://127.0.0.1:9999");
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let err = settings(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue { key: "PORT", value: "eighty".into() }
        );

        assert!(settings(&[("DB_PORT", "-1")]).is_err());
        assert_eq!(
            settings(&[("DB_MAX_CONNECTIONS", "0")]).unwrap_err(),
            ConfigError::Zero("DB_MAX_CONNECTIONS")
        );
    }

    #[test]
    fn test_bind_addr() {
        let s = settings(&[("HOST", "127.0.0.1"), ("PORT", "9000")]).unwrap();
        let addr = s.bind_addr().unwrap();
        assert_eq!(addr.port(), 9000);
        assert_eq!(addr.ip().to_string(), "127.0.0.1");

        let s = settings(&[("HOST", "not a host")]).unwrap();
        assert!(s.bind_addr().is_err());
    }

    #[test]
    fn test_bind_addr_accepts_hostnames_and_ipv6() {
        let s = settings(&[("HOST", "localhost"), ("PORT", "8000")]).unwrap();
        let addr = s.bind_addr().unwrap();
        assert_eq!(addr.port(), 8000);
        assert!(addr.ip().is_loopback());

        let s = settings(&[("HOST", "::")]).unwrap();
        assert_eq!(s.bind_addr().unwrap().to_string(), "[::]:8000");

        let s = settings(&[("HOST", "[::1]"), ("PORT", "9000")]).unwrap();
        assert_eq!(s.bind_addr().unwrap().to_string(), "[::1]:9000");
    }

    #[test]
    fn test_db_pass_is_a_password_alias() {
        let s = settings(&[("DB_PASS", "legacy")]).unwrap();
        assert_eq!(s.database.password.as_deref(), Some("legacy"));

        let s = settings(&[("DB_PASS", "legacy"), ("DB_PASSWORD", "current")]).unwrap();
        assert_eq!(s.database.password.as_deref(), Some("current"));
    }

    #[test]
    fn test_database_summary_hides_password() {
        let s = settings(&[
            ("DB_USER", "app"),
            ("DB_PASSWORD", "hunter2"),
            ("DB_NAME", "voz"),
        ])
        .unwrap();
        let summary = s.database_summary();
        assert_eq!(summary, "app@localhost:3306/voz");
        assert!(!summary.contains("hunter2"));
    }

    #[test]
    fn test_debug_masks_secrets() {
        let s = settings(&[("XI_API_KEY", "secret-key"), ("DB_PASSWORD", "hunter2")]).unwrap();
        let rendered = format!("{:?}", s);
        assert!(!rendered.contains("secret-key"));
        assert!(!rendered.contains("hunter2"));
    }
}
