//! Server and note-service configuration
//!
//! All settings come from the environment (no flags). [`ServerConfig::from_env`]
//! reads the process environment; [`ServerConfig::from_lookup`] takes any
//! lookup closure so tests can supply values without touching global state.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `BIND_ADDR` | `127.0.0.1` | Interface to listen on |
//! | `PORT` | `8787` | Port to listen on |
//! | `DEFAULT_TTL_SECONDS` | `0` | Note lifetime, `0` = never expires |
//! | `MAX_BYTES` | `100000` | Largest accepted note, in UTF-8 bytes |
//! | `PUBLIC_URL` | unset | Origin used in share URLs instead of the `Host` header |
//! | `STORE_BACKEND` | `libsql` | `libsql` or `memory` |
//! | `DATABASE_PATH` | `~/.zanile/database/notes.db` | libsql database file |
//! | `PURGE_INTERVAL_SECONDS` | `60` | How often expired rows are deleted |

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default payload cap in bytes
pub const DEFAULT_MAX_BYTES: usize = 100_000;

pub const DEFAULT_PORT: u16 = 8787;

pub const DEFAULT_PURGE_INTERVAL_SECS: u64 = 60;

/// Longest accepted default TTL: 100 years
pub const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}' ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown store backend '{0}' (expected 'libsql' or 'memory')")]
    UnknownBackend(String),

    #[error("Cannot determine home directory for the default database path")]
    NoHomeDirectory,
}

/// Limits applied by [`NoteService`](crate::services::NoteService)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteConfig {
    /// Largest accepted note body, in UTF-8 bytes
    pub max_bytes: usize,

    /// TTL applied to every new note; `0` stores notes without expiry
    pub default_ttl_secs: u64,
}

impl Default for NoteConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            default_ttl_secs: 0,
        }
    }
}

impl NoteConfig {
    /// TTL to hand to the store, or `None` when notes should persist
    pub fn ttl(&self) -> Option<Duration> {
        (self.default_ttl_secs > 0).then(|| Duration::from_secs(self.default_ttl_secs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Libsql { db_path: PathBuf },
    Memory,
}

/// Process-level configuration for the clipboard server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub notes: NoteConfig,
    pub public_url: Option<String>,
    pub store: StoreBackend,
    pub purge_interval: Duration,
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, treating blank values as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let store = match get("STORE_BACKEND").as_deref() {
            None | Some("libsql") => StoreBackend::Libsql {
                db_path: match get("DATABASE_PATH") {
                    Some(path) => PathBuf::from(path),
                    None => default_db_path()?,
                },
            },
            Some("memory") => StoreBackend::Memory,
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        let config = Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
            notes: NoteConfig {
                max_bytes: parse_or("MAX_BYTES", get("MAX_BYTES"), DEFAULT_MAX_BYTES)?,
                default_ttl_secs: parse_or("DEFAULT_TTL_SECONDS", get("DEFAULT_TTL_SECONDS"), 0)?,
            },
            public_url: get("PUBLIC_URL").map(|url| url.trim_end_matches('/').to_string()),
            store,
            purge_interval: Duration::from_secs(parse_or(
                "PURGE_INTERVAL_SECONDS",
                get("PURGE_INTERVAL_SECONDS"),
                DEFAULT_PURGE_INTERVAL_SECS,
            )?),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                name: "PORT",
                value: "0".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.notes.max_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_BYTES",
                value: "0".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.notes.default_ttl_secs > MAX_TTL_SECS {
            return Err(ConfigError::InvalidValue {
                name: "DEFAULT_TTL_SECONDS",
                value: self.notes.default_ttl_secs.to_string(),
                reason: format!("must not exceed {}", MAX_TTL_SECS),
            });
        }

        if self.purge_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "PURGE_INTERVAL_SECONDS",
                value: "0".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => match value.parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::InvalidValue {
                name,
                reason: e.to_string(),
                value,
            }),
        },
    }
}

/// `~/.zanile/database/notes.db`
fn default_db_path() -> Result<PathBuf, ConfigError> {
    let home_dir = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(home_dir.join(".zanile").join("database").join("notes.db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[("DATABASE_PATH", "/tmp/notes.db")]))
                .unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.notes, NoteConfig::default());
        assert_eq!(config.notes.ttl(), None);
        assert_eq!(config.public_url, None);
        assert_eq!(
            config.store,
            StoreBackend::Libsql {
                db_path: PathBuf::from("/tmp/notes.db")
            }
        );
        assert_eq!(config.listen_addr(), "127.0.0.1:8787");
    }

    #[test]
    fn test_explicit_values() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("BIND_ADDR", "0.0.0.0"),
            ("MAX_BYTES", "2048"),
            ("DEFAULT_TTL_SECONDS", "3600"),
            ("PUBLIC_URL", "https://clip.example.com/"),
            ("STORE_BACKEND", "memory"),
        ]))
        .unwrap();

        assert_eq!(config.listen_addr(), "0.0.0.0:9000");
        assert_eq!(config.notes.max_bytes, 2048);
        assert_eq!(config.notes.ttl(), Some(Duration::from_secs(3600)));
        assert_eq!(config.public_url.as_deref(), Some("https://clip.example.com"));
        assert_eq!(config.store, StoreBackend::Memory);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("STORE_BACKEND", "memory"),
            ("MAX_BYTES", "  "),
            ("DEFAULT_TTL_SECONDS", ""),
        ]))
        .unwrap();

        assert_eq!(config.notes, NoteConfig::default());
    }

    #[test]
    fn test_unparseable_number_is_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[
            ("STORE_BACKEND", "memory"),
            ("MAX_BYTES", "lots"),
        ]))
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidValue { name: "MAX_BYTES", .. }
        ));
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        let zero_bytes = ServerConfig::from_lookup(lookup_from(&[
            ("STORE_BACKEND", "memory"),
            ("MAX_BYTES", "0"),
        ]));
        assert!(zero_bytes.is_err());

        let zero_port = ServerConfig::from_lookup(lookup_from(&[
            ("STORE_BACKEND", "memory"),
            ("PORT", "0"),
        ]));
        assert!(zero_port.is_err());
    }

    #[test]
    fn test_ttl_above_ceiling_is_rejected() {
        let at_ceiling = ServerConfig::from_lookup(lookup_from(&[
            ("STORE_BACKEND", "memory"),
            ("DEFAULT_TTL_SECONDS", &MAX_TTL_SECS.to_string()),
        ]));
        assert!(at_ceiling.is_ok());

        let err = ServerConfig::from_lookup(lookup_from(&[
            ("STORE_BACKEND", "memory"),
            ("DEFAULT_TTL_SECONDS", &u64::MAX.to_string()),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { name: "DEFAULT_TTL_SECONDS", .. }
        ));
    }

    #[test]
    fn test_unknown_backend() {
        let err = ServerConfig::from_lookup(lookup_from(&[("STORE_BACKEND", "redis")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBackend(ref b) if b == "redis"));
    }
}
