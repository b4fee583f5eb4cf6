//! Environment configuration.
//!
//! | variable | default |
//! |---|---|
//! | `LOMARTEX_BIND_ADDR` | `0.0.0.0:8080` |
//! | `DATABASE_URL` | unset: in-memory stores |
//! | `LOMARTEX_SPOOL_DIR` | `<temp dir>/lomartex-spool` |
//! | `LOMARTEX_PRINT_COMMAND` | unset: spool files only |
//! | `LOMARTEX_RETAIN_SPOOL` | on when no print command is set |

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var} must be `true` or `false`, got {value}")]
    InvalidBool { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Postgres connection string; `None` selects the in-memory stores.
    pub database_url: Option<String>,
    pub spool_dir: PathBuf,
    /// Raw print command (`program arg...`), split by the printing crate.
    pub print_command: Option<String>,
    /// Explicit spool retention; `None` leaves the choice to the spool.
    pub retain_spool: Option<bool>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = match get("LOMARTEX_BIND_ADDR") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidAddr {
                var: "LOMARTEX_BIND_ADDR",
                value,
            })?,
            None => DEFAULT_BIND_ADDR.parse().map_err(|_| ConfigError::InvalidAddr {
                var: "LOMARTEX_BIND_ADDR",
                value: DEFAULT_BIND_ADDR.to_string(),
            })?,
        };

        let retain_spool = match get("LOMARTEX_RETAIN_SPOOL") {
            Some(value) => Some(parse_bool("LOMARTEX_RETAIN_SPOOL", value)?),
            None => None,
        };

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL"),
            spool_dir: get("LOMARTEX_SPOOL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join("lomartex-spool")),
            print_command: get("LOMARTEX_PRINT_COMMAND"),
            retain_spool,
        })
    }
}

fn parse_bool(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.database_url, None);
        assert!(cfg.spool_dir.ends_with("lomartex-spool"));
        assert_eq!(cfg.print_command, None);
        assert_eq!(cfg.retain_spool, None);
    }

    #[test]
    fn values_are_read_and_blank_means_unset() {
        let cfg = config(&[
            ("LOMARTEX_BIND_ADDR", "127.0.0.1:9000"),
            ("DATABASE_URL", "  "),
            ("LOMARTEX_SPOOL_DIR", "/var/spool/lomartex"),
            ("LOMARTEX_PRINT_COMMAND", "lp -d zebra"),
            ("LOMARTEX_RETAIN_SPOOL", "TRUE"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.spool_dir, PathBuf::from("/var/spool/lomartex"));
        assert_eq!(cfg.print_command.as_deref(), Some("lp -d zebra"));
        assert_eq!(cfg.retain_spool, Some(true));
    }

    #[test]
    fn malformed_values_are_config_errors() {
        assert!(matches!(
            config(&[("LOMARTEX_BIND_ADDR", "localhost")]),
            Err(ConfigError::InvalidAddr { .. })
        ));
        assert!(matches!(
            config(&[("LOMARTEX_RETAIN_SPOOL", "sometimes")]),
            Err(ConfigError::InvalidBool { .. })
        ));
    }
}
