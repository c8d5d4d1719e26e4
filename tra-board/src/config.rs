//! Process configuration from environment variables.
//!
//! | Variable              | Default                                   |
//! |-----------------------|-------------------------------------------|
//! | `TDX_CLIENT_ID`       | (empty; fetches fail until set)           |
//! | `TDX_CLIENT_SECRET`   | (empty; fetches fail until set)           |
//! | `TDX_AUTH_MODE`       | `oauth`                                   |
//! | `TDX_BOARD`           | `timetable` (oauth) / `liveboard` (hmac)  |
//! | `TDX_DEFAULT_STATION` | `1000`                                    |
//! | `TDX_TIMEOUT_SECS`    | `30`                                      |
//! | `TRA_BOARD_ADDR`      | `127.0.0.1:3000`                          |

use std::net::SocketAddr;

use crate::domain::StationId;
use crate::tdx::{AuthMode, Board, TdxConfig};

/// Default listen address for the web server.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Errors from reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tdx: TdxConfig,
    pub listen_addr: SocketAddr,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let client_id = var("TDX_CLIENT_ID").unwrap_or_default();
        let client_secret = var("TDX_CLIENT_SECRET").unwrap_or_default();

        let auth_mode = match var("TDX_AUTH_MODE") {
            Some(v) => v.parse::<AuthMode>().map_err(|message| ConfigError::Invalid {
                var: "TDX_AUTH_MODE",
                message,
            })?,
            None => AuthMode::default(),
        };

        let board = match var("TDX_BOARD") {
            Some(v) => v.parse::<Board>().map_err(|message| ConfigError::Invalid {
                var: "TDX_BOARD",
                message,
            })?,
            None => match auth_mode {
                AuthMode::OAuth => Board::Timetable,
                AuthMode::Hmac => Board::LiveBoard,
            },
        };

        let default_station = match var("TDX_DEFAULT_STATION") {
            Some(v) => {
                StationId::parse_normalized(&v).map_err(|e| ConfigError::Invalid {
                    var: "TDX_DEFAULT_STATION",
                    message: e.to_string(),
                })?
            }
            None => StationId::default(),
        };

        let mut tdx = TdxConfig::new(client_id, client_secret)
            .with_auth_mode(auth_mode)
            .with_board(board)
            .with_default_station(default_station);

        if let Some(v) = var("TDX_TIMEOUT_SECS") {
            let secs = v.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                var: "TDX_TIMEOUT_SECS",
                message: e.to_string(),
            })?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    var: "TDX_TIMEOUT_SECS",
                    message: "must be at least 1 second".to_string(),
                });
            }
            tdx = tdx.with_timeout(secs);
        }

        let listen_addr = var("TRA_BOARD_ADDR")
            .as_deref()
            .unwrap_or(DEFAULT_ADDR)
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "TRA_BOARD_ADDR",
                message: e.to_string(),
            })?;

        Ok(Self { tdx, listen_addr })
    }

    /// Whether both halves of the client credentials are set.
    pub fn has_credentials(&self) -> bool {
        self.tdx.credentials.ensure_present().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert!(!config.has_credentials());
        assert_eq!(config.tdx.auth_mode, AuthMode::OAuth);
        assert_eq!(config.tdx.board, Board::Timetable);
        assert_eq!(config.tdx.default_station.as_str(), "1000");
        assert_eq!(config.tdx.timeout_secs, 30);
        assert_eq!(config.listen_addr, "127.0.0.1:3000".parse().unwrap());
    }

    #[test]
    fn full_environment() {
        let config = load(&[
            ("TDX_CLIENT_ID", "id"),
            ("TDX_CLIENT_SECRET", "secret"),
            ("TDX_AUTH_MODE", "hmac"),
            ("TDX_DEFAULT_STATION", " 4400 "),
            ("TDX_TIMEOUT_SECS", "10"),
            ("TRA_BOARD_ADDR", "0.0.0.0:8080"),
        ])
        .unwrap();

        assert!(config.has_credentials());
        assert_eq!(config.tdx.auth_mode, AuthMode::Hmac);
        assert_eq!(config.tdx.board, Board::LiveBoard);
        assert_eq!(config.tdx.default_station.as_str(), "4400");
        assert_eq!(config.tdx.timeout_secs, 10);
        assert_eq!(config.listen_addr.port(), 8080);
    }

    #[test]
    fn explicit_board_overrides_mode_default() {
        let config = load(&[("TDX_AUTH_MODE", "hmac"), ("TDX_BOARD", "timetable")]).unwrap();
        assert_eq!(config.tdx.board, Board::Timetable);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = load(&[("TDX_CLIENT_ID", "  "), ("TDX_AUTH_MODE", "")]).unwrap();
        assert!(!config.has_credentials());
        assert_eq!(config.tdx.auth_mode, AuthMode::OAuth);
    }

    #[test]
    fn invalid_values() {
        let err = load(&[("TDX_AUTH_MODE", "basic")]).unwrap_err();
        assert!(err.to_string().starts_with("invalid TDX_AUTH_MODE"));

        assert!(load(&[("TDX_BOARD", "arrivals")]).is_err());
        assert!(load(&[("TDX_DEFAULT_STATION", "10/00")]).is_err());
        assert!(load(&[("TDX_TIMEOUT_SECS", "soon")]).is_err());
        let err = load(&[("TDX_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(err.to_string().starts_with("invalid TDX_TIMEOUT_SECS"));
        assert!(load(&[("TRA_BOARD_ADDR", "localhost")]).is_err());
    }
}
