use std::collections::HashMap;
use std::net::IpAddr;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind_address: IpAddr,
    /// Upper bound on events accepted per simulation request.
    pub max_events: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: IpAddr::from([127, 0, 0, 1]),
            max_events: 256,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let bind_address = env_map
            .get("BIND_ADDRESS")
            .map(|s| s.as_str())
            .unwrap_or("127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "BIND_ADDRESS".to_string(),
                    "must be an IPv4 or IPv6 address".to_string(),
                )
            })?;

        let max_events = match env_map.get("MAX_EVENTS") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "MAX_EVENTS".to_string(),
                        format!("must be a positive integer, got {}", raw),
                    ))
                }
            },
            None => 256,
        };

        Ok(Config {
            port,
            bind_address,
            max_events,
        })
    }
}
