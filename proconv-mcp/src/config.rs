//! Server configuration, read from the environment

use std::env;
use tracing::Level;

use proconv_plugin::{DEFAULT_DECIMALS, MAX_DECIMALS};

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Log level for the stderr subscriber
    pub log_level: Level,
    /// Decimal places in rendered results
    pub decimals: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl ServerConfig {
    /// Read `PROCONV_LOG` (falling back to `RUST_LOG`) and `PROCONV_DECIMALS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_level = lookup("PROCONV_LOG")
            .or_else(|| lookup("RUST_LOG"))
            .and_then(|v| v.trim().parse::<Level>().ok())
            .unwrap_or(defaults.log_level);

        let decimals = lookup("PROCONV_DECIMALS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .map(|d| d.min(MAX_DECIMALS))
            .unwrap_or(defaults.decimals);

        Self { log_level, decimals }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.decimals, 4);
    }

    #[test]
    fn test_log_level_prefers_own_variable() {
        let config = ServerConfig::from_lookup(lookup(&[("PROCONV_LOG", "debug"), ("RUST_LOG", "error")]));
        assert_eq!(config.log_level, Level::DEBUG);

        let config = ServerConfig::from_lookup(lookup(&[("RUST_LOG", "warn")]));
        assert_eq!(config.log_level, Level::WARN);
    }

    #[test]
    fn test_invalid_log_level_falls_back() {
        let config = ServerConfig::from_lookup(lookup(&[("PROCONV_LOG", "chatty")]));
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    fn test_decimals_parsed_and_clamped() {
        let config = ServerConfig::from_lookup(lookup(&[("PROCONV_DECIMALS", "2")]));
        assert_eq!(config.decimals, 2);

        let config = ServerConfig::from_lookup(lookup(&[("PROCONV_DECIMALS", "40")]));
        assert_eq!(config.decimals, MAX_DECIMALS);

        let config = ServerConfig::from_lookup(lookup(&[("PROCONV_DECIMALS", "-1")]));
        assert_eq!(config.decimals, 4);
    }
}
