//! Service configuration read from the environment.

use markdeck_core::CardIdStrategy;
use thiserror::Error;

pub use markdeck_core::MAX_SCHEDULE_DAYS;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    /// Id strategy used when a request does not pick one.
    pub card_ids: CardIdStrategy,
    /// Default window for the review schedule.
    pub schedule_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_format: LogFormat::default(),
            card_ids: CardIdStrategy::default(),
            schedule_days: 7,
        }
    }
}

impl Config {
    /// Read `HOST`, `PORT`, `LOG_FORMAT`, `CARD_IDS` and `SCHEDULE_DAYS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = port.parse().map_err(|_| invalid("PORT", &port))?;
        }
        if let Some(format) = get("LOG_FORMAT") {
            config.log_format = match format.as_str() {
                "pretty" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                _ => return Err(invalid("LOG_FORMAT", &format)),
            };
        }
        if let Some(ids) = get("CARD_IDS") {
            config.card_ids =
                CardIdStrategy::from_name(&ids).ok_or_else(|| invalid("CARD_IDS", &ids))?;
        }
        if let Some(days) = get("SCHEDULE_DAYS") {
            config.schedule_days = days
                .parse()
                .ok()
                .filter(|d| (1..=MAX_SCHEDULE_DAYS).contains(d))
                .ok_or_else(|| invalid("SCHEDULE_DAYS", &days))?;
        }

        Ok(config)
    }

    /// Socket address to bind.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn invalid(name: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
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
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.card_ids, CardIdStrategy::ContentHash);
        assert_eq!(config.schedule_days, 7);
    }

    #[test]
    fn reads_all_values() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("LOG_FORMAT", "json"),
            ("CARD_IDS", "random"),
            ("SCHEDULE_DAYS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.card_ids, CardIdStrategy::Random);
        assert_eq!(config.schedule_days, 30);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            Config::from_lookup(lookup(&[("PORT", "http")])).unwrap_err(),
            ConfigError::Invalid {
                name: "PORT",
                value: "http".to_string()
            }
        );
        assert!(Config::from_lookup(lookup(&[("SCHEDULE_DAYS", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("CARD_IDS", "md5")])).is_err());
        assert!(Config::from_lookup(lookup(&[("LOG_FORMAT", "xml")])).is_err());
    }
}
