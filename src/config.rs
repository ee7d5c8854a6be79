//! Environment-driven runtime configuration

use crate::domain::availability::AvailabilityPolicy;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/farm_rental";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_NOTIFICATION_CAPACITY: usize = 256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} must be true or false, got {value:?}")]
    InvalidFlag { name: &'static str, value: String },
    #[error("AVAILABILITY_POLICY is not recognized: {0:?}")]
    InvalidPolicy(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub availability_policy: AvailabilityPolicy,
    /// Capacity of the broadcast channel carrying rental notifications
    pub notification_capacity: usize,
    /// Replay the whole event log into rentals_view before serving
    pub rebuild_read_model: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            port: parse_number("PORT", lookup("PORT"), DEFAULT_PORT)?,
            db_max_connections: parse_number(
                "DB_MAX_CONNECTIONS",
                lookup("DB_MAX_CONNECTIONS"),
                DEFAULT_DB_MAX_CONNECTIONS,
            )?,
            availability_policy: match lookup("AVAILABILITY_POLICY") {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidPolicy(value.clone()))?,
                None => AvailabilityPolicy::default(),
            },
            notification_capacity: parse_number(
                "NOTIFICATION_CAPACITY",
                lookup("NOTIFICATION_CAPACITY"),
                DEFAULT_NOTIFICATION_CAPACITY,
            )?,
            rebuild_read_model: parse_flag("REBUILD_READ_MODEL", lookup("REBUILD_READ_MODEL"))?,
        })
    }
}

fn parse_number<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(ConfigError::InvalidNumber { name, value }),
    }
}

fn parse_flag(name: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    match value.as_deref().map(str::trim) {
        None | Some("") | Some("0") | Some("false") => Ok(false),
        Some("1") | Some("true") => Ok(true),
        Some(other) => Err(ConfigError::InvalidFlag {
            name,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, 3000);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.availability_policy, AvailabilityPolicy::ExclusiveOverlap);
        assert!(!config.rebuild_read_model);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://db/rentals"),
            ("PORT", "8080"),
            ("DB_MAX_CONNECTIONS", "20"),
            ("AVAILABILITY_POLICY", "per_day_capacity"),
            ("REBUILD_READ_MODEL", "true"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "postgres://db/rentals");
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_max_connections, 20);
        assert_eq!(config.availability_policy, AvailabilityPolicy::PerDayCapacity);
        assert!(config.rebuild_read_model);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            config_from(&[("PORT", "abc")]),
            Err(ConfigError::InvalidNumber {
                name: "PORT",
                value: "abc".to_string()
            })
        );
        assert!(config_from(&[("DB_MAX_CONNECTIONS", "0")]).is_err());
        assert_eq!(
            config_from(&[("AVAILABILITY_POLICY", "first_come")]),
            Err(ConfigError::InvalidPolicy("first_come".to_string()))
        );
        assert!(config_from(&[("REBUILD_READ_MODEL", "maybe")]).is_err());
    }
}
