use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value '{value}' for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub pool_size: u32,
    pub generator_orders: usize,
    pub generator_seed: Option<u64>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let settings = Self {
            database_url,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 8080)?,
            pool_size: parse_or("DB_POOL_SIZE", 10)?,
            generator_orders: parse_or("GENERATOR_ORDERS", 100)?,
            generator_seed: parse_optional("GENERATOR_SEED")?,
        };
        log::debug!(
            "settings loaded: host={} port={} pool_size={}",
            settings.host,
            settings.port,
            settings.pool_size
        );
        Ok(settings)
    }
}

fn parse_optional<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        _ => Ok(None),
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    Ok(parse_optional(name)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names so they can run in parallel.

    #[test]
    fn parse_or_falls_back_when_unset() {
        env::remove_var("BOOKSTORE_TEST_UNSET");
        assert_eq!(parse_or::<u16>("BOOKSTORE_TEST_UNSET", 8080).unwrap(), 8080);
    }

    #[test]
    fn parse_or_reads_the_variable() {
        env::set_var("BOOKSTORE_TEST_PORT", " 9090 ");
        assert_eq!(parse_or::<u16>("BOOKSTORE_TEST_PORT", 8080).unwrap(), 9090);
    }

    #[test]
    fn invalid_values_are_reported() {
        env::set_var("BOOKSTORE_TEST_BAD", "eighty");
        let err = parse_or::<u16>("BOOKSTORE_TEST_BAD", 8080).unwrap_err();
        assert_eq!(err.to_string(), "invalid value 'eighty' for BOOKSTORE_TEST_BAD");
    }

    #[test]
    fn blank_optional_is_none() {
        env::set_var("BOOKSTORE_TEST_SEED", "");
        assert_eq!(parse_optional::<u64>("BOOKSTORE_TEST_SEED").unwrap(), None);
    }
}
