use std::env;

use jsonwebtoken::Algorithm;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://todo.db";
const DEFAULT_EXPIRY_SECONDS: u64 = 600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("environment variable {0} has an invalid value")]
    InvalidVar(&'static str),
}

// Runtime configuration, read once at startup and carried in AppState.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub token_secret: String,
    pub token_algorithm: Algorithm,
    pub token_expiry_seconds: u64,
}

impl Config {
    // Reads KEY, ALGORITHM, EXPIRY_TIME and DATABASE_URL from the environment.
    // KEY is mandatory; the rest fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token_secret = env::var("KEY").map_err(|_| ConfigError::MissingVar("KEY"))?;

        let token_algorithm = match env::var("ALGORITHM") {
            Ok(name) => name
                .parse::<Algorithm>()
                .map_err(|_| ConfigError::InvalidVar("ALGORITHM"))?,
            Err(_) => Algorithm::HS256,
        };

        let token_expiry_seconds = match env::var("EXPIRY_TIME") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidVar("EXPIRY_TIME"))?,
            Err(_) => DEFAULT_EXPIRY_SECONDS,
        };

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        Ok(Self {
            database_url,
            token_secret,
            token_algorithm,
            token_expiry_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One sequential test so the process environment is not mutated from
    // multiple threads at once.
    #[test]
    fn from_env_reads_overrides_and_defaults() {
        env::remove_var("KEY");
        env::remove_var("ALGORITHM");
        env::remove_var("EXPIRY_TIME");
        env::remove_var("DATABASE_URL");

        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingVar("KEY"))
        ));

        env::set_var("KEY", "super-secret");
        let config = Config::from_env().expect("config with defaults");
        assert_eq!(config.token_algorithm, Algorithm::HS256);
        assert_eq!(config.token_expiry_seconds, DEFAULT_EXPIRY_SECONDS);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);

        env::set_var("ALGORITHM", "HS384");
        env::set_var("EXPIRY_TIME", "120");
        env::set_var("DATABASE_URL", "sqlite://other.db");
        let config = Config::from_env().expect("config with overrides");
        assert_eq!(config.token_algorithm, Algorithm::HS384);
        assert_eq!(config.token_expiry_seconds, 120);
        assert_eq!(config.database_url, "sqlite://other.db");

        env::set_var("ALGORITHM", "not-an-algorithm");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidVar("ALGORITHM"))
        ));

        env::remove_var("KEY");
        env::remove_var("ALGORITHM");
        env::remove_var("EXPIRY_TIME");
        env::remove_var("DATABASE_URL");
    }
}
