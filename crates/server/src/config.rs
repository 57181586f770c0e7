use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_OMDB_TIMEOUT_SECS: u64 = 15;
const DEFAULT_EPISODES_PER_SEASON: u32 = 10;
const DEFAULT_STATIC_DIR: &str = "./static";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            _ => Self::Dev,
        }
    }

    /// Returns the default data path for this environment
    pub fn default_data_path(&self) -> PathBuf {
        match self {
            Self::Dev => PathBuf::from("./data"),
            Self::Prod => PathBuf::from("/data"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {name}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub env: Environment,
    pub port: u16,
    /// Directory holding `users.json` and one `<user>.json` per user
    pub data_path: PathBuf,
    pub omdb_api_key: String,
    pub omdb_timeout: Duration,
    /// Episodes assumed per season when estimating a series' total
    pub episodes_per_season: u32,
    /// Look up missing covers once at startup
    pub backfill_covers: bool,
    /// Frontend served for non-API paths when the directory exists
    pub static_dir: PathBuf,
}

impl Config {
    pub fn new(env: Environment, data_path: impl AsRef<Path>, omdb_api_key: String) -> Self {
        Self {
            env,
            port: DEFAULT_PORT,
            data_path: data_path.as_ref().to_path_buf(),
            omdb_api_key,
            omdb_timeout: Duration::from_secs(DEFAULT_OMDB_TIMEOUT_SECS),
            episodes_per_season: DEFAULT_EPISODES_PER_SEASON,
            backfill_covers: false,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = Environment::from_str(&env::var("APP_ENV").unwrap_or_default());
        let data_path = env::var("DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env.default_data_path());

        let mut config = Self::new(env, data_path, env::var("OMDB_API_KEY").unwrap_or_default());
        config.port = parse_var("PORT", DEFAULT_PORT)?;
        config.omdb_timeout =
            Duration::from_secs(parse_var("OMDB_TIMEOUT_SECS", DEFAULT_OMDB_TIMEOUT_SECS)?);
        config.episodes_per_season = parse_var("EPISODES_PER_SEASON", DEFAULT_EPISODES_PER_SEASON)?;
        config.backfill_covers = parse_var("BACKFILL_COVERS", false)?;
        if let Ok(dir) = env::var("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => parse_value(name, &value),
        _ => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_str() {
        assert_eq!(Environment::from_str("production"), Environment::Prod);
        assert_eq!(Environment::from_str("PROD"), Environment::Prod);
        assert_eq!(Environment::from_str(""), Environment::Dev);
        assert_eq!(Environment::Prod.default_data_path(), PathBuf::from("/data"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::new(Environment::Dev, "./data", String::new());
        assert_eq!(config.port, 8080);
        assert_eq!(config.omdb_timeout, Duration::from_secs(15));
        assert_eq!(config.episodes_per_season, 10);
        assert!(!config.backfill_covers);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u16>("PORT", " 3000 ").unwrap(), 3000);
        assert!(parse_value::<bool>("BACKFILL_COVERS", "true").unwrap());
        assert!(matches!(
            parse_value::<u16>("PORT", "eighty"),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
    }
}
