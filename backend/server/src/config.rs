use std::{
    env,
    fmt::Display,
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use thiserror::Error;
use tracing::{info, warn};

pub const MONGODB_URI: &str = "MONGODB_URI";
pub const DEFAULT_DATABASE: &str = "restaurante_reviews_db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Secret {0} not found in the secrets directory or the environment")]
    MissingSecret(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub mongodb_uri: String,
    pub database: String,
    pub cache_ttl: Duration,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let secrets_dir: PathBuf = try_load("SECRETS_DIR", "/run/secrets")?;

        Ok(Self {
            port: try_load("RUST_PORT", "8080")?,
            mongodb_uri: read_secret(&secrets_dir, MONGODB_URI)?,
            database: try_load("DATABASE_NAME", DEFAULT_DATABASE)?,
            cache_ttl: Duration::from_secs(try_load("CACHE_TTL_SECS", "600")?),
        })
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");

        ConfigError::InvalidValue {
            key: key.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Secret file first, then an environment variable of the same name.
fn read_secret(secrets_dir: &Path, secret_name: &str) -> Result<String, ConfigError> {
    let path = secrets_dir.join(secret_name);

    match read_to_string(&path) {
        Ok(secret) if !secret.trim().is_empty() => return Ok(secret.trim().to_string()),
        Ok(_) => warn!("Secret file {} is empty", path.display()),
        Err(e) => warn!("Failed to read {secret_name} from file: {e}"),
    }

    env::var(secret_name)
        .ok()
        .map(|secret| secret.trim().to_string())
        .filter(|secret| !secret.is_empty())
        .ok_or_else(|| ConfigError::MissingSecret(secret_name.to_string()))
}
