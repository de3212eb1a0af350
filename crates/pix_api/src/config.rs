use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing::warn;

// Only for local development; a warning is logged whenever it is used.
const DEV_JWT_SECRET: &str = "dev-only-pix-generator-secret-change-me";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub templates_dir: PathBuf,
    pub port: u16,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable source.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = match get("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                warn!("JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        Ok(Config {
            database_url: get("DATABASE_URL").context("DATABASE_URL must be set")?,

            redis_url: get("REDIS_URL").filter(|s| !s.is_empty()),

            jwt_secret,

            jwt_ttl_hours: parse_or(&get, "JWT_TTL_HOURS", 24)?,

            templates_dir: get("TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./templates")),

            port: parse_or(&get, "PORT", 8080)?,

            db_max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 5)?,
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}
