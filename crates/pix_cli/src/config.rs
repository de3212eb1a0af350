use std::env;

use anyhow::{Context, Result};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
}

impl Config {
    /// Only commands that touch the database need this.
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            database_url: get("DATABASE_URL").context("DATABASE_URL must be set")?,

            db_max_connections: match get("DB_MAX_CONNECTIONS") {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("DB_MAX_CONNECTIONS has an invalid value: {}", raw))?,
                None => 5,
            },
        })
    }
}
