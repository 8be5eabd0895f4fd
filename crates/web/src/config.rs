use anyhow::{Context, Result};
use importer::sources::iracing::DEFAULT_BASE_URL;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Memory-backed stores are used when unset.
    pub database_url: Option<String>,
    pub api_keys: String,
    pub iracing_email: Option<String>,
    pub iracing_password: Option<String>,
    pub iracing_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: non_empty_var("DATABASE_URL"),
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            iracing_email: non_empty_var("IRACING_EMAIL"),
            iracing_password: non_empty_var("IRACING_PASSWORD"),
            iracing_base_url: non_empty_var("IRACING_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
