use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub job_pool_url: String,
    pub job_pool_timeout_secs: u64,
    pub job_pool_limit: usize,
    /// Optional JSON file overriding the built-in related-specializations table.
    pub related_specializations_path: Option<String>,
    pub rescore_applies_presentation: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            job_pool_url: require_env("JOB_POOL_URL")?,
            job_pool_timeout_secs: parse_env("JOB_POOL_TIMEOUT_SECS", 30)?,
            job_pool_limit: parse_env("JOB_POOL_LIMIT", 200)?,
            related_specializations_path: std::env::var("RELATED_SPECIALIZATIONS_PATH").ok(),
            rescore_applies_presentation: parse_env("RESCORE_APPLIES_PRESENTATION", true)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
