use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

use crate::error::AppError;

const DEFAULT_SHEETS_BASE_URL: &str = "https://docs.google.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Scheme and host the spreadsheet edit and export URLs are built on.
    pub sheets_base_url: String,
    pub title_timeout: Duration,
    pub data_timeout: Duration,
    pub title_cache_ttl: Duration,
    pub data_cache_ttl: Duration,
    pub stylesheet_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            sheets_base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            title_timeout: Duration::from_secs(10),
            data_timeout: Duration::from_secs(15),
            title_cache_ttl: Duration::from_secs(60 * 60),
            data_cache_ttl: Duration::from_secs(10 * 60),
            stylesheet_path: PathBuf::from("styles.css"),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, AppError> {
        // Load .env file first
        dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source; anything unset keeps its default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let bind_addr = parse_var(&lookup, "BIND_ADDR")?
            .unwrap_or(defaults.bind_addr);
        let sheets_base_url = lookup("SHEETS_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.sheets_base_url);

        Ok(Config {
            bind_addr,
            sheets_base_url,
            title_timeout: secs_var(&lookup, "TITLE_TIMEOUT_SECS")?.unwrap_or(defaults.title_timeout),
            data_timeout: secs_var(&lookup, "DATA_TIMEOUT_SECS")?.unwrap_or(defaults.data_timeout),
            title_cache_ttl: secs_var(&lookup, "TITLE_CACHE_TTL_SECS")?.unwrap_or(defaults.title_cache_ttl),
            data_cache_ttl: secs_var(&lookup, "DATA_CACHE_TTL_SECS")?.unwrap_or(defaults.data_cache_ttl),
            stylesheet_path: lookup("STYLESHEET_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.stylesheet_path),
        })
    }
}

pub fn load_config() -> Result<Config, AppError> {
    let config = Config::new()?;
    tracing::info!(
        "Configuration loaded: bind={}, sheets_base_url={}",
        config.bind_addr,
        config.sheets_base_url
    );
    Ok(config)
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::Config(format!("{} has invalid value '{}': {}", key, raw, e))),
    }
}

fn secs_var<F>(lookup: &F, key: &str) -> Result<Option<Duration>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_var::<F, u64>(lookup, key)?.map(Duration::from_secs))
}
