// src/config.rs
use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str =
    "https://home.treasury.gov/resource-center/data-chart-center/interest-rates/daily-treasury-rates.csv";
pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_REFRESH_SECS: u64 = 300;
pub const DEFAULT_YEARS_BACK: u32 = 5;
pub const MAX_YEARS_BACK: u32 = 30;

/// How the yearly downloads of one refresh cycle are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    #[default]
    Sequential,
    Concurrent,
}

impl FromStr for FetchMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(FetchMode::Sequential),
            "concurrent" => Ok(FetchMode::Concurrent),
            other => Err(anyhow!("FETCH_MODE must be 'sequential' or 'concurrent', got '{}'", other)),
        }
    }
}

/// What a failed refresh does to the series already on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Drop the series and show only the error.
    #[default]
    Clear,
    /// Keep serving the last good series next to the error.
    RetainLastGood,
}

impl FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" => Ok(FailurePolicy::Clear),
            "retain" | "retain_last_good" => Ok(FailurePolicy::RetainLastGood),
            other => Err(anyhow!("FAILURE_POLICY must be 'clear' or 'retain', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub base_url: String,
    pub years_back: u32,
    /// Newest year fetched; the current UTC year when unset.
    pub anchor_year: Option<i32>,
    pub fetch_mode: FetchMode,
    pub failure_policy: FailurePolicy,
    pub request_timeout: Option<Duration>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            years_back: DEFAULT_YEARS_BACK,
            anchor_year: None,
            fetch_mode: FetchMode::default(),
            failure_policy: FailurePolicy::default(),
            request_timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub refresh_interval: Duration,
    pub feed: FeedConfig,
}

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(v) => v.trim().parse::<u16>().context("PORT must be a number")?,
            None => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let refresh_secs = parse_or(&lookup, "REFRESH_INTERVAL_SECS", DEFAULT_REFRESH_SECS)?;
        if refresh_secs == 0 {
            return Err(anyhow!("REFRESH_INTERVAL_SECS must be greater than zero"));
        }

        let base_url = lookup("TREASURY_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let anchor_year = match lookup("TREASURY_ANCHOR_YEAR") {
            Some(v) => Some(v.trim().parse::<i32>().context("TREASURY_ANCHOR_YEAR must be a year")?),
            None => None,
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(v) => Some(Duration::from_secs(
                v.trim().parse::<u64>().context("REQUEST_TIMEOUT_SECS must be a number of seconds")?,
            )),
            None => None,
        };

        let years_back = parse_or(&lookup, "YEARS_BACK", DEFAULT_YEARS_BACK)?;
        if !(1..=MAX_YEARS_BACK).contains(&years_back) {
            return Err(anyhow!(
                "YEARS_BACK must be between 1 and {}, got {}",
                MAX_YEARS_BACK,
                years_back
            ));
        }

        let feed = FeedConfig {
            base_url,
            years_back,
            anchor_year,
            fetch_mode: parse_or(&lookup, "FETCH_MODE", FetchMode::default())?,
            failure_policy: parse_or(&lookup, "FAILURE_POLICY", FailurePolicy::default())?,
            request_timeout,
        };

        info!(
            "Configuration loaded: port={}, refresh every {}s, mode={:?}, policy={:?}",
            port, refresh_secs, feed.fetch_mode, feed.failure_policy
        );

        Ok(AppConfig {
            port,
            refresh_interval: Duration::from_secs(refresh_secs),
            feed,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("invalid value for {}: {}", key, e)),
        None => Ok(default),
    }
}
