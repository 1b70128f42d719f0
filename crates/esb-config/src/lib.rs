//! esb-config
//!
//! Environment-driven configuration for the feed daemon. Everything is
//! plain env vars: production injects them directly, development loads
//! `.env.local` before [`Config::from_env`] runs.

use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const ENV_COLOSSUS_URL: &str = "ESB_COLOSSUS_URL";
pub const ENV_COLOSSUS_API_KEY: &str = "ESB_COLOSSUS_API_KEY";
pub const ENV_COLOSSUS_API_SECRET: &str = "ESB_COLOSSUS_API_SECRET";
pub const ENV_EXCHANGE_FEED_MINUTES: &str = "ESB_EXCHANGE_FEED_MINUTES";
pub const ENV_POOL_GEN_MINUTES: &str = "ESB_POOL_GEN_MINUTES";

const DEFAULT_EXCHANGE_FEED_MINUTES: u64 = 1;
const DEFAULT_POOL_GEN_MINUTES: u64 = 15;

/// Credentials and base URL for the Colossus exchange API.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Full daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub exchange: ExchangeConfig,
    /// Sleep between exchange reconciliation passes.
    pub exchange_feed_interval: Duration,
    /// Sleep between pool autogeneration passes.
    pub pool_gen_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: required(esb_db::ENV_DB_URL)?,
            exchange: ExchangeConfig {
                base_url: required(ENV_COLOSSUS_URL)?,
                api_key: required(ENV_COLOSSUS_API_KEY)?,
                api_secret: required(ENV_COLOSSUS_API_SECRET)?,
            },
            exchange_feed_interval: minutes_or(
                ENV_EXCHANGE_FEED_MINUTES,
                DEFAULT_EXCHANGE_FEED_MINUTES,
            )?,
            pool_gen_interval: minutes_or(ENV_POOL_GEN_MINUTES, DEFAULT_POOL_GEN_MINUTES)?,
        })
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("missing env var {name}"))
}

/// Reads a minute count from the environment, falling back to `default`
/// when unset. Zero is rejected: a zero interval would busy-loop a feeder.
fn minutes_or(name: &str, default: u64) -> Result<Duration> {
    let minutes = match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{name} is not a whole number of minutes: {raw:?}"))?,
        Err(_) => default,
    };
    if minutes == 0 {
        bail!("{name} must be at least 1 minute");
    }
    Ok(Duration::from_secs(minutes * 60))
}
