use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

const DEFAULT_URL: &str = "https://www.forexfactory.com/calendar";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36";

/// Runtime settings, overridable with `CALENDAR_*` environment variables
/// (e.g. `CALENDAR_DB_PATH=/tmp/cal.sqlite`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub url: String,
    pub user_agent: String,
    pub accept_language: String,
    pub referer: String,
    pub timeout_secs: u64,
    pub db_path: String,
    /// Reuse the latest snapshot if it is younger than this. 0 disables.
    pub cache_ttl_secs: u64,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_builder(Config::builder().add_source(
            Environment::with_prefix("CALENDAR").try_parsing(true),
        ))
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        builder
            .set_default("url", DEFAULT_URL)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("accept_language", "en-US,en;q=0.9")?
            .set_default("referer", "https://www.forexfactory.com/")?
            .set_default("timeout_secs", 30)?
            .set_default("db_path", "data/calendar.sqlite")?
            .set_default("cache_ttl_secs", 0)?
            .build()?
            .try_deserialize()
            .context("Invalid calendar settings")
    }
}
