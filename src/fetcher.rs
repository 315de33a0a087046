use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::Client;
use tracing::info;

use crate::settings::Settings;

/// HTTP client that presents itself as a desktop browser. The calendar site
/// serves a challenge page to the default reqwest user agent.
pub fn build_client(settings: &Settings) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(&settings.user_agent)?);
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&settings.accept_language)?);
    headers.insert(REFERER, HeaderValue::from_str(&settings.referer)?);

    let client = Client::builder()
        .default_headers(headers)
        .cookie_store(true)
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;
    Ok(client)
}

/// GET the calendar page and return its body. Non-2xx is an error.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    info!("Fetching calendar page: {}", url);
    let start = Instant::now();

    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
        .with_context(|| format!("Failed to read calendar page body from {url}"))?;

    info!(
        bytes = body.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "fetched calendar page"
    );
    Ok(body)
}
