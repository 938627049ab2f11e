use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use once_cell::sync::Lazy;
use log::{debug, info, warn};
use serde_json::json;

use crate::config::ScrapeConfig;
use crate::error::{AppError, Result};
use crate::models::{RemoteBody, ScrapeOutcome, ScrapedRecord};
use crate::normalize::normalize;
use crate::progress::{ProgressFn, ProgressTicker, TickerSettings};

const ENDPOINT_PATH: &str = "functions/v1/scraping-apontador";

// Create a static client to reuse connections
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

/// Coordinates one scrape request end to end: drives the progress ticker,
/// issues the HTTP call, normalizes the response.
pub struct ScrapeClient {
    config: ScrapeConfig,
    ticker: TickerSettings,
}

impl ScrapeClient {
    pub fn new(config: ScrapeConfig) -> Self {
        ScrapeClient {
            config,
            ticker: TickerSettings::default(),
        }
    }

    pub fn with_ticker(mut self, settings: TickerSettings) -> Self {
        self.ticker = settings;
        self
    }

    /// Runs one scrape. Every failure mode (missing configuration, transport
    /// errors, remote errors, malformed bodies) is folded into the returned
    /// outcome; this never returns `Err` and never panics.
    pub async fn scrape_url(&self, url: &str, on_progress: Option<ProgressFn>) -> ScrapeOutcome {
        // The ticker is stopped on every exit path: awaited shutdown below,
        // or Drop-abort if this future is cancelled mid-request.
        let ticker = on_progress
            .clone()
            .map(|cb| ProgressTicker::spawn(self.ticker.clone(), cb));
        let result = self.run(url).await;
        if let Some(ticker) = ticker {
            ticker.shutdown().await;
        }

        match result {
            Ok((records, file_base64)) => {
                if let Some(cb) = &on_progress {
                    cb(100.0);
                }
                info!("Scrape of {} returned {} records", url, records.len());
                ScrapeOutcome::Success {
                    results: records,
                    file_base64,
                }
            }
            Err(err) => {
                warn!("Scrape of {} failed: {}", url, err);
                ScrapeOutcome::Failure {
                    error: err.to_string(),
                }
            }
        }
    }

    async fn run(&self, url: &str) -> Result<(Vec<ScrapedRecord>, Option<String>)> {
        if url.is_empty() {
            return Err(AppError::ConfigError("No target URL was provided".to_string()));
        }

        let base = self
            .config
            .base_url
            .as_deref()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| {
                AppError::ConfigError(
                    "SCRAPE_BASE_URL is not set. Configure the remote scrape endpoint before submitting requests".to_string(),
                )
            })?;

        let endpoint = format!("{}/{}", base.trim_end_matches('/'), ENDPOINT_PATH);
        debug!("POST {}", endpoint);

        let response = CLIENT
            .post(&endpoint)
            .bearer_auth(&self.config.token)
            .json(&json!({ "url": url }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::RemoteError(remote_message(status, response).await));
        }

        let body: RemoteBody = response
            .json()
            .await
            .map_err(|e| AppError::ParseError(e.to_string()))?;
        let (raw, file_base64) = body.into_parts();
        Ok((normalize(raw), file_base64))
    }
}

/// Prefers the server-supplied `error` field; falls back to the status line.
async fn remote_message(status: StatusCode, response: reqwest::Response) -> String {
    let fallback = format!(
        "Error {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("unknown status")
    );
    match response.json::<serde_json::Value>().await {
        Ok(body) => body
            .get("error")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or(fallback),
        Err(_) => fallback,
    }
}
