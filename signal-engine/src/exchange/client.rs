//! HTTP candle source

use crate::data::{parse_candles, Candle};
use crate::error::FetchError;
use async_trait::async_trait;
use chrono_tz::Tz;
use std::time::Duration;
use tracing::{debug, warn};

/// Default intraday candle endpoint (Upstox v2)
pub const UPSTOX_INTRADAY_URL: &str = "https://api.upstox.com/v2/market/candle/intraday";

/// Source of recent candles for a single instrument.
///
/// Implementations never fail outward: any transport, status, or payload
/// problem is logged and reported as an empty sequence, and the next poll is
/// the retry.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Human-readable source name for logs
    fn name(&self) -> &str;

    /// Most recent candles, oldest first, or empty on failure
    async fn fetch_candles(&self) -> Vec<Candle>;
}

/// Candle request parameters
#[derive(Debug, Clone)]
pub struct CandleRequest {
    /// Endpoint URL
    pub url: String,
    /// Vendor instrument identifier (e.g. "BSE_INDEX|SENSEX")
    pub instrument_key: String,
    /// Vendor interval parameter (e.g. "5minute")
    pub interval: String,
    /// Bearer token
    pub access_token: Option<String>,
    /// Sent as `Api-Key` when the vendor wants it alongside the token
    pub api_key: Option<String>,
    /// Number of most recent candles to keep
    pub window: usize,
    /// Request timeout
    pub timeout: Duration,
    /// Exchange zone, used for naive timestamps in the payload
    pub timezone: Tz,
}

impl Default for CandleRequest {
    fn default() -> Self {
        Self {
            url: UPSTOX_INTRADAY_URL.to_string(),
            instrument_key: "BSE_INDEX|SENSEX".to_string(),
            interval: "5minute".to_string(),
            access_token: None,
            api_key: None,
            window: 10,
            timeout: Duration::from_secs(10),
            timezone: chrono_tz::Asia::Kolkata,
        }
    }
}

/// Candle source over a vendor REST endpoint
#[derive(Debug, Clone)]
pub struct HttpCandleSource {
    request: CandleRequest,
    client: reqwest::Client,
}

impl HttpCandleSource {
    /// Create a new source with a client bounded by the request timeout
    pub fn new(request: CandleRequest) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(request.timeout)
            .build()?;

        Ok(Self { request, client })
    }

    /// Fetch and normalize candles, surfacing the failure reason
    pub async fn try_fetch(&self) -> Result<Vec<Candle>, FetchError> {
        let mut builder = self
            .client
            .get(&self.request.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("instrument_key", self.request.instrument_key.as_str()),
                ("interval", self.request.interval.as_str()),
            ]);
        if let Some(token) = &self.request.access_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(api_key) = &self.request.api_key {
            builder = builder.header("Api-Key", api_key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }

        let body: serde_json::Value = response.json().await?;
        let mut series = parse_candles(&body, self.request.timezone)?;
        let received = series.len();
        series.truncate_to_recent(self.request.window);
        debug!(
            "Fetched {} candles for {} (keeping {})",
            received,
            self.request.instrument_key,
            series.len()
        );

        Ok(series.into_vec())
    }
}

#[async_trait]
impl CandleSource for HttpCandleSource {
    fn name(&self) -> &str {
        &self.request.url
    }

    async fn fetch_candles(&self) -> Vec<Candle> {
        match self.try_fetch().await {
            Ok(candles) => candles,
            Err(e) => {
                warn!("Candle fetch for {} failed: {}", self.request.instrument_key, e);
                Vec::new()
            }
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}…", cut)
    }
}
