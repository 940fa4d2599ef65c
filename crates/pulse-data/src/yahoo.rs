//! Yahoo Finance data source.
//!
//! Fetches daily history from the v8 chart API. A single request is made per
//! call; retrying is left to the caller's retry policy.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use pulse_core::error::DataError;
use pulse_core::traits::DataSource;
use pulse_core::types::{RawObservation, RawSeries};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Yahoo client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Scale prices by the adjusted close (splits and dividends)
    pub adjust: bool,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query2.finance.yahoo.com".to_string(),
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36".to_string(),
            adjust: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance data source.
pub struct YahooDataSource {
    client: Client,
    config: YahooConfig,
}

impl YahooDataSource {
    /// Create a new Yahoo data source.
    pub fn new(config: YahooConfig) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| DataError::Internal(format!("HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn chart_url(&self, symbol: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&includeAdjustedClose=true",
            self.config.base_url.trim_end_matches('/'),
            symbol,
            start.timestamp(),
            end.timestamp()
        )
    }

    fn parse_response(
        symbol: &str,
        resp: ChartResponse,
        adjust: bool,
    ) -> Result<RawSeries, DataError> {
        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound(symbol.to_string()),
            Some(err) => DataError::ParseError(format!("{}: {}", err.code, err.description)),
            None => DataError::ParseError("empty result with no error".into()),
        })?;

        let Some(data) = result.into_iter().next() else {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        };

        let timestamps = data.timestamp.unwrap_or_default();
        if timestamps.is_empty() {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }

        let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let at = |v: &[Option<f64>], i: usize| v.get(i).copied().flatten();

        let mut observations = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| DataError::ParseError(format!("invalid timestamp: {}", ts)))?;

            let mut obs = RawObservation {
                date,
                open: at(&quote.open, i),
                high: at(&quote.high, i),
                low: at(&quote.low, i),
                close: at(&quote.close, i),
                volume: at(&quote.volume, i),
            };

            if adjust {
                adjust_to_close(&mut obs, adj_closes.as_deref().and_then(|v| at(v, i)));
            }

            observations.push(obs);
        }

        Ok(RawSeries::from_unsorted(symbol, observations))
    }
}

/// Scale open, high and low by `adjusted / close` and replace the close.
///
/// Leaves the observation untouched when either close is missing or zero.
pub(crate) fn adjust_to_close(obs: &mut RawObservation, adjusted: Option<f64>) {
    if let (Some(adj), Some(close)) = (adjusted, obs.close) {
        if close != 0.0 {
            let ratio = adj / close;
            obs.open = obs.open.map(|p| p * ratio);
            obs.high = obs.high.map(|p| p * ratio);
            obs.low = obs.low.map(|p| p * ratio);
            obs.close = Some(adj);
        }
    }
}

fn request_error(e: reqwest::Error) -> DataError {
    if e.is_timeout() || e.is_connect() || e.is_request() {
        DataError::ConnectionError(e.to_string())
    } else {
        DataError::Internal(e.to_string())
    }
}

#[async_trait]
impl DataSource for YahooDataSource {
    async fn fetch(&self, symbol: &str, lookback_days: u32) -> Result<RawSeries, DataError> {
        let end = Utc::now();
        let start = end - ChronoDuration::days(i64::from(lookback_days));
        let url = self.chart_url(symbol, start, end);

        debug!(symbol, %url, "Requesting chart");

        let response = self.client.get(&url).send().await.map_err(request_error)?;
        let status = response.status();

        match status {
            StatusCode::NOT_FOUND => return Err(DataError::SymbolNotFound(symbol.to_string())),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);
                return Err(DataError::RateLimited { retry_after_secs });
            }
            s if !s.is_success() => {
                let message = response.text().await.unwrap_or_default();
                return Err(DataError::Http {
                    status: s.as_u16(),
                    message: message.chars().take(200).collect(),
                });
            }
            _ => {}
        }

        let body: ChartResponse = response
            .json()
            .await
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let series = Self::parse_response(symbol, body, self.config.adjust)?;
        debug!(symbol, rows = series.len(), "Fetched chart");
        Ok(series)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}
