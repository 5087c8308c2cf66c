// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Time-tracking adapter backed by the WakaTime stats API.
///
/// An absent credential is not an error: it is modelled as an unconfigured
/// source that answers [`CodingStats::NotConfigured`] without touching the
/// network.
use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use masterror::AppError;
use serde::Deserialize;
use tracing::debug;

use crate::fallback::SourceResult;

/// Default API root.
pub const WAKATIME_API_URL: &str = "https://wakatime.com/api/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Stats window supported by the time-tracking source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsRange {
    Last7Days,
    Last30Days
}

impl StatsRange {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Last7Days => "last_7_days",
            Self::Last30Days => "last_30_days"
        }
    }
}

/// Coding statistics for one window.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WakaTimeStats {
    #[serde(default)]
    pub total_seconds: f64,
    #[serde(default)]
    pub languages:     Vec<WakaTimeLanguage>
}

/// Per-language entry, in the source's own ordering.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WakaTimeLanguage {
    pub name:          String,
    pub total_seconds: f64,
    pub percent:       f64
}

/// Result of a stats request: either data or the "not configured" sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum CodingStats {
    NotConfigured,
    Available(WakaTimeStats)
}

impl CodingStats {
    /// Returns the stats when the source is configured.
    pub fn into_available(self) -> Option<WakaTimeStats> {
        match self {
            Self::NotConfigured => None,
            Self::Available(stats) => Some(stats)
        }
    }
}

/// Operations the aggregator needs from the time-tracking service.
#[allow(async_fn_in_trait)]
pub trait TimeTrackingSource {
    /// Returns `false` when no credential is available. Checked before any
    /// request is issued.
    fn is_configured(&self) -> bool;

    /// Fetches stats for `range`.
    async fn coding_stats(&self, range: StatsRange) -> SourceResult<CodingStats>;
}

impl<T> TimeTrackingSource for Option<T>
where
    T: TimeTrackingSource
{
    fn is_configured(&self) -> bool {
        self.as_ref().is_some_and(TimeTrackingSource::is_configured)
    }

    async fn coding_stats(&self, range: StatsRange) -> SourceResult<CodingStats> {
        match self {
            Some(source) => source.coding_stats(range).await,
            None => Ok(CodingStats::NotConfigured)
        }
    }
}

/// reqwest-backed WakaTime client authenticated with an API key.
#[derive(Debug, Clone)]
pub struct WakaTimeClient {
    http:     reqwest::Client,
    api_key:  String,
    base_url: String
}

impl WakaTimeClient {
    /// Builds a client for the public API.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when the HTTP client cannot be built.
    pub fn new(api_key: &str) -> SourceResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::internal(format!("failed to build WakaTime client: {e}")))?;

        Ok(Self {
            http,
            api_key: api_key.to_owned(),
            base_url: WAKATIME_API_URL.to_owned()
        })
    }

    /// Overrides the API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn stats_url(&self, range: StatsRange) -> String {
        format!(
            "{}/users/current/stats/{}",
            self.base_url.trim_end_matches('/'),
            range.as_str()
        )
    }

    fn authorization(&self) -> String {
        format!("Basic {}", STANDARD.encode(&self.api_key))
    }
}

impl TimeTrackingSource for WakaTimeClient {
    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn coding_stats(&self, range: StatsRange) -> SourceResult<CodingStats> {
        if !self.is_configured() {
            return Ok(CodingStats::NotConfigured);
        }

        debug!("Fetching WakaTime stats for {}", range.as_str());
        let response = self
            .http
            .get(self.stats_url(range))
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .send()
            .await
            .map_err(|e| AppError::service(format!("WakaTime request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::service(format!("WakaTime API returned {status}")));
        }

        let envelope: StatsEnvelope = response
            .json()
            .await
            .map_err(|e| AppError::validation(format!("unexpected WakaTime payload: {e}")))?;

        Ok(CodingStats::Available(envelope.data))
    }
}

#[derive(Debug, Deserialize)]
struct StatsEnvelope {
    data: WakaTimeStats
}
