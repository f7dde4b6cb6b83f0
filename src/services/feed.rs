// src/services/feed.rs
use chrono::{Datelike, Utc};
use futures::future::try_join_all;
use log::{error, info};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::config::{FailurePolicy, FeedConfig, FetchMode, MAX_YEARS_BACK};
use crate::error::FeedError;
use crate::models::{FeedSnapshot, LookbackWindow, RateChange, RateSeries, YearlyRecord};
use crate::services::{calculations, treasury};

/// Source of the 10-year series and sole writer of the published snapshot.
pub struct RateFeed {
    client: Client,
    config: FeedConfig,
    snapshot: RwLock<Arc<FeedSnapshot>>,
}

impl RateFeed {
    pub fn new(config: FeedConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, config))
    }

    pub fn with_client(client: Client, config: FeedConfig) -> Self {
        RateFeed {
            client,
            config,
            snapshot: RwLock::new(Arc::new(FeedSnapshot::initial())),
        }
    }

    /// The anchor year and the `years_back` years before it, newest first.
    pub fn years(&self) -> Vec<i32> {
        let newest = self.config.anchor_year.unwrap_or_else(|| Utc::now().year());
        let back = i32::try_from(self.config.years_back.min(MAX_YEARS_BACK)).unwrap_or_default();
        (0..=back).map(|i| newest - i).collect()
    }

    /// Fetch every year and build a fresh series without publishing it.
    pub async fn fetch_series(&self) -> Result<RateSeries, FeedError> {
        let years = self.years();
        let base_url = self.config.base_url.as_str();

        let per_year: Vec<Vec<YearlyRecord>> = match self.config.fetch_mode {
            FetchMode::Sequential => {
                let mut out = Vec::with_capacity(years.len());
                for &year in &years {
                    out.push(treasury::fetch_year_records(&self.client, base_url, year).await?);
                }
                out
            }
            FetchMode::Concurrent => {
                // the first error drops the remaining requests
                try_join_all(
                    years
                        .iter()
                        .map(|&year| treasury::fetch_year_records(&self.client, base_url, year)),
                )
                .await?
            }
        };

        let records: Vec<YearlyRecord> = per_year.into_iter().flatten().collect();
        Ok(RateSeries::from_records(records))
    }

    /// Run one refresh cycle and publish its outcome.
    ///
    /// Readers see the previous snapshot or the new one, never a mix. On
    /// failure the error is published according to the failure policy and
    /// also returned.
    pub async fn refresh(&self) -> Result<(), FeedError> {
        {
            let mut guard = self.snapshot.write().await;
            let next = guard.refreshing();
            *guard = Arc::new(next);
        }

        let started = Utc::now();
        match self.fetch_series().await {
            Ok(series) => {
                info!(
                    "Refresh complete: {} records across {} years in {} ms",
                    series.len(),
                    self.years().len(),
                    (Utc::now() - started).num_milliseconds()
                );
                *self.snapshot.write().await = Arc::new(FeedSnapshot::ready(series, Utc::now()));
                Ok(())
            }
            Err(e) => {
                self.publish_failure(&e).await;
                Err(e)
            }
        }
    }

    /// Like `refresh`, but a cycle still running after `limit` is abandoned
    /// and published as a transport failure.
    pub async fn refresh_within(&self, limit: Duration) -> Result<(), FeedError> {
        match tokio::time::timeout(limit, self.refresh()).await {
            Ok(result) => result,
            Err(_) => {
                let year = self.years().first().copied().unwrap_or_else(|| Utc::now().year());
                let err = FeedError::transport(
                    year,
                    format!("refresh cycle timed out after {} ms", limit.as_millis()),
                );
                self.publish_failure(&err).await;
                Err(err)
            }
        }
    }

    async fn publish_failure(&self, e: &FeedError) {
        error!("Error fetching treasury rates: {}", e);
        let keep = self.config.failure_policy == FailurePolicy::RetainLastGood;
        let mut guard = self.snapshot.write().await;
        let next = guard.failed(e.to_string(), keep);
        *guard = Arc::new(next);
    }

    pub async fn snapshot(&self) -> Arc<FeedSnapshot> {
        self.snapshot.read().await.clone()
    }

    pub async fn select(&self, window: LookbackWindow) -> Vec<YearlyRecord> {
        self.snapshot().await.series.select(window).to_vec()
    }

    pub async fn latest_change(&self) -> RateChange {
        calculations::latest_change(&self.snapshot().await.series)
    }
}
