// src/handlers/rates.rs
use log::{debug, info, warn};
use serde::Deserialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::LookbackWindow;
use crate::services::dashboard::build_view;
use crate::services::feed::RateFeed;

#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub window: Option<String>,
}

/// Current widget state for the requested lookback window (default 30).
pub async fn get_ten_year(query: WindowQuery, feed: Arc<RateFeed>) -> Result<Json, Rejection> {
    info!("Handling request for 10-year rates, window {:?}", query.window);

    let window = match query.window.as_deref() {
        Some(raw) => raw.parse::<LookbackWindow>().map_err(|e| {
            warn!("Rejecting request: {}", e);
            warp::reject::custom(ApiError::bad_request(e.to_string()))
        })?,
        None => LookbackWindow::default(),
    };

    let snapshot = feed.snapshot().await;
    debug!(
        "Serving snapshot: loading={}, error={:?}, {} records",
        snapshot.loading,
        snapshot.error,
        snapshot.series.len()
    );

    Ok(warp::reply::json(&build_view(&snapshot, window)))
}
