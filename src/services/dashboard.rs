// src/services/dashboard.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ChartPoint, FeedSnapshot, LookbackWindow, RateChange};
use crate::services::calculations::{caption_date, chart_label, latest_change};

/// JSON body consumed by the chart widget.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub loading: bool,
    pub error: Option<String>,
    pub window: LookbackWindow,
    pub window_label: &'static str,
    pub current_rate: Option<String>,
    pub change: RateChange,
    pub last_updated: String,
    pub tick_step: usize,
    /// Oldest first, ready to plot left to right.
    pub points: Vec<ChartPoint>,
    pub fetched_at: Option<DateTime<Utc>>,
}

pub fn build_view(snapshot: &FeedSnapshot, window: LookbackWindow) -> DashboardView {
    let series = &snapshot.series;
    let latest = series.latest();

    let points = series
        .select(window)
        .iter()
        .rev()
        .map(|record| ChartPoint {
            label: chart_label(record),
            rate: record.rate(),
        })
        .collect();

    DashboardView {
        loading: snapshot.loading,
        error: snapshot.error.clone(),
        window,
        window_label: window.button_label(),
        current_rate: latest.map(|r| r.ten_year_rate.clone()),
        change: latest_change(series),
        last_updated: latest.map(caption_date).unwrap_or_else(|| "N/A".to_string()),
        tick_step: window.tick_step(),
        points,
        fetched_at: snapshot.fetched_at,
    }
}
