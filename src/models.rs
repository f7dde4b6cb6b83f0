// src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One row of a yearly Treasury feed, kept as the raw text tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyRecord {
    pub date: String,
    pub ten_year_rate: String,
}

impl YearlyRecord {
    pub fn new(date: impl Into<String>, ten_year_rate: impl Into<String>) -> Self {
        YearlyRecord {
            date: date.into(),
            ten_year_rate: ten_year_rate.into(),
        }
    }

    /// Feed dates are MM/DD/YYYY; ISO dates are accepted as well.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let token = self.date.trim();
        NaiveDate::parse_from_str(token, "%m/%d/%Y")
            .or_else(|_| NaiveDate::parse_from_str(token, "%Y-%m-%d"))
            .ok()
    }

    pub fn rate(&self) -> Option<f64> {
        self.ten_year_rate
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

/// Records from every fetched year, newest first.
///
/// Rows whose date cannot be parsed sort after all valid dates. The sort is
/// stable, so equal dates keep their source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateSeries {
    records: Vec<YearlyRecord>,
}

impl RateSeries {
    pub fn from_records(mut records: Vec<YearlyRecord>) -> Self {
        records.sort_by_key(|r| std::cmp::Reverse(r.parsed_date()));
        RateSeries { records }
    }

    pub fn records(&self) -> &[YearlyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&YearlyRecord> {
        self.records.first()
    }

    /// Most recent records for the window, counted by row rather than by calendar span.
    pub fn select(&self, window: LookbackWindow) -> &[YearlyRecord] {
        match window.limit() {
            Some(n) => &self.records[..n.min(self.records.len())],
            None => &self.records,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LookbackWindow {
    #[default]
    Days30,
    Days90,
    Days180,
    Days365,
    Max,
}

impl LookbackWindow {
    pub const ALL: [LookbackWindow; 5] = [
        LookbackWindow::Days30,
        LookbackWindow::Days90,
        LookbackWindow::Days180,
        LookbackWindow::Days365,
        LookbackWindow::Max,
    ];

    /// Number of records exposed, `None` for everything.
    pub fn limit(self) -> Option<usize> {
        match self {
            LookbackWindow::Days30 => Some(30),
            LookbackWindow::Days90 => Some(90),
            LookbackWindow::Days180 => Some(180),
            LookbackWindow::Days365 => Some(365),
            LookbackWindow::Max => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LookbackWindow::Days30 => "30",
            LookbackWindow::Days90 => "90",
            LookbackWindow::Days180 => "180",
            LookbackWindow::Days365 => "365",
            LookbackWindow::Max => "MAX",
        }
    }

    /// Label shown on the period selector button.
    pub fn button_label(self) -> &'static str {
        match self {
            LookbackWindow::Days30 => "30D",
            LookbackWindow::Days90 => "90D",
            LookbackWindow::Days180 => "180D",
            LookbackWindow::Days365 => "365D",
            LookbackWindow::Max => "5Y",
        }
    }

    /// Every n-th x-axis label is drawn so roughly 30 remain visible.
    pub fn tick_step(self) -> usize {
        let period = self.limit().unwrap_or(1000);
        period.div_ceil(30)
    }
}

impl fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWindow(pub String);

impl fmt::Display for UnknownWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unknown lookback window '{}'; expected one of 30, 90, 180, 365, MAX",
            self.0
        )
    }
}

impl std::error::Error for UnknownWindow {}

impl FromStr for LookbackWindow {
    type Err = UnknownWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case("max") {
            return Ok(LookbackWindow::Max);
        }
        LookbackWindow::ALL
            .into_iter()
            .find(|w| w.as_str() == token)
            .ok_or_else(|| UnknownWindow(s.to_string()))
    }
}

impl TryFrom<String> for LookbackWindow {
    type Error = UnknownWindow;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LookbackWindow> for String {
    fn from(window: LookbackWindow) -> Self {
        window.as_str().to_string()
    }
}

/// Day-over-day move between the two newest records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateChange {
    pub change: String,
    pub increased: bool,
}

impl RateChange {
    pub fn zero() -> Self {
        RateChange {
            change: "0.00".to_string(),
            increased: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub rate: Option<f64>,
}

/// Everything consumers can observe about the feed at one instant.
///
/// Snapshots are never edited; each state change publishes a new one.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    pub loading: bool,
    pub error: Option<String>,
    pub series: RateSeries,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl FeedSnapshot {
    pub fn initial() -> Self {
        FeedSnapshot {
            loading: true,
            ..FeedSnapshot::default()
        }
    }

    pub fn refreshing(&self) -> Self {
        FeedSnapshot {
            loading: true,
            error: None,
            series: self.series.clone(),
            fetched_at: self.fetched_at,
        }
    }

    pub fn ready(series: RateSeries, fetched_at: DateTime<Utc>) -> Self {
        FeedSnapshot {
            loading: false,
            error: None,
            series,
            fetched_at: Some(fetched_at),
        }
    }

    pub fn failed(&self, message: String, keep_series: bool) -> Self {
        FeedSnapshot {
            loading: false,
            error: Some(message),
            series: if keep_series {
                self.series.clone()
            } else {
                RateSeries::default()
            },
            fetched_at: if keep_series { self.fetched_at } else { None },
        }
    }
}
