// src/services/calculations.rs
use log::warn;

use crate::models::{RateChange, RateSeries, YearlyRecord};

pub const INVALID_DATE: &str = "Invalid Date";

/// Signed move from the second-newest to the newest record, to two decimals.
///
/// Fewer than two records, or a rate that is not a number, yields a zero change.
pub fn latest_change(series: &RateSeries) -> RateChange {
    let records = series.records();
    if records.len() < 2 {
        return RateChange::zero();
    }

    let (current, previous) = match (records[0].rate(), records[1].rate()) {
        (Some(c), Some(p)) => (c, p),
        _ => {
            warn!(
                "Non-numeric rate in latest records ({:?}, {:?}); reporting no change",
                records[0].ten_year_rate, records[1].ten_year_rate
            );
            return RateChange::zero();
        }
    };

    let mut delta = ((current - previous) * 100.0).round() / 100.0;
    if delta == 0.0 {
        // avoid "-0.00"
        delta = 0.0;
    }

    RateChange {
        change: format!("{:.2}", delta),
        increased: delta > 0.0,
    }
}

/// Axis label such as "Jan 2, 2024".
pub fn chart_label(record: &YearlyRecord) -> String {
    record
        .parsed_date()
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

/// Caption date such as "January 2, 2024".
pub fn caption_date(record: &YearlyRecord) -> String {
    record
        .parsed_date()
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}
