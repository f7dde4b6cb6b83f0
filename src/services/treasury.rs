use csv::ReaderBuilder;
use log::{debug, info, warn};
use reqwest::Client;

use crate::error::FeedError;
use crate::models::YearlyRecord;

/// Header token identifying the 10-year constant maturity column.
pub const TEN_YEAR_COLUMN: &str = "10 Yr";

/// Yearly daily-yield-curve CSV under `base_url`.
pub fn year_url(base_url: &str, year: i32) -> String {
    format!(
        "{base}/{year}/all?type=daily_treasury_yield_curve\
&field_tdr_date_value={year}\
&term_to_maturity=10year",
        base = base_url.trim_end_matches('/'),
        year = year
    )
}

/// Download one year's CSV body. Any non-success status fails the year.
pub async fn fetch_year_csv(client: &Client, base_url: &str, year: i32) -> Result<String, FeedError> {
    let url = year_url(base_url, year);
    info!("Fetching 10-year yield CSV for {} from URL: {}", year, url);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| FeedError::transport(year, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        warn!("Treasury CSV for {} returned status {}", year, status);
        return Err(FeedError::transport(year, format!("HTTP status {}", status)));
    }

    response
        .text()
        .await
        .map_err(|e| FeedError::transport(year, format!("failed to read body: {}", e)))
}

/// Parse one year's CSV into records.
///
/// The header is only used to find the column containing "10 Yr"; the date
/// is always column 0 and is not validated here.
pub fn parse_year_csv(year: i32, body: &str) -> Result<Vec<YearlyRecord>, FeedError> {
    // the reader would skip leading blank lines; the header must be line 1
    if body.lines().next().map_or(true, |line| line.trim().is_empty()) {
        return Err(FeedError::schema(year, "first line is not a header row"));
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| FeedError::schema(year, format!("unreadable header row: {}", e)))?
        .clone();
    let idx_10yr = headers
        .iter()
        .position(|h| h.contains(TEN_YEAR_COLUMN))
        .ok_or_else(|| FeedError::schema(year, "could not find 10-year Treasury rate column in data"))?;
    debug!("Found '{}' at column {} for {}", TEN_YEAR_COLUMN, idx_10yr, year);

    let mut records = Vec::new();
    for (line, row) in rdr.records().enumerate() {
        let row = row.map_err(|e| FeedError::schema(year, format!("malformed row: {}", e)))?;
        // blank line; a row of bare commas is still a record
        if row.len() == 1 && row[0].trim().is_empty() {
            continue;
        }
        let rate = row.get(idx_10yr).ok_or_else(|| {
            FeedError::schema(year, format!("row {} has no '{}' field", line + 2, TEN_YEAR_COLUMN))
        })?;
        let date = row.get(0).unwrap_or_default();
        records.push(YearlyRecord::new(date, rate.trim()));
    }

    info!("Parsed {} records for {}", records.len(), year);
    Ok(records)
}

/// Download and parse a single year.
pub async fn fetch_year_records(
    client: &Client,
    base_url: &str,
    year: i32,
) -> Result<Vec<YearlyRecord>, FeedError> {
    let body = fetch_year_csv(client, base_url, year).await?;
    parse_year_csv(year, &body)
}
