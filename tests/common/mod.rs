#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use treasury_rate_tracker::config::{FailurePolicy, FeedConfig, FetchMode};
use treasury_rate_tracker::services::feed::RateFeed;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ANCHOR_YEAR: i32 = 2024;
pub const HEADER: &str = "Date,1 Mo,2 Mo,3 Mo,6 Mo,1 Yr,2 Yr,5 Yr,10 Yr,20 Yr,30 Yr";

pub fn years() -> Vec<i32> {
    (0..6).map(|i| ANCHOR_YEAR - i).collect()
}

/// Two rows per year with the 10-year rate derived from the year. Odd years
/// list June before December so the merged series has to be re-sorted.
pub fn year_body(year: i32) -> String {
    let (dec, jun) = year_rates(year);
    let dec_row = format!("12/28/{},5.5,5.5,5.4,5.3,5.0,4.3,3.9,{},4.2,4.0", year, dec);
    let jun_row = format!("06/15/{},5.4,5.4,5.3,5.2,4.9,4.2,3.8,{},4.1,3.9", year, jun);
    let (first, second) = if year % 2 == 1 {
        (jun_row, dec_row)
    } else {
        (dec_row, jun_row)
    };
    format!("{}\n{}\n{}\n\n", HEADER, first, second)
}

pub fn year_rates(year: i32) -> (String, String) {
    let offset = (year - 2019) as f64 * 0.5;
    (format!("{:.2}", 1.5 + offset + 0.25), format!("{:.2}", 1.5 + offset))
}

pub async fn mount_year(server: &MockServer, year: i32, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/all", year)))
        .and(query_param("field_tdr_date_value", year.to_string()))
        .and(query_param("type", "daily_treasury_yield_curve"))
        .respond_with(template)
        .mount(server)
        .await;
}

pub async fn mount_all_years(server: &MockServer) {
    for year in years() {
        mount_year(server, year, ResponseTemplate::new(200).set_body_string(year_body(year))).await;
    }
}

pub fn feed_config(server: &MockServer, mode: FetchMode, policy: FailurePolicy) -> FeedConfig {
    FeedConfig {
        base_url: server.uri(),
        years_back: 5,
        anchor_year: Some(ANCHOR_YEAR),
        fetch_mode: mode,
        failure_policy: policy,
        request_timeout: Some(Duration::from_secs(5)),
    }
}

pub fn feed_for(server: &MockServer, mode: FetchMode, policy: FailurePolicy) -> Arc<RateFeed> {
    Arc::new(RateFeed::new(feed_config(server, mode, policy)).expect("client builds"))
}
