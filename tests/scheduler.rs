mod common;

use common::*;
use std::time::Duration;
use treasury_rate_tracker::config::{FailurePolicy, FetchMode};
use treasury_rate_tracker::services::scheduler::RefreshScheduler;
use wiremock::{MockServer, ResponseTemplate};

async fn wait_until_ready(feed: &treasury_rate_tracker::services::feed::RateFeed) -> bool {
    for _ in 0..100 {
        if !feed.snapshot().await.loading {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn refreshes_immediately_then_on_each_tick() {
    let server = MockServer::start().await;
    mount_all_years(&server).await;
    let feed = feed_for(&server, FetchMode::Sequential, FailurePolicy::Clear);

    let scheduler = RefreshScheduler::start(feed.clone(), Duration::from_millis(200));
    assert!(wait_until_ready(&feed).await);
    assert_eq!(feed.snapshot().await.series.len(), 12);

    tokio::time::sleep(Duration::from_millis(500)).await;
    scheduler.stop().await;

    let cycles = server.received_requests().await.unwrap().len() / 6;
    assert!(cycles >= 2, "expected repeated refreshes, got {}", cycles);
}

#[tokio::test]
async fn no_requests_after_stop() {
    let server = MockServer::start().await;
    mount_all_years(&server).await;
    let feed = feed_for(&server, FetchMode::Concurrent, FailurePolicy::Clear);

    let scheduler = RefreshScheduler::start(feed.clone(), Duration::from_millis(100));
    assert!(wait_until_ready(&feed).await);
    scheduler.stop().await;
    // let anything already on the wire land before counting
    tokio::time::sleep(Duration::from_millis(100)).await;

    let seen = server.received_requests().await.unwrap().len();
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(server.received_requests().await.unwrap().len(), seen);
}

#[tokio::test]
async fn stopping_mid_refresh_discards_the_result() {
    let server = MockServer::start().await;
    for year in years() {
        mount_year(
            &server,
            year,
            ResponseTemplate::new(200)
                .set_body_string(year_body(year))
                .set_delay(Duration::from_millis(400)),
        )
        .await;
    }
    let feed = feed_for(&server, FetchMode::Sequential, FailurePolicy::Clear);

    let scheduler = RefreshScheduler::start(feed.clone(), Duration::from_secs(300));
    tokio::time::sleep(Duration::from_millis(100)).await;
    scheduler.stop().await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    let snapshot = feed.snapshot().await;
    assert!(snapshot.loading);
    assert!(snapshot.series.is_empty());
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn failed_tick_does_not_stop_the_schedule() {
    let server = MockServer::start().await;
    mount_year(&server, ANCHOR_YEAR, ResponseTemplate::new(500)).await;
    let feed = feed_for(&server, FetchMode::Sequential, FailurePolicy::Clear);

    let scheduler = RefreshScheduler::start(feed.clone(), Duration::from_millis(100));
    tokio::time::sleep(Duration::from_millis(350)).await;
    scheduler.stop().await;

    assert!(server.received_requests().await.unwrap().len() >= 2);
    assert!(feed.snapshot().await.error.is_some());
}

#[tokio::test]
async fn hung_request_does_not_stall_later_ticks() {
    let server = MockServer::start().await;
    for year in years() {
        mount_year(
            &server,
            year,
            ResponseTemplate::new(200)
                .set_body_string(year_body(year))
                .set_delay(Duration::from_secs(30)),
        )
        .await;
    }
    let mut config = feed_config(&server, FetchMode::Sequential, FailurePolicy::Clear);
    config.request_timeout = None;
    let feed = std::sync::Arc::new(treasury_rate_tracker::services::feed::RateFeed::new(config).unwrap());

    let scheduler = RefreshScheduler::start(feed.clone(), Duration::from_millis(100));
    tokio::time::sleep(Duration::from_millis(1000)).await;
    scheduler.stop().await;

    let attempts = server.received_requests().await.unwrap().len();
    assert!(attempts > 1, "expected a fresh attempt on later ticks, got {}", attempts);
}
