use anyhow::Context;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use treasury_rate_tracker::config::AppConfig;
use treasury_rate_tracker::routes;
use treasury_rate_tracker::services::feed::RateFeed;
use treasury_rate_tracker::services::scheduler::RefreshScheduler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = AppConfig::from_env()?;

    let feed = Arc::new(RateFeed::new(config.feed.clone()).context("failed to build HTTP client")?);
    let scheduler = RefreshScheduler::start(feed.clone(), config.refresh_interval);

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    let api = routes::routes(feed).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    let (_, server) = warp::serve(api).bind_with_graceful_shutdown(addr, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutdown signal received");
    });
    server.await;

    scheduler.stop().await;
    info!("Stopped cleanly");
    Ok(())
}
