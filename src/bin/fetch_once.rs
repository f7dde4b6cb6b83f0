// src/bin/fetch_once.rs
use dotenv::dotenv;
use log::info;
use treasury_rate_tracker::config::AppConfig;
use treasury_rate_tracker::models::LookbackWindow;
use treasury_rate_tracker::services::calculations::latest_change;
use treasury_rate_tracker::services::feed::RateFeed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env()?;
    let feed = RateFeed::new(config.feed)?;
    info!("Fetching years {:?}", feed.years());

    let series = feed.fetch_series().await?;
    let change = latest_change(&series);

    println!("Records:             {}", series.len());
    if let Some(latest) = series.latest() {
        println!("Latest 10y yield:    {}% on {}", latest.ten_year_rate, latest.date);
    }
    println!("Change:              {} (increased: {})", change.change, change.increased);
    for window in LookbackWindow::ALL {
        let selected = series.select(window);
        let oldest = selected.last().map(|r| r.date.as_str()).unwrap_or("N/A");
        println!("{:>4} window:        {} records back to {}", window.button_label(), selected.len(), oldest);
    }
    Ok(())
}
