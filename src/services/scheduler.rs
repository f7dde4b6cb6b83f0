// src/services/scheduler.rs
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::feed::RateFeed;

/// Refreshes the feed immediately and then on every tick until stopped.
///
/// A cycle that outlives one interval is abandoned and reported as failed.
pub struct RefreshScheduler {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RefreshScheduler {
    pub fn start(feed: Arc<RateFeed>, every: Duration) -> Self {
        let (shutdown, mut stop_rx) = watch::channel(false);
        info!("Starting refresh scheduler, interval {:?}", every);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = stop_rx.changed() => break,
                }

                debug!("Refresh tick");
                tokio::select! {
                    // a hung cycle must not hold up later ticks
                    result = feed.refresh_within(every) => {
                        if let Err(e) = result {
                            warn!("Scheduled refresh failed, next attempt in {:?}: {}", every, e);
                        }
                    }
                    _ = stop_rx.changed() => {
                        info!("Scheduler stopped mid-refresh, discarding in-flight result");
                        break;
                    }
                }
            }
            info!("Refresh scheduler exited");
        });

        RefreshScheduler { shutdown, handle }
    }

    /// Cancel the interval and wait for the task to wind down.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            warn!("Refresh scheduler task ended abnormally: {}", e);
        }
    }
}
