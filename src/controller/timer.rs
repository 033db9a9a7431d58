use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Repeating timer that spawns a fresh `tick` future every period. Each tick
/// runs as its own task, so a slow tick never delays the next one.
///
/// The background task is aborted when the timer is dropped.
pub struct RefreshTimer {
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    pub fn start<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                tokio::spawn(tick());
            }
        });

        tracing::info!("Auto-refresh started (interval: {:?})", period);
        Self { handle }
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!("Auto-refresh stopped");
    }
}
