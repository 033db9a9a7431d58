//! Profile refresh controller.
//!
//! Owns the displayed snapshot and the auto-refresh timer. A search replaces
//! the snapshot wholesale; timer ticks only patch its follower count.
//!
//! Overlapping refreshes are allowed and the last one to complete wins.
//! Every search and platform switch starts a new generation, and a refresh
//! that began under an older generation is discarded when it completes.

mod timer;

use crate::core::errors::ControllerError;
use crate::core::models::{Platform, ProfileSnapshot};
use crate::core::notifications::Notice;
use crate::jobs::ProfileSource;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

pub use timer::{RefreshTimer, REFRESH_INTERVAL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Searching,
    Displaying,
    Refreshing,
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    StateChanged(Phase),
    SnapshotChanged(ProfileSnapshot),
    Notice(Notice),
}

struct ControllerInner {
    phase: Phase,
    platform: Platform,
    username: Option<String>,
    snapshot: Option<ProfileSnapshot>,
    generation: u64,
    refreshes_in_flight: usize,
}

struct Shared<S> {
    source: Arc<S>,
    inner: Arc<RwLock<ControllerInner>>,
    events: mpsc::UnboundedSender<ControllerEvent>,
}

impl<S> Clone for Shared<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            inner: Arc::clone(&self.inner),
            events: self.events.clone(),
        }
    }
}

impl<S: ProfileSource> Shared<S> {
    fn emit(&self, event: ControllerEvent) {
        let _ = self.events.send(event);
    }

    /// `expected` pins a timer tick to the session that scheduled it; a tick
    /// from an earlier session does nothing.
    async fn refresh(&self, expected: Option<u64>) {
        let (generation, platform, username, entered) = {
            let mut inner = self.inner.write().await;
            if inner.phase == Phase::Searching
                || expected.is_some_and(|generation| generation != inner.generation)
            {
                return;
            }
            let (Some(_), Some(username)) = (&inner.snapshot, &inner.username) else {
                return;
            };
            let username = username.clone();

            inner.refreshes_in_flight += 1;
            let entered = inner.phase != Phase::Refreshing;
            inner.phase = Phase::Refreshing;
            (inner.generation, inner.platform, username, entered)
        };

        if entered {
            self.emit(ControllerEvent::StateChanged(Phase::Refreshing));
        }

        let result = self.source.refresh_profile(platform, &username).await;

        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            tracing::debug!(%username, "Discarding refresh from a cancelled session");
            return;
        }
        inner.refreshes_in_flight = inner.refreshes_in_flight.saturating_sub(1);

        match result {
            Ok(fresh) => {
                if let Some(snapshot) = inner.snapshot.as_mut() {
                    tracing::debug!(
                        %username,
                        previous = snapshot.follower_count,
                        current = fresh.follower_count,
                        "Refreshed follower count"
                    );
                    snapshot.follower_count = fresh.follower_count;
                    snapshot.updated_at = Utc::now();
                    self.emit(ControllerEvent::SnapshotChanged(snapshot.clone()));
                }
            }
            Err(e) => {
                tracing::warn!(%username, error = %e, "Failed to refresh follower count");
            }
        }

        if inner.refreshes_in_flight == 0 {
            inner.phase = Phase::Displaying;
            self.emit(ControllerEvent::StateChanged(Phase::Displaying));
        }
    }
}

pub struct RefreshController<S: ProfileSource> {
    shared: Shared<S>,
    timer: Option<RefreshTimer>,
}

impl<S: ProfileSource> RefreshController<S> {
    pub fn new(
        source: Arc<S>,
        platform: Platform,
    ) -> (Self, mpsc::UnboundedReceiver<ControllerEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let inner = ControllerInner {
            phase: Phase::Idle,
            platform,
            username: None,
            snapshot: None,
            generation: 0,
            refreshes_in_flight: 0,
        };

        let controller = Self {
            shared: Shared {
                source,
                inner: Arc::new(RwLock::new(inner)),
                events,
            },
            timer: None,
        };
        (controller, events_rx)
    }

    pub async fn phase(&self) -> Phase {
        self.shared.inner.read().await.phase
    }

    pub async fn platform(&self) -> Platform {
        self.shared.inner.read().await.platform
    }

    pub async fn snapshot(&self) -> Option<ProfileSnapshot> {
        self.shared.inner.read().await.snapshot.clone()
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.timer.is_some()
    }

    pub async fn search(&mut self, username: &str) -> Result<ProfileSnapshot, ControllerError> {
        let username = username.trim();
        if username.is_empty() {
            self.shared.emit(ControllerEvent::Notice(Notice::empty_username()));
            return Err(ControllerError::EmptyUsername);
        }

        self.stop_auto_refresh();
        let (platform, generation) = {
            let mut inner = self.shared.inner.write().await;
            inner.generation += 1;
            inner.refreshes_in_flight = 0;
            inner.phase = Phase::Searching;
            (inner.platform, inner.generation)
        };
        self.shared.emit(ControllerEvent::StateChanged(Phase::Searching));
        tracing::info!(%platform, username, "Searching profile");

        match self.shared.source.fetch_profile(platform, username).await {
            Ok(snapshot) => {
                {
                    let mut inner = self.shared.inner.write().await;
                    inner.snapshot = Some(snapshot.clone());
                    inner.username = Some(username.to_string());
                    inner.phase = Phase::Displaying;
                }
                self.shared.emit(ControllerEvent::SnapshotChanged(snapshot.clone()));
                self.shared.emit(ControllerEvent::StateChanged(Phase::Displaying));
                self.shared
                    .emit(ControllerEvent::Notice(Notice::profile_found(&snapshot)));

                self.start_auto_refresh(generation);
                Ok(snapshot)
            }
            Err(e) => {
                tracing::error!(%platform, username, error = %e, "Profile search failed");
                {
                    let mut inner = self.shared.inner.write().await;
                    inner.snapshot = None;
                    inner.username = None;
                    inner.phase = Phase::Idle;
                }
                self.shared.emit(ControllerEvent::StateChanged(Phase::Idle));
                self.shared
                    .emit(ControllerEvent::Notice(Notice::fetch_failed()));
                Err(e.into())
            }
        }
    }

    /// Re-fetches the current profile and patches its follower count.
    /// Failures are logged and never reach the caller.
    pub async fn refresh(&self) {
        self.shared.refresh(None).await;
    }

    pub async fn switch_platform(&mut self, platform: Platform) {
        self.stop_auto_refresh();

        {
            let mut inner = self.shared.inner.write().await;
            inner.generation += 1;
            inner.refreshes_in_flight = 0;
            inner.platform = platform;
            inner.snapshot = None;
            inner.username = None;
            inner.phase = Phase::Idle;
        }

        tracing::info!(%platform, "Switched platform");
        self.shared.emit(ControllerEvent::StateChanged(Phase::Idle));
    }

    fn start_auto_refresh(&mut self, generation: u64) {
        self.stop_auto_refresh();

        let shared = self.shared.clone();
        self.timer = Some(RefreshTimer::start(REFRESH_INTERVAL, move || {
            let shared = shared.clone();
            async move { shared.refresh(Some(generation)).await }
        }));
    }

    pub fn stop_auto_refresh(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

impl<S: ProfileSource> Drop for RefreshController<S> {
    fn drop(&mut self) {
        self.stop_auto_refresh();
    }
}
