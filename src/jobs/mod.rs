mod apify;
mod client;

use crate::core::errors::JobError;
use crate::core::models::{JobHandle, Platform, ProfileSnapshot, RawProfileItem};
use async_trait::async_trait;

pub use apify::ApifyApi;
pub use client::JobClient;

/// The three calls of the remote job workflow.
#[async_trait]
pub trait JobApi: Send + Sync {
    async fn submit_job(&self, platform: Platform, username: &str) -> Result<JobHandle, JobError>;
    async fn poll_status(&self, job_id: &str) -> Result<JobHandle, JobError>;
    async fn fetch_results(&self, result_set_id: &str) -> Result<Vec<RawProfileItem>, JobError>;
}

/// Anything that can produce a fresh profile snapshot for the controller.
#[async_trait]
pub trait ProfileSource: Send + Sync + 'static {
    async fn fetch_profile(
        &self,
        platform: Platform,
        username: &str,
    ) -> Result<ProfileSnapshot, JobError>;

    /// Fetch used for periodic refreshes. Must report failures rather than
    /// fabricate data, so the last good snapshot stays on screen.
    async fn refresh_profile(
        &self,
        platform: Platform,
        username: &str,
    ) -> Result<ProfileSnapshot, JobError> {
        self.fetch_profile(platform, username).await
    }
}
