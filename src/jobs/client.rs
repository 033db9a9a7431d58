use crate::core::errors::JobError;
use crate::core::models::{
    capitalize, generated_avatar_url, JobStatus, Platform, ProfileSnapshot, RawProfileItem,
};
use crate::jobs::{JobApi, ProfileSource};
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::time::Duration;
use tokio::time::Instant;

pub const POLL_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(30);

const PLACEHOLDER_FOLLOWERS: std::ops::Range<u64> = 100_000..10_100_000;
const PLACEHOLDER_VERIFIED_ODDS: f64 = 0.3;

/// Drives a job from submission to normalized profile.
pub struct JobClient<A> {
    api: A,
    max_wait: Duration,
    allow_mock_fallback: bool,
}

impl<A: JobApi> JobClient<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            max_wait: DEFAULT_MAX_WAIT,
            allow_mock_fallback: true,
        }
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn with_mock_fallback(mut self, allow: bool) -> Self {
        self.allow_mock_fallback = allow;
        self
    }

    /// Polls every [`POLL_DELAY`] until the job reaches a terminal status,
    /// returning the result set id on success.
    pub async fn await_completion(&self, job_id: &str, max_wait: Duration) -> Result<String, JobError> {
        let started = Instant::now();

        while started.elapsed() < max_wait {
            let handle = self.api.poll_status(job_id).await?;

            match handle.status {
                JobStatus::Succeeded => {
                    return handle
                        .result_set_id
                        .filter(|id| !id.is_empty())
                        .ok_or_else(|| JobError::MissingResultSet {
                            job_id: job_id.to_string(),
                        });
                }
                status if status.is_terminal() => {
                    return Err(JobError::JobFailed {
                        job_id: job_id.to_string(),
                        status,
                    });
                }
                status => {
                    tracing::debug!(job_id, %status, elapsed = ?started.elapsed(), "Job still in progress");
                }
            }

            tokio::time::sleep(POLL_DELAY).await;
        }

        Err(JobError::JobTimeout {
            job_id: job_id.to_string(),
            waited: started.elapsed(),
        })
    }

    /// Full pipeline without the placeholder fallback.
    pub async fn try_fetch_profile(
        &self,
        platform: Platform,
        username: &str,
    ) -> Result<ProfileSnapshot, JobError> {
        let job = self.api.submit_job(platform, username).await?;
        let result_set_id = self.await_completion(&job.id, self.max_wait).await?;
        let items = self.api.fetch_results(&result_set_id).await?;

        let item = items
            .into_iter()
            .next()
            .ok_or(JobError::NoItems { result_set_id })?;

        Ok(normalize_item(item, username))
    }
}

#[async_trait]
impl<A: JobApi + 'static> ProfileSource for JobClient<A> {
    async fn fetch_profile(
        &self,
        platform: Platform,
        username: &str,
    ) -> Result<ProfileSnapshot, JobError> {
        match self.try_fetch_profile(platform, username).await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) if self.allow_mock_fallback => {
                tracing::warn!(
                    %platform,
                    username,
                    error = %e,
                    job_outcome = e.is_job_outcome(),
                    "Profile fetch failed, using placeholder"
                );
                Ok(placeholder_snapshot(username))
            }
            Err(e) => Err(e),
        }
    }

    async fn refresh_profile(
        &self,
        platform: Platform,
        username: &str,
    ) -> Result<ProfileSnapshot, JobError> {
        self.try_fetch_profile(platform, username).await
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub fn normalize_item(item: RawProfileItem, username: &str) -> ProfileSnapshot {
    let username = item
        .username
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| username.to_string());

    let avatar_url = non_empty(item.profile_pic_url)
        .or_else(|| non_empty(item.avatar_larger))
        .unwrap_or_else(|| generated_avatar_url(&username));

    let display_name = non_empty(item.display_name)
        .or_else(|| non_empty(item.nickname))
        .or_else(|| non_empty(item.full_name))
        .unwrap_or_else(|| capitalize(&username));

    let follower_count = item
        .followers
        .filter(|&count| count > 0)
        .or(item.followers_count)
        .unwrap_or(0);

    ProfileSnapshot {
        follower_count,
        avatar_url,
        display_name: Some(display_name),
        verified: Some(item.verified.unwrap_or(false)),
        updated_at: Utc::now(),
        username,
    }
}

/// Locally fabricated profile shown when the remote pipeline fails.
pub fn placeholder_snapshot(username: &str) -> ProfileSnapshot {
    let mut rng = rand::rng();

    ProfileSnapshot {
        username: username.to_string(),
        follower_count: rng.random_range(PLACEHOLDER_FOLLOWERS),
        avatar_url: generated_avatar_url(username),
        display_name: Some(capitalize(username)),
        verified: Some(rng.random_bool(PLACEHOLDER_VERIFIED_ODDS)),
        updated_at: Utc::now(),
    }
}
