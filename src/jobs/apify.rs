use crate::core::errors::JobError;
use crate::core::models::{JobHandle, Platform, RawProfileItem};
use crate::core::settings::ApiSettings;
use crate::jobs::JobApi;
use async_trait::async_trait;
use serde::Deserialize;

const RUN_TIMEOUT_SECS: &str = "60";
const RUN_MEMORY_MB: &str = "256";

#[derive(Debug, Deserialize)]
struct RunEnvelope {
    data: JobHandle,
}

/// Apify v2 REST binding of the job workflow: actor runs are jobs and
/// datasets are result sets.
pub struct ApifyApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    instagram_actor: String,
    tiktok_actor: String,
}

impl ApifyApi {
    pub fn new(settings: &ApiSettings) -> Self {
        if settings.token.is_none() {
            tracing::warn!("No API token configured, requests will be unauthenticated");
        }

        Self {
            client: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
            instagram_actor: settings.actor_for(Platform::Instagram).to_string(),
            tiktok_actor: settings.actor_for(Platform::Tiktok).to_string(),
        }
    }

    fn actor(&self, platform: Platform) -> &str {
        match platform {
            Platform::Instagram => &self.instagram_actor,
            Platform::Tiktok => &self.tiktok_actor,
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn error_body(response: reqwest::Response) -> String {
    response.text().await.unwrap_or_default()
}

#[async_trait]
impl JobApi for ApifyApi {
    async fn submit_job(&self, platform: Platform, username: &str) -> Result<JobHandle, JobError> {
        let url = format!("{}/acts/{}/runs", self.base_url, self.actor(platform));
        let response = self
            .authorize(self.client.post(&url))
            .query(&[("timeout", RUN_TIMEOUT_SECS), ("memory", RUN_MEMORY_MB)])
            .json(&platform.job_input(username))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(JobError::Submission {
                platform,
                status,
                body: error_body(response).await,
            });
        }

        let envelope: RunEnvelope = response.json().await?;
        tracing::info!(
            %platform,
            username,
            job_id = %envelope.data.id,
            status = %envelope.data.status,
            "Submitted scrape job"
        );
        Ok(envelope.data)
    }

    async fn poll_status(&self, job_id: &str) -> Result<JobHandle, JobError> {
        let url = format!("{}/actor-runs/{}", self.base_url, job_id);
        let response = self.authorize(self.client.get(&url)).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(JobError::Status {
                job_id: job_id.to_string(),
                status,
                body: error_body(response).await,
            });
        }

        let envelope: RunEnvelope = response.json().await?;
        Ok(envelope.data)
    }

    async fn fetch_results(&self, result_set_id: &str) -> Result<Vec<RawProfileItem>, JobError> {
        let url = format!("{}/datasets/{}/items", self.base_url, result_set_id);
        let response = self.authorize(self.client.get(&url)).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(JobError::Fetch {
                result_set_id: result_set_id.to_string(),
                status,
                body: error_body(response).await,
            });
        }

        let items: Vec<RawProfileItem> = response.json().await?;
        tracing::debug!(result_set_id, count = items.len(), "Fetched result items");
        Ok(items)
    }
}
