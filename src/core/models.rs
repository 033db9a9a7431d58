use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const AVATAR_ENDPOINT: &str = "https://ui-avatars.com/api/";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Tiktok,
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Tiktok => "TikTok",
        }
    }

    /// Actor input payload for a single-profile scrape.
    pub fn job_input(&self, username: &str) -> serde_json::Value {
        match self {
            Platform::Instagram => serde_json::json!({
                "usernames": [username],
                "resultsType": "details",
            }),
            Platform::Tiktok => serde_json::json!({
                "profiles": [username],
            }),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum JobStatus {
    Ready,
    Running,
    Succeeded,
    Failed,
    Aborting,
    Aborted,
    TimingOut,
    #[serde(alias = "TIMED_OUT")]
    TimedOut,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        *self == JobStatus::Succeeded || self.is_failure()
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            JobStatus::Failed | JobStatus::Aborted | JobStatus::TimedOut
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobStatus::Ready => "ready",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
            JobStatus::Aborting => "aborting",
            JobStatus::Aborted => "aborted",
            JobStatus::TimingOut => "timing out",
            JobStatus::TimedOut => "timed out",
            JobStatus::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// A submitted job as last reported by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHandle {
    pub id: String,
    pub status: JobStatus,
    #[serde(rename = "defaultDatasetId", default)]
    pub result_set_id: Option<String>,
}

/// One dataset item as produced by either scraper. Field names differ per
/// platform, so everything is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProfileItem {
    pub username: Option<String>,
    pub followers: Option<u64>,
    pub followers_count: Option<u64>,
    pub profile_pic_url: Option<String>,
    pub avatar_larger: Option<String>,
    pub display_name: Option<String>,
    pub nickname: Option<String>,
    pub full_name: Option<String>,
    pub verified: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub username: String,
    pub follower_count: u64,
    pub avatar_url: String,
    pub display_name: Option<String>,
    pub verified: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileSnapshot {
    pub fn formatted_followers(&self) -> String {
        format_count(self.follower_count)
    }
}

pub fn generated_avatar_url(username: &str) -> String {
    match reqwest::Url::parse_with_params(
        AVATAR_ENDPOINT,
        &[("name", username), ("size", "150"), ("background", "random")],
    ) {
        Ok(url) => url.to_string(),
        Err(_) => AVATAR_ENDPOINT.to_string(),
    }
}

pub fn capitalize(username: &str) -> String {
    let mut chars = username.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders a count with comma thousands separators, e.g. `42,000`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
