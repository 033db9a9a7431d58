//! Error taxonomy for the job pipeline and the refresh controller.

use crate::core::models::{JobStatus, Platform};
use std::time::Duration;

/// Failures of the submit / poll / fetch pipeline.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Failed to start {platform} job: {status} - {body}")]
    Submission {
        platform: Platform,
        status: u16,
        body: String,
    },

    #[error("Failed to get status of job {job_id}: {status} - {body}")]
    Status {
        job_id: String,
        status: u16,
        body: String,
    },

    #[error("Failed to fetch result set {result_set_id}: {status} - {body}")]
    Fetch {
        result_set_id: String,
        status: u16,
        body: String,
    },

    #[error("Job {job_id} {status}")]
    JobFailed { job_id: String, status: JobStatus },

    #[error("Job {job_id} still running after {waited:?}")]
    JobTimeout { job_id: String, waited: Duration },

    #[error("Job {job_id} succeeded without a result set")]
    MissingResultSet { job_id: String },

    #[error("No profile data found in result set {result_set_id}")]
    NoItems { result_set_id: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl JobError {
    /// Terminal job outcome, as opposed to a failed remote call.
    pub fn is_job_outcome(&self) -> bool {
        matches!(
            self,
            JobError::JobFailed { .. } | JobError::JobTimeout { .. }
        )
    }
}

/// Errors surfaced by the profile refresh controller.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("Please enter a username to search")]
    EmptyUsername,

    #[error("Failed to fetch profile data: {0}")]
    Fetch(#[from] JobError),
}

impl ControllerError {
    pub fn is_user_error(&self) -> bool {
        matches!(self, ControllerError::EmptyUsername)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_failed_display() {
        let error = JobError::JobFailed {
            job_id: "run-1".to_string(),
            status: JobStatus::TimedOut,
        };
        assert_eq!(error.to_string(), "Job run-1 timed out");
        assert!(error.is_job_outcome());
    }

    #[test]
    fn test_submission_display() {
        let error = JobError::Submission {
            platform: Platform::Tiktok,
            status: 401,
            body: "unauthorized".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to start TikTok job: 401 - unauthorized"
        );
        assert!(!error.is_job_outcome());
    }

    #[test]
    fn test_empty_username_is_user_error() {
        let error = ControllerError::EmptyUsername;
        assert_eq!(error.to_string(), "Please enter a username to search");
        assert!(error.is_user_error());

        let error = ControllerError::from(JobError::NoItems {
            result_set_id: "ds-1".to_string(),
        });
        assert!(!error.is_user_error());
    }
}
