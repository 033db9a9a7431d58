use crate::core::models::{format_count, ProfileSnapshot};
use anyhow::Result;
use notify_rust::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Validation,
    Error,
}

/// Transient message for the user, shown once and then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn empty_username() -> Self {
        Self {
            kind: NoticeKind::Validation,
            title: "Enter Username".to_string(),
            description: "Please enter a username to search".to_string(),
        }
    }

    pub fn profile_found(snapshot: &ProfileSnapshot) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: "Profile Found!".to_string(),
            description: format!(
                "Found {} with {} followers",
                snapshot.username,
                format_count(snapshot.follower_count)
            ),
        }
    }

    pub fn fetch_failed() -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error".to_string(),
            description: "Failed to fetch profile data. Please try again.".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, NoticeKind::Validation | NoticeKind::Error)
    }
}

pub fn send_desktop_notice(notice: &Notice) -> Result<()> {
    Notification::new()
        .summary(&notice.title)
        .body(&notice.description)
        .appname("follower-watch")
        .timeout(notify_rust::Timeout::Milliseconds(5000))
        .show()?;

    tracing::debug!(kind = ?notice.kind, title = %notice.title, "Sent desktop notice");

    Ok(())
}
