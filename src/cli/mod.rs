pub mod fetch;
pub mod watch;

use crate::core::models::ProfileSnapshot;
use crate::core::settings::Settings;
use crate::jobs::{ApifyApi, JobClient};

fn build_client(settings: &Settings, allow_mock_fallback: bool) -> JobClient<ApifyApi> {
    JobClient::new(ApifyApi::new(&settings.api))
        .with_max_wait(settings.api.max_wait())
        .with_mock_fallback(allow_mock_fallback)
}

fn print_snapshot(snapshot: &ProfileSnapshot) {
    let badge = if snapshot.verified.unwrap_or(false) {
        " ✓"
    } else {
        ""
    };

    println!("@{}{}", snapshot.username, badge);
    if let Some(name) = &snapshot.display_name {
        println!("  {}", name);
    }
    println!("  Followers:    {}", snapshot.formatted_followers());
    println!("  Avatar:       {}", snapshot.avatar_url);
    println!(
        "  Last updated: {}",
        snapshot
            .updated_at
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S")
    );
}
