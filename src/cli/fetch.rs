use crate::core::errors::ControllerError;
use crate::core::models::Platform;
use crate::core::settings::Settings;
use crate::jobs::ProfileSource;
use anyhow::{Context, Result};

pub async fn run(platform: Platform, username: String, json: bool, no_fallback: bool) -> Result<()> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ControllerError::EmptyUsername.into());
    }

    let settings = Settings::load()?;

    let client = super::build_client(&settings, settings.allow_mock_fallback && !no_fallback);
    let snapshot = client
        .fetch_profile(platform, username)
        .await
        .with_context(|| format!("Failed to fetch {} profile for {}", platform, username))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        super::print_snapshot(&snapshot);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_blank_username_rejected_before_config_is_read() {
        let config_home = std::env::temp_dir().join(format!("follower-watch-{}", std::process::id()));
        let config_dir = config_home.join("follower-watch");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join("config.toml"), "api = [not toml").unwrap();
        std::env::set_var("XDG_CONFIG_HOME", &config_home);

        let err = run(Platform::Instagram, "   ".to_string(), false, false)
            .await
            .unwrap_err();
        let load_err = Settings::load().unwrap_err();

        std::env::remove_var("XDG_CONFIG_HOME");
        let _ = std::fs::remove_dir_all(&config_home);

        assert!(matches!(
            err.downcast_ref::<ControllerError>(),
            Some(ControllerError::EmptyUsername)
        ));
        assert!(load_err.to_string().contains("Failed to parse config file"));
    }
}
