use crate::core::models::Platform;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const TOKEN_ENV_VAR: &str = "APIFY_TOKEN";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub notifications: NotificationSettings,
    /// Substitute a placeholder profile when the job pipeline fails.
    pub allow_mock_fallback: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            notifications: NotificationSettings::default(),
            allow_mock_fallback: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub token: Option<String>,
    pub max_wait_secs: u64,
    pub instagram_actor: String,
    pub tiktok_actor: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.apify.com/v2".to_string(),
            token: None,
            max_wait_secs: 30,
            instagram_actor: "apify~instagram-scraper".to_string(),
            tiktok_actor: "mshopik~tiktok-scraper".to_string(),
        }
    }
}

impl ApiSettings {
    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }

    pub fn actor_for(&self, platform: Platform) -> &str {
        match platform {
            Platform::Instagram => &self.instagram_actor,
            Platform::Tiktok => &self.tiktok_actor,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub desktop: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self { desktop: false }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("follower-watch").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path().context("Could not determine config directory")?;

        let mut settings = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            let settings: Settings = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

            tracing::info!(?path, "Loaded config");
            settings
        } else {
            tracing::info!(?path, "Config file not found, using defaults");
            Self::default()
        };

        settings.apply_env_token(std::env::var(TOKEN_ENV_VAR).ok());
        settings.validate()?;
        Ok(settings)
    }

    fn apply_env_token(&mut self, token: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.api.token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.max_wait_secs == 0 {
            anyhow::bail!("api.max_wait_secs must be greater than 0");
        }

        reqwest::Url::parse(&self.api.base_url)
            .with_context(|| format!("api.base_url is not a valid URL: {}", self.api.base_url))?;

        if self.api.instagram_actor.trim().is_empty() || self.api.tiktok_actor.trim().is_empty() {
            anyhow::bail!("api actor ids must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.allow_mock_fallback);
        assert!(!settings.notifications.desktop);
        assert_eq!(settings.api.base_url, "https://api.apify.com/v2");
        assert_eq!(settings.api.max_wait(), Duration::from_secs(30));
        assert!(settings.api.token.is_none());
        assert_eq!(
            settings.api.actor_for(Platform::Instagram),
            "apify~instagram-scraper"
        );
        assert_eq!(settings.api.actor_for(Platform::Tiktok), "mshopik~tiktok-scraper");
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.api.max_wait_secs = 0;
        assert!(settings.validate().is_err());

        settings.api.max_wait_secs = 10;
        settings.api.base_url = "not a url".to_string();
        assert!(settings.validate().is_err());

        settings.api.base_url = "http://localhost:8080".to_string();
        settings.api.tiktok_actor = " ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_env_token_overrides_config() {
        let mut settings = Settings::default();
        settings.api.token = Some("from-file".to_string());

        settings.apply_env_token(Some("   ".to_string()));
        assert_eq!(settings.api.token.as_deref(), Some("from-file"));

        settings.apply_env_token(Some("from-env".to_string()));
        assert_eq!(settings.api.token.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            allow_mock_fallback = false

            [api]
            base_url = "http://localhost:9000/v2"
            token = "secret"
            max_wait_secs = 45
            tiktok_actor = "clockworks~tiktok-scraper"

            [notifications]
            desktop = true
        "#;

        let settings: Settings = toml::from_str(toml).unwrap();
        assert!(!settings.allow_mock_fallback);
        assert_eq!(settings.api.base_url, "http://localhost:9000/v2");
        assert_eq!(settings.api.token.as_deref(), Some("secret"));
        assert_eq!(settings.api.max_wait(), Duration::from_secs(45));
        assert_eq!(settings.api.instagram_actor, "apify~instagram-scraper");
        assert_eq!(settings.api.tiktok_actor, "clockworks~tiktok-scraper");
        assert!(settings.notifications.desktop);
    }
}
