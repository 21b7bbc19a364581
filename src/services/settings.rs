//! Site settings and branding

use std::collections::BTreeMap;

use crate::{
    error::{AppError, AppResult},
    models::setting::{
        Branding, SiteSetting, DEFAULT_SITE_NAME, DEFAULT_THEME, LOGIN_SUBTITLE_KEY,
        SITE_NAME_KEY, THEME_KEY,
    },
    repository::Repository,
};

/// Branding with defaults filled in for missing or blank keys
pub fn branding_from(settings: &BTreeMap<String, String>) -> Branding {
    let value = |key: &str| {
        settings
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    Branding {
        site_name: value(SITE_NAME_KEY).unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
        theme: value(THEME_KEY).unwrap_or_else(|| DEFAULT_THEME.to_string()),
        login_subtitle: value(LOGIN_SUBTITLE_KEY),
    }
}

#[derive(Clone)]
pub struct SettingsService {
    repository: Repository,
}

impl SettingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Every stored setting as a key/value object
    pub async fn all(&self) -> AppResult<BTreeMap<String, String>> {
        let settings = self.repository.settings.all().await?;
        Ok(settings.into_iter().map(|s| (s.key, s.value)).collect())
    }

    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.repository.settings.get(key).await
    }

    pub async fn branding(&self) -> AppResult<Branding> {
        Ok(branding_from(&self.all().await?))
    }

    pub async fn update(&self, key: &str, value: &str) -> AppResult<SiteSetting> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::Validation("key is required".to_string()));
        }
        let setting = self.repository.settings.upsert(key, value).await?;
        tracing::info!(key, "Site setting updated");
        Ok(setting)
    }
}
