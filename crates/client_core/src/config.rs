use std::{collections::HashMap, fs, path::Path};

use anyhow::{anyhow, Context};
use url::Url;

pub const SETTINGS_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Origin of the CRUD API (`/api/...`).
    pub api_base_url: String,
    /// Origin of the audio preview service (`/preview`).
    pub preview_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".into(),
            preview_base_url: "http://localhost:8080".into(),
        }
    }
}

/// Defaults, then `dashboard.toml` in the working directory, then environment.
pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    apply_file(&mut settings, Path::new(SETTINGS_FILE))?;
    apply_env(&mut settings, |name| std::env::var(name).ok());
    settings.normalize()?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, path: &Path) -> anyhow::Result<()> {
    let Ok(raw) = fs::read_to_string(path) else {
        return Ok(());
    };
    let file_cfg = toml::from_str::<HashMap<String, String>>(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
    if let Some(v) = file_cfg.get("api_base_url") {
        settings.api_base_url = v.clone();
    }
    if let Some(v) = file_cfg.get("preview_base_url") {
        settings.preview_base_url = v.clone();
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("DASHBOARD_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = lookup("DASHBOARD_PREVIEW_URL") {
        settings.preview_base_url = v;
    }
    if let Some(v) = lookup("APP__PREVIEW_BASE_URL") {
        settings.preview_base_url = v;
    }
}

impl Settings {
    pub fn normalize(&mut self) -> anyhow::Result<()> {
        self.api_base_url = normalize_base_url(&self.api_base_url)
            .context("invalid api_base_url")?;
        self.preview_base_url = normalize_base_url(&self.preview_base_url)
            .context("invalid preview_base_url")?;
        Ok(())
    }
}

pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    let parsed = Url::parse(raw).with_context(|| format!("'{raw}' is not a valid URL"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(anyhow!("base url must start with http:// or https://, got '{raw}'"));
    }
    Ok(raw.trim_end_matches('/').to_string())
}
