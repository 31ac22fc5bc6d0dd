use std::{collections::HashMap, fs, path::Path, sync::Arc};

use anyhow::Context;
use serde::Deserialize;
use shared::catalog::Catalog;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub secret_key: String,
    pub catalog_path: Option<String>,
    pub completion_ttl_seconds: i64,
    pub session_ttl_seconds: i64,
    pub purge_interval_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            secret_key: "dev-secret-change-me".into(),
            catalog_path: None,
            completion_ttl_seconds: 60,
            session_ttl_seconds: 3600,
            purge_interval_seconds: 60,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file_settings(&mut settings, &raw);
    }
    apply_env_settings(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file_settings(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        return;
    };
    let get = |key: &str| match file_cfg.get(key) {
        Some(toml::Value::String(v)) => Some(v.clone()),
        Some(toml::Value::Integer(v)) => Some(v.to_string()),
        _ => None,
    };

    if let Some(v) = get("bind_addr") {
        settings.server_bind = v;
    }
    if let Some(v) = get("secret_key") {
        settings.secret_key = v;
    }
    if let Some(v) = get("catalog_path") {
        settings.catalog_path = Some(v);
    }
    if let Some(v) = get("completion_ttl_seconds").and_then(|v| v.parse().ok()) {
        settings.completion_ttl_seconds = v;
    }
    if let Some(v) = get("session_ttl_seconds").and_then(|v| v.parse().ok()) {
        settings.session_ttl_seconds = v;
    }
    if let Some(v) = get("purge_interval_seconds").and_then(|v| v.parse().ok()) {
        settings.purge_interval_seconds = v;
    }
}

fn apply_env_settings(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SURVEY_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = var("SURVEY_SECRET_KEY") {
        settings.secret_key = v;
    }
    if let Some(v) = var("APP__SECRET_KEY") {
        settings.secret_key = v;
    }

    if let Some(v) = var("SURVEY_CATALOG") {
        settings.catalog_path = Some(v);
    }
    if let Some(v) = var("APP__CATALOG_PATH") {
        settings.catalog_path = Some(v);
    }

    if let Some(parsed) = var("APP__COMPLETION_TTL_SECONDS").and_then(|v| v.parse::<i64>().ok()) {
        settings.completion_ttl_seconds = parsed;
    }
    if let Some(parsed) = var("APP__SESSION_TTL_SECONDS").and_then(|v| v.parse::<i64>().ok()) {
        settings.session_ttl_seconds = parsed;
    }
    if let Some(parsed) = var("APP__PURGE_INTERVAL_SECONDS").and_then(|v| v.parse::<u64>().ok()) {
        settings.purge_interval_seconds = parsed;
    }
}

pub fn load_catalog(catalog_path: Option<&str>) -> anyhow::Result<Arc<Catalog>> {
    let catalog = match catalog_path.map(str::trim).filter(|path| !path.is_empty()) {
        Some(path) => {
            let raw = fs::read_to_string(Path::new(path))
                .with_context(|| format!("failed to read survey catalog '{path}'"))?;
            Catalog::from_toml_str(&raw)
                .with_context(|| format!("invalid survey catalog '{path}'"))?
        }
        None => Catalog::bundled().context("bundled survey catalog is invalid")?,
    };
    Ok(Arc::new(catalog))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
