use std::{fs, path::Path};

use tracing::warn;

pub const CONFIG_FILE: &str = "read_one.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub language: String,
    pub min_content_length: u64,
    pub api_base_url: Option<String>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: "en".into(),
            min_content_length: 10_000,
            api_base_url: None,
            log_filter: "warn".into(),
        }
    }
}

pub fn load_settings(path: &Path) -> Settings {
    let raw = fs::read_to_string(path).ok();
    load_settings_from(raw.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the config file, then environment overrides.
pub fn load_settings_from(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match raw.parse::<toml::Table>() {
            Ok(table) => apply_file(&mut settings, &table),
            Err(err) => warn!("config: ignoring unreadable {CONFIG_FILE}: {err}"),
        }
    }

    if let Some(v) = env("READ_ONE_LANGUAGE") {
        settings.language = v;
    }
    if let Some(v) = env("APP__LANGUAGE") {
        settings.language = v;
    }

    if let Some(v) = env("APP__MIN_CONTENT_LENGTH") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.min_content_length = parsed;
        }
    }

    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = Some(v);
    }

    if let Some(v) = env("RUST_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    settings
}

fn apply_file(settings: &mut Settings, table: &toml::Table) {
    if let Some(v) = table.get("language").and_then(toml::Value::as_str) {
        settings.language = v.to_string();
    }
    if let Some(v) = table
        .get("min_content_length")
        .and_then(toml::Value::as_integer)
        .and_then(|v| u64::try_from(v).ok())
    {
        settings.min_content_length = v;
    }
    if let Some(v) = table.get("api_base_url").and_then(toml::Value::as_str) {
        settings.api_base_url = Some(v.to_string());
    }
    if let Some(v) = table.get("log_filter").and_then(toml::Value::as_str) {
        settings.log_filter = v.to_string();
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
