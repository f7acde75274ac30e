use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    /// Directory of `<slug>.md` lesson pages that replaces the built-in ones.
    pub pages_dir: Option<PathBuf>,
    pub max_source_bytes: usize,
    pub secure_cookies: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8000".into(),
            pages_dir: None,
            max_source_bytes: 64 * 1024,
            secure_cookies: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    pages_dir: Option<PathBuf>,
    max_source_bytes: Option<usize>,
    secure_cookies: Option<bool>,
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    let path = Path::new(SETTINGS_FILE);
    if path.exists() {
        match read_settings_file(path) {
            Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
            Err(error) => warn!(%error, "ignoring unreadable settings file"),
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn read_settings_file(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.pages_dir {
        settings.pages_dir = Some(v);
    }
    if let Some(v) = file_cfg.max_source_bytes {
        settings.max_source_bytes = v;
    }
    if let Some(v) = file_cfg.secure_cookies {
        settings.secure_cookies = v;
    }
}

fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = var("APP__PAGES_DIR") {
        let v = v.trim();
        settings.pages_dir = (!v.is_empty()).then(|| PathBuf::from(v));
    }

    if let Some(v) = var("APP__MAX_SOURCE_BYTES") {
        if let Ok(parsed) = v.trim().parse::<usize>() {
            if parsed > 0 {
                settings.max_source_bytes = parsed;
            }
        }
    }

    if let Some(v) = var("APP__SECURE_COOKIES") {
        match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => settings.secure_cookies = true,
            "0" | "false" | "no" => settings.secure_cookies = false,
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
