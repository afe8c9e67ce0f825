use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use serde::Deserialize;
use shared::{
    domain::AnonymizationParams,
    protocol::{DEFAULT_PREVIEW_PATH, DEFAULT_UPLOAD_PATH},
};

pub const DEFAULT_CONFIG_FILE: &str = "anonymizer.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub upload_path: String,
    pub preview_path: String,
    pub download_dir: PathBuf,
    pub params: AnonymizationParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            upload_path: DEFAULT_UPLOAD_PATH.into(),
            preview_path: DEFAULT_PREVIEW_PATH.into(),
            download_dir: PathBuf::from("."),
            params: AnonymizationParams::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    upload_path: Option<String>,
    preview_path: Option<String>,
    download_dir: Option<PathBuf>,
    k_value: Option<u32>,
    m_value: Option<u32>,
    t_value: Option<f64>,
}

/// Defaults, then the TOML file (if present), then `APP__*` variables.
///
/// A missing default config file is fine; an explicitly requested one must
/// exist.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    load_settings_with(config_path, |key| std::env::var(key).ok())
}

fn load_settings_with(
    config_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };
    if required || path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        apply_file(&mut settings, file_cfg);
    }

    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__UPLOAD_PATH") {
        settings.upload_path = v;
    }
    if let Some(v) = env("APP__PREVIEW_PATH") {
        settings.preview_path = v;
    }
    if let Some(v) = env("APP__DOWNLOAD_DIR") {
        settings.download_dir = PathBuf::from(v);
    }
    if let Some(v) = env("APP__K_VALUE") {
        settings.params.k_value = parse_env("APP__K_VALUE", &v)?;
    }
    if let Some(v) = env("APP__M_VALUE") {
        settings.params.m_value = parse_env("APP__M_VALUE", &v)?;
    }
    if let Some(v) = env("APP__T_VALUE") {
        settings.params.t_value = parse_env("APP__T_VALUE", &v)?;
    }

    Ok(settings)
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.upload_path {
        settings.upload_path = v;
    }
    if let Some(v) = file_cfg.preview_path {
        settings.preview_path = v;
    }
    if let Some(v) = file_cfg.download_dir {
        settings.download_dir = v;
    }
    if let Some(v) = file_cfg.k_value {
        settings.params.k_value = v;
    }
    if let Some(v) = file_cfg.m_value {
        settings.params.m_value = v;
    }
    if let Some(v) = file_cfg.t_value {
        settings.params.t_value = v;
    }
}

fn parse_env<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("invalid value '{raw}' for {key}"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
