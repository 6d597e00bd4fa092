use anyhow::{bail, Context, Result};
use base64::Engine;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_GROUP_NAME: &str = "Onboarding";
pub const DEFAULT_SUBJECT_MARKER: &str = "New Hire";
pub const DEFAULT_START_DATE_LABEL: &str = "Start Date";
pub const DEFAULT_LOOKBACK_MINUTES: i64 = 60;

/// Settings as written in `config.toml`. Every key is optional here;
/// `resolve` applies env overrides, defaults and validation.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub auth: Option<String>,
    pub api_key: Option<String>,
    pub group_id: Option<u64>,
    pub group_name: Option<String>,
    pub subject_marker: Option<String>,
    pub start_date_label: Option<String>,
    pub lookback_minutes: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    /// Encoded Basic credential, sent as `Authorization: Basic {auth}`.
    pub auth: String,
    /// When absent the group is looked up by `group_name`, which needs admin rights.
    pub group_id: Option<u64>,
    pub group_name: String,
    pub subject_marker: String,
    pub start_date_label: String,
    pub lookback_minutes: i64,
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("FRESHSERVICE_SYNC_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".freshservice-sync")
        .join("config.toml")
}

pub fn load_config() -> Result<AppConfig> {
    let file = read_config_file(&config_path())?;
    resolve(file, |key| std::env::var(key).ok())
}

pub fn read_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let file: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(file)
}

/// Merge `FRESHSERVICE_*` overrides from `env` into `file` and validate.
pub fn resolve(mut file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Result<AppConfig> {
    if let Some(v) = env("FRESHSERVICE_BASE_URL") {
        file.base_url = Some(v);
    }
    if let Some(v) = env("FRESHSERVICE_AUTH") {
        file.auth = Some(v);
    }
    if let Some(v) = env("FRESHSERVICE_API_KEY") {
        file.api_key = Some(v);
    }
    if let Some(v) = env("FRESHSERVICE_GROUP_ID") {
        let id = v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("FRESHSERVICE_GROUP_ID is not a number: {v:?}"))?;
        file.group_id = Some(id);
    }

    let base_url = match file.base_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
        _ => bail!("base_url is not configured (set it in config.toml or FRESHSERVICE_BASE_URL)"),
    };

    let auth = match (file.auth, file.api_key) {
        (Some(auth), _) if !auth.trim().is_empty() => auth.trim().to_string(),
        (_, Some(key)) if !key.trim().is_empty() => encode_api_key(key.trim()),
        _ => bail!("No credentials configured (set auth or api_key)"),
    };

    let lookback_minutes = file.lookback_minutes.unwrap_or(DEFAULT_LOOKBACK_MINUTES);
    if lookback_minutes <= 0 {
        bail!("lookback_minutes must be positive, got {lookback_minutes}");
    }

    Ok(AppConfig {
        base_url,
        auth,
        group_id: file.group_id,
        group_name: file.group_name.unwrap_or_else(|| DEFAULT_GROUP_NAME.into()),
        subject_marker: file
            .subject_marker
            .unwrap_or_else(|| DEFAULT_SUBJECT_MARKER.into()),
        start_date_label: file
            .start_date_label
            .unwrap_or_else(|| DEFAULT_START_DATE_LABEL.into()),
        lookback_minutes,
    })
}

/// Freshservice takes the API key as the Basic username with a dummy password.
fn encode_api_key(api_key: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(format!("{api_key}:X"))
}
