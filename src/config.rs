use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_USER_ID: &str = "usuario_anonimo";

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
const MODEL_ENV: &str = "ESCRIBA_MODEL";
const CONFIG_DIR_ENV: &str = "ESCRIBA_CONFIG_DIR";
const CONFIG_FILE_NAME: &str = "config.json";

/// Settings needed to reach the generative text backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub api_key: String,
    pub model_name: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model_name: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Values persisted in the user's config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    if let Some(dir) = non_empty(env::var(CONFIG_DIR_ENV).ok()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join("escriba"))
        .ok_or_else(|| AppError::Configuration("unable to locate a config directory".to_string()))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub user_id: String,
}

impl AppConfig {
    pub fn load(overrides: Overrides) -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Ok(Self::resolve(stored, overrides, |name| env::var(name).ok()))
    }

    /// Flag, then environment, then stored file, then defaults.
    pub fn resolve(
        stored: StoredConfig,
        overrides: Overrides,
        lookup_env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let api_key = non_empty(overrides.api_key)
            .or_else(|| non_empty(lookup_env(API_KEY_ENV)))
            .or_else(|| non_empty(stored.gemini_api_key));
        let model = non_empty(overrides.model)
            .or_else(|| non_empty(lookup_env(MODEL_ENV)))
            .or_else(|| non_empty(stored.gemini_model))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = non_empty(stored.gemini_base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = Duration::from_secs(
            stored
                .timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        );
        let user_id = non_empty(overrides.user_id)
            .or_else(|| non_empty(stored.user_id))
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string());

        Self {
            api_key,
            model,
            base_url,
            timeout,
            user_id,
        }
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = non_empty(Some(api_key));
        self
    }

    pub fn backend_config(&self) -> AppResult<BackendConfig> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            AppError::Configuration(format!(
                "no Gemini API key found; set {API_KEY_ENV} or run `escriba config init`"
            ))
        })?;
        validate_model_name(&self.model)?;
        validate_base_url(&self.base_url)?;
        Ok(BackendConfig {
            model_name: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout: self.timeout,
            ..BackendConfig::new(api_key)
        })
    }
}

/// Accepts `gemini-2.5-flash` or `models/gemini-2.5-flash`; the name ends up
/// in the request path, so only URL-safe characters are allowed.
pub fn validate_model_name(name: &str) -> AppResult<()> {
    let bare = name.strip_prefix("models/").unwrap_or(name);
    let valid = !bare.is_empty()
        && bare
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'));
    if valid {
        Ok(())
    } else {
        Err(AppError::Configuration(format!(
            "invalid model name '{name}'"
        )))
    }
}

pub fn validate_base_url(url: &str) -> AppResult<()> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(AppError::Configuration(format!(
            "base URL '{url}' must start with http:// or https://"
        )))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
