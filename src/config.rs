use crate::error::StatsError;
use log::debug;
use std::time::Duration;

pub const API_KEY_VAR: &str = "PEPY_API_KEY";
pub const API_URL_VAR: &str = "PEPY_API_URL";
pub const DEFAULT_API_URL: &str = "https://api.pepy.tech/api/v2/projects/";

/// Free tier allows 10 requests per minute.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(6100);

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub request_delay: Duration,
}

impl Config {
    /// Loads `.env` from the working directory if one exists, then resolves
    /// settings from the process environment.
    pub fn from_env() -> Result<Self, StatsError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, StatsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(StatsError::MissingApiKey)?;

        let base_url = lookup(API_URL_VAR)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            api_key,
            base_url,
            request_delay: DEFAULT_REQUEST_DELAY,
        })
    }
}
