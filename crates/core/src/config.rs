use std::env::{self, VarError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding [`ClientConfig::api_base_url`].
pub const API_BASE_URL_ENV: &str = "DOCCHAT_API_BASE_URL";

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Where the front-end finds its backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("api base url is empty")]
    EmptyBaseUrl,
    #[error("DOCCHAT_API_BASE_URL is not valid unicode")]
    NotUnicode,
    #[error("api base url must start with http:// or https://, got {0:?}")]
    UnsupportedScheme(String),
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            api_base_url: api_base_url.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults, overridden by `DOCCHAT_API_BASE_URL` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(API_BASE_URL_ENV) {
            Ok(url) => Self::new(url),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::UnsupportedScheme(url.to_string()));
        }
        Ok(())
    }

    pub fn upload_url(&self) -> String {
        self.endpoint("upload")
    }

    pub fn ask_url(&self) -> String {
        self.endpoint("ask")
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.api_base_url.trim().trim_end_matches('/'))
    }
}
