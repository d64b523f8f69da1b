//! Client configuration: endpoint root and basic-auth credentials.
//!
//! Credentials come from the environment or from a JSON file, never from source code.
//!
//! ```json
//! { "base_url": "http://dev.callfire.com/api/1.0/rest", "username": "...", "password": "..." }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::client::Auth;
use crate::domain::{Password, Username};

/// Production REST root.
pub const DEFAULT_BASE_URL: &str = "https://www.callfire.com/api/1.0/rest";
/// Development REST root.
pub const DEVELOPMENT_BASE_URL: &str = "http://dev.callfire.com/api/1.0/rest";

pub const BASE_URL_ENV: &str = "CALLFIRE_BASE_URL";
pub const USERNAME_ENV: &str = "CALLFIRE_USERNAME";
pub const PASSWORD_ENV: &str = "CALLFIRE_PASSWORD";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing credential `{name}` (set {env} or `{name}` in the config file)")]
    MissingCredential {
        name: &'static str,
        env: &'static str,
    },

    #[error("invalid base URL {value:?}: {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL {value:?} must use http or https")]
    UnsupportedScheme { value: String },

    #[error("base URL {value:?} must not carry a query or fragment")]
    BaseUrlHasQuery { value: String },

    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Validated client configuration.
pub struct Config {
    base_url: String,
    username: Username,
    password: Password,
}

impl Config {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        RawConfig {
            base_url: Some(base_url.into()),
            username: Some(username.into()),
            password: Some(password.into()),
        }
        .validate()
    }

    /// Read `CALLFIRE_BASE_URL` (optional), `CALLFIRE_USERNAME` and `CALLFIRE_PASSWORD`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with a caller-supplied variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        RawConfig {
            base_url: lookup(BASE_URL_ENV),
            username: lookup(USERNAME_ENV),
            password: lookup(PASSWORD_ENV),
        }
        .validate()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        raw.validate()
    }

    /// Replace the endpoint root, keeping the credentials.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(&base_url.into())?;
        Ok(self)
    }

    /// Endpoint root without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn auth(&self) -> Auth {
        Auth::from_parts(self.username.clone(), self.password.clone())
    }
}

impl RawConfig {
    fn validate(self) -> Result<Config, ConfigError> {
        let base_url = match self.base_url.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => normalize_base_url(value)?,
            _ => DEFAULT_BASE_URL.to_owned(),
        };
        let username = self
            .username
            .and_then(|value| Username::new(value).ok())
            .ok_or(ConfigError::MissingCredential {
                name: Username::FIELD,
                env: USERNAME_ENV,
            })?;
        let password = self
            .password
            .and_then(|value| Password::new(value).ok())
            .ok_or(ConfigError::MissingCredential {
                name: Password::FIELD,
                env: PASSWORD_ENV,
            })?;

        Ok(Config {
            base_url,
            username,
            password,
        })
    }
}

/// Validate an endpoint root and strip trailing slashes so paths can be appended.
pub(crate) fn normalize_base_url(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|source| ConfigError::InvalidBaseUrl {
        value: value.to_owned(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme {
            value: value.to_owned(),
        });
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ConfigError::BaseUrlHasQuery {
            value: value.to_owned(),
        });
    }
    Ok(trimmed.to_owned())
}
