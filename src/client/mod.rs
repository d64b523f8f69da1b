//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::config::{self, Config, ConfigError};
use crate::domain::{
    Broadcast, BroadcastId, Password, SendText, StatusResult, TextStatus, Username,
    ValidationError,
};

const SEND_TEXT_PATH: &str = "/text/send";
const TEXT_STATUS_PATH: &str = "/text/index";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        auth: &'a Auth,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>>;

    fn get<'a>(&'a self, url: &'a str, auth: &'a Auth)
    -> BoxFuture<'a, Result<HttpResponse, BoxError>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    async fn send(request: reqwest::RequestBuilder) -> Result<HttpResponse, BoxError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        auth: &'a Auth,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let request = auth.apply(self.client.post(url)).form(&params);
            Self::send(request).await
        })
    }

    fn get<'a>(
        &'a self,
        url: &'a str,
        auth: &'a Auth,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move { Self::send(auth.apply(self.client.get(url))).await })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// HTTP basic-auth credentials attached to every CallFire request.
pub struct Auth {
    username: Username,
    password: Password,
}

impl Auth {
    /// Validate that the username is non-empty after trimming and the password is non-empty.
    pub fn basic(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::from_parts(
            Username::new(username)?,
            Password::new(password)?,
        ))
    }

    pub fn from_parts(username: Username, password: Password) -> Self {
        Self { username, password }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(self.username.as_str(), Some(self.password.as_str()))
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`CallFireClient`].
///
/// This error preserves:
/// - HTTP-level failures (non-2xx status or transport failures),
/// - reply parse failures, including a send reply without a broadcast id,
/// - configuration and validation failures.
pub enum CallFireError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Response body is not XML or lacks an expected element.
    #[error("parse error: {0}")]
    Parse(#[source] BoxError),

    /// Missing credentials or an unusable endpoint root.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`CallFireClient`].
///
/// Use this when you need to customize the endpoint root, timeout, or user-agent.
pub struct CallFireClientBuilder {
    auth: Auth,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl CallFireClientBuilder {
    /// Create a builder with the production endpoint and no timeout/user-agent override.
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            base_url: config::DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the REST root, e.g. [`config::DEVELOPMENT_BASE_URL`].
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`CallFireClient`].
    pub fn build(self) -> Result<CallFireClient, CallFireError> {
        let base_url = config::normalize_base_url(&self.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| CallFireError::Transport(Box::new(err)))?;

        Ok(CallFireClient {
            auth: self.auth,
            base_url,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level CallFire text client.
///
/// Every request carries the basic-auth credentials given at construction. The
/// configuration is fixed once built.
pub struct CallFireClient {
    auth: Auth,
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl CallFireClient {
    /// Create a client against the production endpoint.
    ///
    /// For more customization, use [`CallFireClient::builder`].
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            base_url: config::DEFAULT_BASE_URL.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(auth: Auth) -> CallFireClientBuilder {
        CallFireClientBuilder::new(auth)
    }

    /// Build a client from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Result<Self, CallFireError> {
        Self::builder(config.auth())
            .base_url(config.base_url())
            .build()
    }

    /// Post a text broadcast to `text/send` and return the id CallFire assigned to it.
    ///
    /// Errors:
    /// - [`CallFireError::Transport`] / [`CallFireError::HttpStatus`] when the call fails,
    /// - [`CallFireError::Parse`] when the reply is not XML or has no `r:Id` child.
    pub async fn send_text(&self, request: SendText) -> Result<BroadcastId, CallFireError> {
        let url = self.endpoint(SEND_TEXT_PATH);
        let params = crate::transport::encode_send_text_form(&request);
        tracing::debug!(
            url = %url,
            recipients = request.recipients().len(),
            "posting text broadcast"
        );

        let response = self
            .http
            .post_form(&url, &self.auth, params)
            .await
            .map_err(CallFireError::Transport)?;
        let body = ensure_success(response)?;

        let broadcast_id = crate::transport::decode_send_text_response(&body)
            .map_err(|err| CallFireError::Parse(Box::new(err)))?;
        tracing::info!(broadcast_id = %broadcast_id, "text broadcast accepted");
        Ok(broadcast_id)
    }

    /// Fetch one status snapshot from `text/index` for the given broadcast.
    ///
    /// The reply is parsed as XML and returned without interpretation.
    pub async fn text_status(&self, request: TextStatus) -> Result<StatusResult, CallFireError> {
        let params = crate::transport::encode_text_status_query(&request);
        let url = Url::parse_with_params(&self.endpoint(TEXT_STATUS_PATH), &params).map_err(
            |source| ConfigError::InvalidBaseUrl {
                value: self.base_url.clone(),
                source,
            },
        )?;
        tracing::debug!(url = %url, "querying text broadcast status");

        let response = self
            .http
            .get(url.as_str(), &self.auth)
            .await
            .map_err(CallFireError::Transport)?;
        let body = ensure_success(response)?;

        crate::transport::decode_text_status_response(&body)
            .map_err(|err| CallFireError::Parse(Box::new(err)))
    }

    /// Send a broadcast, then look up its status once.
    ///
    /// A failed send returns immediately; no status request is made. The status is a
    /// single snapshot and is not checked for delivery.
    // TODO: poll `text/index` until every recipient reaches a final result once CallFire's
    // terminal result set and a wait budget are decided.
    pub async fn send_and_lookup(&self, request: SendText) -> Result<Broadcast, CallFireError> {
        let id = self.send_text(request).await?;
        let status = self.text_status(TextStatus::new(id.clone())).await?;
        Ok(Broadcast { id, status })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn ensure_success(response: HttpResponse) -> Result<String, CallFireError> {
    if (200..=299).contains(&response.status) {
        return Ok(response.body);
    }

    tracing::warn!(status = response.status, "CallFire returned a non-success status");
    let body = if response.body.trim().is_empty() {
        None
    } else {
        Some(response.body)
    };
    Err(CallFireError::HttpStatus {
        status: response.status,
        body,
    })
}
