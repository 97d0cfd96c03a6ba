//! HTTP transport shared by every API surface.
//!
//! A [`Transport`] owns one pooled `reqwest::Client` carrying the Biz Ops
//! default headers, and runs every request through the client's shared
//! [`Schedule`] so that all traffic respects one rate limit.

use crate::client::ClientOptions;
use crate::common::{ApiError, ConfigurationError, Dispatcher, Schedule};
use crate::utils::url::join_url;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub use reqwest::Method;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("biz-ops-client/", env!("CARGO_PKG_VERSION"));

const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");
const CLIENT_ID_HEADER: HeaderName = HeaderName::from_static("client-id");
const CLIENT_USER_ID_HEADER: HeaderName = HeaderName::from_static("client-user-id");

/// Rate-limited HTTP transport for the Biz Ops API.
#[derive(Debug)]
pub struct Transport<S: Schedule = Dispatcher> {
    http_client: reqwest::Client,
    host: String,
    timeout: Duration,
    scheduler: Arc<S>,
}

impl Transport<Dispatcher> {
    /// Create a transport with its own dispatcher built from the options'
    /// rate limit settings.
    pub fn new(options: &ClientOptions) -> Result<Self, ConfigurationError> {
        let dispatcher = Dispatcher::new(&options.rate_limit)?;
        Self::with_scheduler(options, Arc::new(dispatcher))
    }
}

impl<S: Schedule> Transport<S> {
    /// Create a transport sending through an existing scheduler.
    ///
    /// Sharing one scheduler between transports makes them share one rate
    /// limit.
    pub fn with_scheduler(
        options: &ClientOptions,
        scheduler: Arc<S>,
    ) -> Result<Self, ConfigurationError> {
        options.validate()?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers(options)?)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ConfigurationError::ClientCreation {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http_client,
            host: options.host().to_string(),
            timeout: options.timeout(),
            scheduler,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn scheduler(&self) -> &Arc<S> {
        &self.scheduler
    }

    /// Send one request and return its body.
    ///
    /// `path` is joined onto the host. JSON responses are parsed, any other
    /// non-empty body is returned as a JSON string and an empty body as
    /// `None`. Non-success statuses become [`ApiError::Http`].
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, ApiError> {
        let url = join_url(&self.host, path);
        let timeout = self.timeout;

        let mut builder = self
            .http_client
            .request(method.clone(), &url)
            .timeout(timeout);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        self.scheduler
            .schedule(|| async move {
                log::debug!("{method} {url}");

                let response = builder
                    .send()
                    .await
                    .map_err(|e| send_error(&url, timeout, e))?;

                read_response(&url, response).await
            })
            .await
    }
}

fn default_headers(options: &ClientOptions) -> Result<HeaderMap, ConfigurationError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let api_key = options
        .api_key
        .as_deref()
        .ok_or(ConfigurationError::MissingApiKey)?;
    let mut api_key = header_value("x-api-key", api_key)?;
    api_key.set_sensitive(true);
    headers.insert(API_KEY_HEADER, api_key);

    if let Some(system_code) = options.system_code() {
        headers.insert(CLIENT_ID_HEADER, header_value("client-id", system_code)?);
    }
    if let Some(user_id) = options.user_id() {
        headers.insert(CLIENT_USER_ID_HEADER, header_value("client-user-id", user_id)?);
    }

    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigurationError> {
    HeaderValue::from_str(value).map_err(|e| ConfigurationError::ClientCreation {
        reason: format!("invalid {name} header: {e}"),
    })
}

fn send_error(url: &str, timeout: Duration, error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout {
            url: url.to_string(),
            millis: timeout.as_millis() as u64,
        }
    } else {
        ApiError::Request {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}

async fn read_response(url: &str, response: reqwest::Response) -> Result<Option<Value>, ApiError> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.contains("json"));

    let text = response.text().await.map_err(|e| ApiError::Request {
        url: url.to_string(),
        reason: format!("failed to read response body: {e}"),
    })?;

    if status.is_success() {
        return parse_body(&text, is_json);
    }

    // An unparsable error body is still worth reporting, so keep it as text
    let body = parse_body(&text, is_json)
        .unwrap_or_else(|_| Some(Value::String(text)))
        .unwrap_or(Value::Null);

    log::debug!("{url} responded with {status}");
    Err(ApiError::from_response(
        status.as_u16(),
        status.canonical_reason(),
        body,
    ))
}

/// Interpret a response body by its content type.
pub(crate) fn parse_body(text: &str, is_json: bool) -> Result<Option<Value>, ApiError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    if !is_json {
        return Ok(Some(Value::String(text.to_string())));
    }

    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| ApiError::InvalidResponse {
            expected: "JSON body".to_string(),
            actual: format!("{e}"),
        })
}
