//! The [`BizOpsClient`] entry point and its options.

use crate::api::{
    BatchApi, BatchParams, DEFAULT_BATCH_ENDPOINT, DEFAULT_GRAPHQL_ENDPOINT, GraphQlApi, NodeApi,
};
use crate::batch::{BatchConfig, BatchError, BatchExecutor, BatchReport};
use crate::common::{ConfigurationError, Dispatcher, RateLimiterConfig, Schedule};
use crate::transport::Transport;
use crate::utils::env::EnvUtils;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "https://api.ft.com/biz-ops";
pub const DEFAULT_TIMEOUT_MS: u64 = 8000;

pub const API_KEY_ENV: &str = "BIZ_OPS_API_KEY";
pub const SYSTEM_CODE_ENV: &str = "BIZ_OPS_SYSTEM_CODE";
pub const USER_ID_ENV: &str = "BIZ_OPS_USER_ID";
pub const HOST_ENV: &str = "BIZ_OPS_HOST";

/// Options for building a [`BizOpsClient`].
///
/// Unset fields fall back to their defaults when accessed. An API key is
/// always required, together with a system code or a user ID identifying
/// the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientOptions {
    /// API gateway key, sent as `x-api-key`
    pub api_key: Option<String>,
    /// Code of the calling system, sent as `client-id`
    pub system_code: Option<String>,
    /// ID of the calling user, sent as `client-user-id`
    pub user_id: Option<String>,
    /// Biz Ops API base URL (default: https://api.ft.com/biz-ops)
    pub host: Option<String>,
    /// Per-request timeout in milliseconds (default: 8000)
    pub timeout_ms: Option<u64>,
    /// Path of the batch endpoint (default: /v1/batch)
    pub batch_endpoint: Option<String>,
    /// Path of the GraphQL endpoint (default: /graphql)
    pub graphql_endpoint: Option<String>,
    #[serde(flatten, default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub rate_limit: RateLimiterConfig,
}

impl ClientOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    pub fn with_system_code(mut self, system_code: impl Into<String>) -> Self {
        self.system_code = Some(system_code.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Read options from `BIZ_OPS_API_KEY`, `BIZ_OPS_SYSTEM_CODE`,
    /// `BIZ_OPS_USER_ID` and `BIZ_OPS_HOST`.
    pub fn from_env() -> Self {
        Self::default().with_env_fallback()
    }

    /// Fill fields that are still unset from the environment.
    pub fn with_env_fallback(mut self) -> Self {
        fn fill(field: &mut Option<String>, name: &str) {
            if field.is_none() {
                *field = EnvUtils::get_optional_var(name);
            }
        }

        fill(&mut self.api_key, API_KEY_ENV);
        fill(&mut self.system_code, SYSTEM_CODE_ENV);
        fill(&mut self.user_id, USER_ID_ENV);
        fill(&mut self.host, HOST_ENV);
        self
    }

    pub fn system_code(&self) -> Option<&str> {
        non_blank(&self.system_code)
    }

    pub fn user_id(&self) -> Option<&str> {
        non_blank(&self.user_id)
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    pub fn batch_endpoint(&self) -> &str {
        self.batch_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_BATCH_ENDPOINT)
    }

    pub fn graphql_endpoint(&self) -> &str {
        self.graphql_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_GRAPHQL_ENDPOINT)
    }

    /// Check the options, reporting the first problem found.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if non_blank(&self.api_key).is_none() {
            return Err(ConfigurationError::MissingApiKey);
        }
        if self.system_code().is_none() && self.user_id().is_none() {
            return Err(ConfigurationError::MissingClientIdentity);
        }
        if self.host().trim().is_empty() {
            return Err(ConfigurationError::MissingHost);
        }
        if self.timeout_ms == Some(0) {
            return Err(ConfigurationError::InvalidTimeout);
        }
        if self.batch.chunk_size() == 0 {
            return Err(ConfigurationError::InvalidChunkSize { size: 0 });
        }
        self.rate_limit.validate()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.trim().is_empty())
}

/// Client for the Biz Ops API.
///
/// Every request made through one client, from any of its API surfaces,
/// goes through the same dispatcher and so shares one rate limit.
///
/// # Examples
///
/// ```no_run
/// use bizops::{BizOpsClient, ClientOptions};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = BizOpsClient::new(
///     ClientOptions::new("api-key").with_system_code("my-importer"),
/// )?;
///
/// let records = vec![json!({ "code": "team-a", "name": "Team A" })];
/// let report = client.batch_patch_records("Team", records).await?;
/// println!("{} records updated", report.successful_record_count);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BizOpsClient<S: Schedule = Dispatcher> {
    options: ClientOptions,
    transport: Transport<S>,
    executor: BatchExecutor,
}

impl BizOpsClient<Dispatcher> {
    /// Validate `options` and create a client with its own dispatcher.
    pub fn new(options: ClientOptions) -> Result<Self, ConfigurationError> {
        let dispatcher = Dispatcher::new(&options.rate_limit)?;
        Self::with_scheduler(options, Arc::new(dispatcher))
    }
}

impl<S: Schedule> BizOpsClient<S> {
    /// Create a client sending through `scheduler`.
    pub fn with_scheduler(
        options: ClientOptions,
        scheduler: Arc<S>,
    ) -> Result<Self, ConfigurationError> {
        let transport = Transport::with_scheduler(&options, scheduler)?;
        let executor = BatchExecutor::new(options.batch.clone());

        log::debug!(
            "Created Biz Ops client for {} (chunk size {}, {} requests per {}ms)",
            options.host(),
            executor.config().chunk_size(),
            options.rate_limit.rate,
            options.rate_limit.interval_ms
        );

        Ok(Self {
            options,
            transport,
            executor,
        })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn transport(&self) -> &Transport<S> {
        &self.transport
    }

    pub fn batch(&self) -> BatchApi<'_, S> {
        BatchApi::new(&self.transport, self.options.batch_endpoint())
    }

    pub fn node(&self) -> NodeApi<'_, S> {
        NodeApi::new(&self.transport)
    }

    pub fn graphql(&self) -> GraphQlApi<'_, S> {
        GraphQlApi::new(&self.transport, self.options.graphql_endpoint())
    }

    /// Create or update any number of records, one chunk per batch request.
    ///
    /// Failed chunks are recorded in the report and never stop the run.
    pub async fn batch_patch_records(
        &self,
        record_type: &str,
        records: Vec<Value>,
    ) -> Result<BatchReport, BatchError> {
        self.batch_patch_records_with(record_type, records, BatchParams::default())
            .await
    }

    pub async fn batch_patch_records_with(
        &self,
        record_type: &str,
        records: Vec<Value>,
        params: BatchParams,
    ) -> Result<BatchReport, BatchError> {
        let api = self.batch();
        let api = &api;

        self.executor
            .process_records(record_type, records, move |record_type, chunk| async move {
                api.patch(record_type, &chunk, &params).await
            })
            .await
    }

    /// Delete any number of records by code, one chunk per batch request.
    pub async fn batch_delete_records(
        &self,
        record_type: &str,
        codes: Vec<String>,
    ) -> Result<BatchReport, BatchError> {
        self.batch_delete_records_with(record_type, codes, BatchParams::default())
            .await
    }

    pub async fn batch_delete_records_with(
        &self,
        record_type: &str,
        codes: Vec<String>,
        params: BatchParams,
    ) -> Result<BatchReport, BatchError> {
        let api = self.batch();
        let api = &api;

        self.executor
            .process_records(record_type, codes, move |record_type, chunk| async move {
                api.delete(record_type, &chunk, &params).await
            })
            .await
    }
}
