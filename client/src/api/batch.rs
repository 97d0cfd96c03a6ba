use crate::common::{ApiError, Dispatcher, Schedule};
use crate::transport::{Method, Transport};
use crate::utils::url::{encode_segment, join_url, query_string, with_query};
use serde_json::Value;

pub const DEFAULT_BATCH_ENDPOINT: &str = "/v1/batch";

/// Query parameters accepted by the batch endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchParams {
    /// Validate the request without writing anything
    pub dry_run: bool,
}

impl BatchParams {
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    fn query(&self) -> String {
        query_string([("dryRun", self.dry_run.then(|| "true".to_string()))])
    }
}

/// Bulk operations on records of one type.
///
/// The API rejects or accepts a batch as a whole. A rejected batch answers
/// with an `errors` list naming every problem, surfaced through
/// [`ApiError::Http`].
#[derive(Debug)]
pub struct BatchApi<'a, S: Schedule = Dispatcher> {
    transport: &'a Transport<S>,
    endpoint: &'a str,
}

impl<'a, S: Schedule> BatchApi<'a, S> {
    pub fn new(transport: &'a Transport<S>, endpoint: &'a str) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    fn path(&self, record_type: &str, params: &BatchParams) -> String {
        with_query(
            join_url(self.endpoint, &encode_segment(record_type)),
            &params.query(),
        )
    }

    /// Create or update a batch of records: `PATCH {endpoint}/{type}`
    pub async fn patch(
        &self,
        record_type: &str,
        records: &[Value],
        params: &BatchParams,
    ) -> Result<Option<Value>, ApiError> {
        let body = Value::Array(records.to_vec());
        self.transport
            .request(Method::PATCH, &self.path(record_type, params), Some(&body))
            .await
    }

    /// Delete a batch of records by code: `DELETE {endpoint}/{type}`
    pub async fn delete(
        &self,
        record_type: &str,
        codes: &[String],
        params: &BatchParams,
    ) -> Result<Option<Value>, ApiError> {
        let body = Value::from(codes.to_vec());
        self.transport
            .request(Method::DELETE, &self.path(record_type, params), Some(&body))
            .await
    }
}
