use crate::common::{ApiError, Dispatcher, Schedule};
use crate::transport::{Method, Transport};
use crate::utils::url::{encode_segment, query_string, with_query};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How relationships in a write are combined with existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipAction {
    Replace,
    Merge,
}

impl RelationshipAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipAction::Replace => "replace",
            RelationshipAction::Merge => "merge",
        }
    }
}

/// Query parameters accepted by node writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeParams {
    /// Create any nodes needed to satisfy relationships
    pub upsert: Option<bool>,
    /// Comma separated fields only this client may write
    pub lock_fields: Option<String>,
    /// Comma separated fields any client may write again
    pub unlock_fields: Option<String>,
    pub relationship_action: Option<RelationshipAction>,
}

impl NodeParams {
    fn query(&self) -> String {
        query_string([
            ("upsert", self.upsert.map(|upsert| upsert.to_string())),
            ("lockFields", self.lock_fields.clone()),
            ("unlockFields", self.unlock_fields.clone()),
            (
                "relationshipAction",
                self.relationship_action
                    .map(|action| action.as_str().to_string()),
            ),
        ])
    }
}

/// Single record operations on `/v2/node/{type}/{code}`.
#[derive(Debug)]
pub struct NodeApi<'a, S: Schedule = Dispatcher> {
    transport: &'a Transport<S>,
}

impl<'a, S: Schedule> NodeApi<'a, S> {
    pub fn new(transport: &'a Transport<S>) -> Self {
        Self { transport }
    }

    /// Check whether a record exists.
    ///
    /// A 404 answers `false`; any other failure is an error.
    pub async fn head(&self, record_type: &str, code: &str) -> Result<bool, ApiError> {
        match self
            .transport
            .request(Method::HEAD, &node_path(record_type, code), None)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fetch a record
    pub async fn get(&self, record_type: &str, code: &str) -> Result<Option<Value>, ApiError> {
        self.transport
            .request(Method::GET, &node_path(record_type, code), None)
            .await
    }

    /// Create a record
    pub async fn post(
        &self,
        record_type: &str,
        code: &str,
        body: &Value,
        params: &NodeParams,
    ) -> Result<Option<Value>, ApiError> {
        let path = with_query(node_path(record_type, code), &params.query());
        self.transport
            .request(Method::POST, &path, Some(body))
            .await
    }

    /// Update an existing record
    pub async fn patch(
        &self,
        record_type: &str,
        code: &str,
        body: &Value,
        params: &NodeParams,
    ) -> Result<Option<Value>, ApiError> {
        let path = with_query(node_path(record_type, code), &params.query());
        self.transport
            .request(Method::PATCH, &path, Some(body))
            .await
    }

    /// Delete a record
    pub async fn delete(&self, record_type: &str, code: &str) -> Result<(), ApiError> {
        self.transport
            .request(Method::DELETE, &node_path(record_type, code), None)
            .await?;
        Ok(())
    }

    /// Merge `source_code` into `target_code`.
    ///
    /// Properties and relationships of the source record are copied onto the
    /// target, then the source record is deleted.
    pub async fn absorb(
        &self,
        record_type: &str,
        target_code: &str,
        source_code: &str,
    ) -> Result<Option<Value>, ApiError> {
        let path = format!(
            "{}/absorb/{}",
            node_path(record_type, target_code),
            encode_segment(source_code)
        );
        self.transport.request(Method::POST, &path, None).await
    }
}

fn node_path(record_type: &str, code: &str) -> String {
    format!(
        "/v2/node/{}/{}",
        encode_segment(record_type),
        encode_segment(code)
    )
}
