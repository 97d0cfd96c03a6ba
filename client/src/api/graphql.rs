use crate::common::{ApiError, Dispatcher, Schedule};
use crate::transport::{Method, Transport};
use crate::utils::url::{query_string, with_query};
use serde_json::{Value, json};

pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "/graphql";

/// Turn a GraphQL response into its `data`.
///
/// A response without `data` fails: with [`ApiError::GraphQl`] when it
/// reports errors, with [`ApiError::InvalidResponse`] otherwise. In strict
/// mode any reported error fails the call even when partial data came back;
/// otherwise partial data wins.
pub fn handle_result(result: Option<Value>, strict: bool) -> Result<Value, ApiError> {
    let Some(result) = result else {
        return Err(unexpected_format("an empty body"));
    };

    let has_data = result.get("data").is_some_and(|data| !data.is_null());
    let has_errors = result.get("errors").is_some_and(|errors| !errors.is_null());

    if has_errors && (strict || !has_data) {
        return Err(ApiError::graphql(result));
    }

    match result {
        Value::Object(mut body) if has_data => Ok(body.remove("data").unwrap_or(Value::Null)),
        other => Err(unexpected_format(&other.to_string())),
    }
}

fn unexpected_format(actual: &str) -> ApiError {
    ApiError::InvalidResponse {
        expected: "a GraphQL response with data or errors".to_string(),
        actual: actual.to_string(),
    }
}

/// Queries against the Biz Ops GraphQL endpoint.
///
/// # Examples
///
/// ```no_run
/// use bizops::{BizOpsClient, ClientOptions};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = BizOpsClient::new(ClientOptions::from_env())?;
///
/// let data = client
///     .graphql()
///     .post(
///         "query getTeam($code: String!) { Team(code: $code) { name } }",
///         Some(&json!({ "code": "team-a" })),
///         true,
///     )
///     .await?;
/// println!("{}", data["Team"]["name"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GraphQlApi<'a, S: Schedule = Dispatcher> {
    transport: &'a Transport<S>,
    endpoint: &'a str,
}

impl<'a, S: Schedule> GraphQlApi<'a, S> {
    pub fn new(transport: &'a Transport<S>, endpoint: &'a str) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    /// Run a query with `GET`, passing query and variables in the query string
    pub async fn get(
        &self,
        query: &str,
        variables: Option<&Value>,
        strict: bool,
    ) -> Result<Value, ApiError> {
        let variables = variables.cloned().unwrap_or_else(|| json!({}));
        let qs = query_string([
            ("query", Some(query.to_string())),
            ("variables", Some(variables.to_string())),
        ]);
        let path = with_query(self.endpoint.to_string(), &qs);

        let result = self.transport.request(Method::GET, &path, None).await?;
        handle_result(result, strict)
    }

    /// Run a query with `POST`, passing query and variables in the body
    pub async fn post(
        &self,
        query: &str,
        variables: Option<&Value>,
        strict: bool,
    ) -> Result<Value, ApiError> {
        let body = json!({
            "query": query,
            "variables": variables.cloned().unwrap_or_else(|| json!({})),
        });

        let result = self
            .transport
            .request(Method::POST, self.endpoint, Some(&body))
            .await?;
        handle_result(result, strict)
    }
}
