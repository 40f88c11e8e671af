//! GraphQL request and response envelopes

use dbskr_core::{BotListError, BotListResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// GraphQL request payload.
///
/// UniqueBots takes `variables` as a JSON-encoded string, not an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: String,
    #[serde(rename = "operationName", skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphqlRequest {
    /// Create a request, encoding `variables` to a string
    pub fn new(query: impl Into<String>, variables: &Value) -> Self {
        Self {
            query: query.into(),
            variables: variables.to_string(),
            operation_name: None,
        }
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn to_body(&self) -> BotListResult<Value> {
        serde_json::to_value(self)
            .map_err(|e| BotListError::parse(format!("Failed to encode GraphQL request: {}", e)))
    }
}

/// GraphQL error location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// Entry of the `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default)]
    pub locations: Vec<GraphqlErrorLocation>,
    #[serde(default)]
    pub path: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphqlError {
    /// `extensions.code`, when the server sets one
    pub fn code(&self) -> Option<&str> {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(Value::as_str)
    }

    /// Map the error onto the shared error kinds
    pub fn to_error(&self) -> BotListError {
        match self.code().map(str::to_ascii_uppercase).as_deref() {
            Some("UNAUTHENTICATED" | "UNAUTHORIZED" | "FORBIDDEN") => {
                BotListError::auth(self.message.clone())
            }
            Some("NOT_FOUND") => BotListError::not_found(self.message.clone()),
            Some("RATE_LIMITED" | "TOO_MANY_REQUESTS") => {
                BotListError::rate_limited(self.message.clone())
            }
            _ => BotListError::graphql(self.message.clone()),
        }
    }
}

/// GraphQL response container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<GraphqlError>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<GraphqlError>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<GraphqlError>>::deserialize(deserializer)?.unwrap_or_default())
}

impl GraphqlResponse {
    /// Returns `true` if no GraphQL errors were returned.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The `data` object, or the first error mapped to its kind
    pub fn into_data(self) -> BotListResult<Value> {
        if let Some(error) = self.errors.first() {
            return Err(error.to_error());
        }
        match self.data {
            Some(Value::Null) | None => Err(BotListError::parse("GraphQL response has no data")),
            Some(data) => Ok(data),
        }
    }
}

impl TryFrom<Value> for GraphqlResponse {
    type Error = BotListError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
            .map_err(|e| BotListError::parse(format!("Invalid GraphQL response: {}", e)))
    }
}
