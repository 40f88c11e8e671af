//! HTTP transport shared by the bot-list clients
//!
//! Every remote call goes through exactly one [`Transport::send`]. The
//! transport performs the exchange and hands back the raw status and body;
//! mapping a status to a [`BotListError`] kind happens in [`ApiResponse`] so
//! that mocked transports get the same treatment as the real one.

use crate::error::{BotListError, BotListResult};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method};
use serde_json::Value;
use std::fmt;
use tracing::debug;

const USER_AGENT: &str = concat!("dbskr/", env!("CARGO_PKG_VERSION"));

/// HTTP methods used by the bot-list APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        }
    }
}

/// A single outbound request
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Absolute URL, without the query string
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Full value of the `Authorization` header
    pub authorization: Option<String>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            query: Vec::new(),
            body: None,
            authorization: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            query: Vec::new(),
            body: Some(body),
            authorization: None,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    /// Look up a query parameter by name
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("authorized", &self.authorization.is_some())
            .finish()
    }
}

/// Raw response of a single exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response with a JSON body
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Human readable error message: the body's `message` field, or the body itself
    pub fn error_message(&self) -> String {
        serde_json::from_slice::<Value>(&self.body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or_else(|| self.text())
    }

    /// Fail with the kind selected by the status code unless the call succeeded
    pub fn error_for_status(self) -> BotListResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(BotListError::from_status(self.status, self.error_message()))
        }
    }

    /// Parse a successful response body as JSON
    pub fn into_json(self) -> BotListResult<Value> {
        let response = self.error_for_status()?;
        serde_json::from_slice(&response.body)
            .map_err(|e| BotListError::parse(format!("Failed to parse response body: {}", e)))
    }

    /// Raw bytes of a successful response
    pub fn into_bytes(self) -> BotListResult<Vec<u8>> {
        Ok(self.error_for_status()?.body)
    }
}

/// Performs one network exchange per call
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> BotListResult<ApiResponse>;
}

/// [`Transport`] backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> BotListResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BotListError::config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Reuse a session owned by the host application
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> BotListResult<ApiResponse> {
        debug!("{:?} {}", request.method, request.url);

        let mut builder = self.client.request(request.method.into(), &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(auth) = &request.authorization {
            builder = builder.header(AUTHORIZATION, auth);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BotListError::network(format!("Failed to reach {}: {}", request.url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| BotListError::network(format!("Failed to read response body: {}", e)))?;

        Ok(ApiResponse::new(status, body.to_vec()))
    }
}
