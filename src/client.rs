use std::collections::HashMap;
use std::sync::OnceLock;

use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use http::Method;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ClientError;
use crate::transport::HttpTransport;

/// Accumulates client configuration before the [`Client`] is built.
#[derive(Debug, Default, Clone)]
pub struct ClientBuilder {
    endpoint: String,
    headers: HashMap<String, String>,
    self_signed: bool,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default endpoint to which the client connects
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Allow connections to a server using a self-signed certificate
    pub fn self_signed(mut self, status: bool) -> Self {
        self.self_signed = status;
        self
    }

    /// Adds a header that the client should send on each request
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Your project ID
    pub fn project(self, value: impl Into<String>) -> Self {
        self.header("X-Appwrite-Project", value)
    }

    /// Your secret API key
    pub fn key(self, value: impl Into<String>) -> Self {
        self.header("X-Appwrite-Key", value)
    }

    pub fn locale(self, value: impl Into<String>) -> Self {
        self.header("X-Appwrite-Locale", value)
    }

    pub fn mode(self, value: impl Into<String>) -> Self {
        self.header("X-Appwrite-Mode", value)
    }

    pub fn build(self) -> Client {
        Client {
            endpoint: self.endpoint,
            headers: self.headers,
            self_signed: self.self_signed,
            transport: OnceLock::new(),
        }
    }
}

/// The configured handle used to issue API calls.
///
/// Configuration is fixed at construction through [`ClientBuilder`]; per-call
/// overrides are merged on top of it without mutating the client, so one
/// instance can be shared freely across tasks.
#[derive(Debug)]
pub struct Client {
    endpoint: String,
    headers: HashMap<String, String>,
    self_signed: bool,
    transport: OnceLock<HttpTransport>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Calls an API endpoint and returns the decoded JSON response body.
    ///
    /// # Arguments
    /// * `method` - HTTP method, matched case-insensitively
    /// * `path` - appended verbatim to the configured endpoint
    /// * `headers` - per-call headers, override the default headers on key collision
    /// * `params` - sent as the JSON request body, or as the URL query string for GET
    ///
    /// # Returns
    /// * The response body decoded as a JSON object, whatever the HTTP status;
    ///   error-shaped API responses are returned like any other and status
    ///   handling is left to the caller
    /// * An error if the request cannot be built, sent, or decoded
    pub async fn call(
        &self,
        method: &str,
        path: &str,
        headers: &HashMap<String, Value>,
        params: &HashMap<String, Value>,
    ) -> Result<Map<String, Value>, ClientError> {
        let transport = self.transport()?;

        // Endpoint and path are joined verbatim; the caller owns the separator.
        let url = format!("{}{}", self.endpoint, path);

        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| ClientError::InvalidMethod(method.to_string()))?;
        let is_get = method == Method::GET;

        debug!(method = %method, url = %url, "dispatching API call");

        let mut header_map = self.merged_headers(headers)?;
        let mut request = transport.request(method, &url);

        if is_get {
            let query: Vec<(&str, String)> = params
                .iter()
                .map(|(key, value)| (key.as_str(), scalar_text(value)))
                .collect();
            request = request.query(&query);
        } else {
            let body = serde_json::to_vec(params).map_err(ClientError::Serialize)?;
            debug!(bytes = body.len(), "serialized request body");
            // Forced for every non-GET request, after both header layers.
            header_map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            request = request.body(body);
        }

        let response = request
            .headers(header_map)
            .send()
            .await
            .map_err(ClientError::Network)?;

        debug!(status = response.status().as_u16(), "response received");

        response
            .json::<Map<String, Value>>()
            .await
            .map_err(ClientError::Response)
    }

    pub async fn get(
        &self,
        path: &str,
        headers: &HashMap<String, Value>,
        params: &HashMap<String, Value>,
    ) -> Result<Map<String, Value>, ClientError> {
        self.call("GET", path, headers, params).await
    }

    pub async fn post(
        &self,
        path: &str,
        headers: &HashMap<String, Value>,
        params: &HashMap<String, Value>,
    ) -> Result<Map<String, Value>, ClientError> {
        self.call("POST", path, headers, params).await
    }

    pub async fn put(
        &self,
        path: &str,
        headers: &HashMap<String, Value>,
        params: &HashMap<String, Value>,
    ) -> Result<Map<String, Value>, ClientError> {
        self.call("PUT", path, headers, params).await
    }

    pub async fn patch(
        &self,
        path: &str,
        headers: &HashMap<String, Value>,
        params: &HashMap<String, Value>,
    ) -> Result<Map<String, Value>, ClientError> {
        self.call("PATCH", path, headers, params).await
    }

    pub async fn delete(
        &self,
        path: &str,
        headers: &HashMap<String, Value>,
        params: &HashMap<String, Value>,
    ) -> Result<Map<String, Value>, ClientError> {
        self.call("DELETE", path, headers, params).await
    }

    /// Returns the transport, building it on first use. Once created it is
    /// never replaced; every call through this client reuses the same handle.
    fn transport(&self) -> Result<&HttpTransport, ClientError> {
        if let Some(transport) = self.transport.get() {
            return Ok(transport);
        }
        // Concurrent first calls may each build a transport here, but only
        // one wins the `get_or_init` race and the losers are dropped; the
        // stored handle is never replaced.
        let built = HttpTransport::new(self.self_signed)?;
        Ok(self.transport.get_or_init(|| built))
    }

    /// Default headers first, then the per-call headers; insertion replaces,
    /// so a per-call header wins over a default one with the same name.
    fn merged_headers(
        &self,
        custom: &HashMap<String, Value>,
    ) -> Result<HeaderMap, ClientError> {
        let mut merged = HeaderMap::new();
        for (name, value) in &self.headers {
            insert_header(&mut merged, name, value)?;
        }
        for (name, value) in custom {
            insert_header(&mut merged, name, &scalar_text(value))?;
        }
        Ok(merged)
    }
}

fn insert_header(map: &mut HeaderMap, name: &str, value: &str) -> Result<(), ClientError> {
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|e| ClientError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    let header_value = HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    map.insert(header_name, header_value);
    Ok(())
}

/// Query-string and header rendering of a JSON value: strings render without
/// surrounding quotes, everything else uses its JSON text.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
