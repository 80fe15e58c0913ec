use thiserror::Error;

/// Represents errors that may occur while building or executing an API call
#[derive(Error, Debug)]
pub enum ClientError {
    /// The supplied HTTP method is not a valid method token
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// A default or per-call header has a name or value that is not legal HTTP
    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// Failed to build the underlying HTTP transport
    #[error("Failed to build HTTP transport: {0}")]
    Transport(#[source] reqwest::Error),

    /// Failed to serialize the request parameters as JSON
    #[error("Failed to serialize request parameters: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Failed to send the request to the server
    #[error("Failed to send request: {0}")]
    Network(#[source] reqwest::Error),

    /// Failed to decode the response body as a JSON object
    #[error("Failed to decode response body: {0}")]
    Response(#[source] reqwest::Error),
}
