use thiserror::Error;

/// Errors returned by the remote service clients.
///
/// Every variant is recoverable: the caller retries by repeating the user
/// action that triggered the call.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Network or TLS failure, timeout, or non-2xx status from the
    /// underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A field the service contract requires is missing or has the wrong
    /// type. User-visible as a remote failure; the field name is kept for
    /// diagnosis.
    #[error("unexpected response shape from {context}: field `{field}` {reason}")]
    DataShape {
        context: String,
        field: String,
        reason: String,
    },

    /// The geocoder returned zero results for the query. Distinct from a
    /// call failure: the service worked, the address just did not resolve.
    #[error("address not found: \"{query}\"")]
    AddressNotFound { query: String },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
