/// Errors from the catalog client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error ({status} {code}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error code from the JSON error body, e.g. `NOT_FOUND`.
        code: String,
        /// Human-readable message from the error body.
        message: String,
    },

    /// The client configuration is unusable.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}
