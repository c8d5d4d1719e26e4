//! TDX client error types.

/// Errors from the credential manager and the station data client.
///
/// Every error propagates to the caller unchanged. Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum TdxError {
    /// Client id or secret is missing
    #[error("credentials not configured: set TDX_CLIENT_ID and TDX_CLIENT_SECRET")]
    Configuration,

    /// Token endpoint answered non-2xx or could not be reached
    #[error("{}", token_message(.status, .body))]
    TokenAcquisition { status: Option<u16>, body: String },

    /// Data endpoint answered non-2xx
    #[error("upstream request failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Network-level failure (DNS, refused connection, timeout)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not valid JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// A credential could not be encoded as a header value
    #[error("invalid header value: {0}")]
    InvalidHeader(&'static str),
}

impl TdxError {
    /// Whether this error is a missing-credentials error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, TdxError::Configuration)
    }

    /// HTTP status reported by the upstream, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            TdxError::TokenAcquisition { status, .. } => *status,
            TdxError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn token_message(status: &Option<u16>, body: &str) -> String {
    match status {
        Some(status) => format!("failed to acquire access token (status {status}): {body}"),
        None => format!("failed to acquire access token: {body}"),
    }
}
