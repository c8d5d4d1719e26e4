//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

/// Query string of the station page.
#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    /// Station code (defaults to the configured station)
    pub station: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
