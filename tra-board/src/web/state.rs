//! Application state for the web layer.

use std::sync::Arc;

use crate::tdx::StationDataClient;

/// Shared application state.
///
/// One long-lived client, so every request shares its credential cache.
#[derive(Clone)]
pub struct AppState {
    /// TDX station data client
    pub tdx: Arc<StationDataClient>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(tdx: StationDataClient) -> Self {
        Self { tdx: Arc::new(tdx) }
    }
}
