use std::error::Error;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tra_board::config::AppConfig;
use tra_board::tdx::StationDataClient;
use tra_board::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config = AppConfig::from_env()?;
    if !config.has_credentials() {
        warn!("TDX_CLIENT_ID or TDX_CLIENT_SECRET not set. API calls will fail.");
    }

    let client = StationDataClient::new(config.tdx.clone())?;
    info!(
        auth = ?client.auth().mode(),
        board = %client.board(),
        station = %client.default_station(),
        "TDX client ready"
    );

    let state = AppState::new(client);
    let app = create_router(state);

    let addr = config.listen_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("TRA departure board listening on http://{addr}");
    info!("  GET /                         - Station page");
    info!("  GET /api/stations/:station_id - Raw TDX payload");
    info!("  GET /health                   - Health check");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initializes tracing with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tra_board=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
