//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::board::project;
use crate::domain::StationId;
use crate::tdx::TdxError;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(station_page))
        .route("/health", get(health))
        .route("/api/stations/:station_id", get(station_data))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Station page with picker and departure table.
async fn station_page(State(state): State<AppState>, Query(query): Query<BoardQuery>) -> Response {
    let station = match query.station.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => match StationId::parse_normalized(raw) {
            Ok(station) => station,
            Err(e) => return error_page(AppError::from(e), None),
        },
        None => state.tdx.default_station().clone(),
    };

    match state.tdx.fetch_station_data(Some(&station)).await {
        Ok(payload) => {
            let board = project(state.tdx.board(), &payload);
            render(StatusCode::OK, IndexTemplate::new(&station, board))
        }
        Err(e) => error_page(AppError::from(e), Some(&station)),
    }
}

/// Upstream JSON for one station, unmodified.
async fn station_data(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let station = StationId::parse_normalized(&station_id)?;
    let payload = state.tdx.fetch_station_data(Some(&station)).await?;
    Ok(Json(payload))
}

fn render(status: StatusCode, template: impl Template) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => AppError::Internal {
            message: format!("Template error: {}", e),
        }
        .into_response(),
    }
}

fn error_page(error: AppError, station: Option<&StationId>) -> Response {
    let status = error.status();
    let message = error.message().to_string();
    warn!("[{status}] {message}");
    render(status, ErrorTemplate::new(station, message))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotConfigured { message: String },
    Upstream { message: String },
    Internal { message: String },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotConfigured { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::BadRequest { message }
            | AppError::NotConfigured { message }
            | AppError::Upstream { message }
            | AppError::Internal { message } => message,
        }
    }
}

impl From<TdxError> for AppError {
    fn from(e: TdxError) -> Self {
        if e.is_configuration() {
            AppError::NotConfigured {
                message: e.to_string(),
            }
        } else {
            AppError::Upstream {
                message: e.to_string(),
            }
        }
    }
}

impl From<crate::domain::InvalidStationId> for AppError {
    fn from(e: crate::domain::InvalidStationId) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = self.message().to_string();

        warn!("[{status}] {message}");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
