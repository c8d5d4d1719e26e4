//! Web layer for the station board.
//!
//! Serves the station page and a JSON pass-through of the upstream data.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
