//! Askama templates for the web frontend.

use askama::Template;

use crate::board::{BoardView, DepartureRow};
use crate::domain::StationId;
use crate::stations::{COUNTIES, find};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Station page: picker plus departure table.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub picker: Vec<CountyOption>,
    pub heading: String,
    pub updated_at: Option<String>,
    pub rows: Vec<RowView>,
}

impl IndexTemplate {
    pub fn new(station: &StationId, board: BoardView) -> Self {
        let name = board
            .station_name
            .clone()
            .or_else(|| find(station).map(|s| s.name.to_string()))
            .unwrap_or_else(|| "車站".to_string());

        Self {
            picker: picker_options(station),
            heading: format!("{name} 時刻表"),
            updated_at: board.updated_at,
            rows: board.rows.iter().map(RowView::from_row).collect(),
        }
    }
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub picker: Vec<CountyOption>,
    pub title: String,
    pub message: String,
}

impl ErrorTemplate {
    pub fn new(station: Option<&StationId>, message: impl Into<String>) -> Self {
        let default = StationId::default();
        Self {
            picker: picker_options(station.unwrap_or(&default)),
            title: "錯誤".to_string(),
            message: message.into(),
        }
    }
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// One `<optgroup>` of the station picker.
#[derive(Debug, Clone)]
pub struct CountyOption {
    pub name: &'static str,
    pub stations: Vec<StationOption>,
}

/// One `<option>` of the station picker.
#[derive(Debug, Clone)]
pub struct StationOption {
    pub code: &'static str,
    pub name: &'static str,
    pub selected: bool,
}

/// Departure row view model for templates.
#[derive(Debug, Clone)]
pub struct RowView {
    pub train_no: String,
    pub train_type: String,
    pub destination: String,
    pub time: String,
    pub status: String,
    pub is_delayed: bool,
}

impl RowView {
    pub fn from_row(row: &DepartureRow) -> Self {
        Self {
            train_no: row.train_no.clone(),
            train_type: row.train_type.clone(),
            destination: row.destination.clone(),
            time: row.time.clone(),
            status: row.status.label(),
            is_delayed: row.status.is_delayed(),
        }
    }
}

/// Build the picker with `selected` marked.
pub fn picker_options(selected: &StationId) -> Vec<CountyOption> {
    COUNTIES
        .iter()
        .map(|county| CountyOption {
            name: county.name,
            stations: county
                .stations
                .iter()
                .map(|s| StationOption {
                    code: s.code,
                    name: s.name,
                    selected: s.code == selected.as_str(),
                })
                .collect(),
        })
        .collect()
}
