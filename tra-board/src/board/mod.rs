//! Projection of raw TDX payloads into departure-table rows.
//!
//! The client returns upstream JSON untouched; this module picks out the
//! columns the page shows. Entries that are not objects or have no train
//! number are skipped.

mod types;

use chrono::DateTime;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::tdx::Board;

pub use types::{LiveBoardEntry, NameType, TimetableEntry};

/// Departure status shown in the last column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainStatus {
    OnTime,
    /// Delayed by this many minutes.
    Delayed(u32),
}

impl TrainStatus {
    fn from_delay(minutes: Option<i64>) -> Self {
        match minutes {
            Some(m) if m > 0 => TrainStatus::Delayed(u32::try_from(m).unwrap_or(u32::MAX)),
            _ => TrainStatus::OnTime,
        }
    }

    pub fn label(&self) -> String {
        match self {
            TrainStatus::OnTime => "準點".to_string(),
            TrainStatus::Delayed(m) => format!("晚 {m} 分"),
        }
    }

    pub fn is_delayed(&self) -> bool {
        matches!(self, TrainStatus::Delayed(_))
    }
}

/// One row of the departure table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureRow {
    pub train_no: String,
    pub train_type: String,
    pub destination: String,
    pub time: String,
    pub status: TrainStatus,
}

/// Everything the page needs from one payload.
#[derive(Debug, Clone, Default)]
pub struct BoardView {
    pub station_name: Option<String>,
    pub updated_at: Option<String>,
    pub rows: Vec<DepartureRow>,
}

impl BoardView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Project a payload fetched for `board` into display rows.
pub fn project(board: Board, payload: &Value) -> BoardView {
    let updated_at = payload
        .get("UpdateTime")
        .and_then(Value::as_str)
        .map(format_update_time);

    let (station_name, rows) = match board {
        Board::Timetable => project_timetable(payload),
        Board::LiveBoard => project_live_board(payload),
    };

    BoardView {
        station_name,
        updated_at,
        rows,
    }
}

fn project_timetable(payload: &Value) -> (Option<String>, Vec<DepartureRow>) {
    let Some(station) = payload
        .get("StationTimetables")
        .and_then(Value::as_array)
        .and_then(|s| s.first())
    else {
        return (None, Vec::new());
    };

    let station_name = name_at(station, "StationName");

    let rows = entries::<TimetableEntry>(station.get("Timetables"))
        .filter(|t| !t.train_no.trim().is_empty())
        .map(|t| DepartureRow {
            train_type: train_type_label(t.train_type_name.as_ref()),
            destination: name_or_blank(t.destination_station_name.as_ref()),
            time: t.departure_time.or(t.arrival_time).unwrap_or_default(),
            status: TrainStatus::OnTime,
            train_no: t.train_no,
        })
        .collect();

    (station_name, rows)
}

fn project_live_board(payload: &Value) -> (Option<String>, Vec<DepartureRow>) {
    let boards: Vec<LiveBoardEntry> = entries(payload.get("StationLiveBoards"))
        .filter(|b: &LiveBoardEntry| !b.train_no.trim().is_empty())
        .collect();

    let station_name = boards
        .iter()
        .find_map(|b| b.station_name.as_ref().and_then(NameType::display))
        .map(str::to_string);

    let rows = boards
        .into_iter()
        .map(|b| DepartureRow {
            train_type: train_type_label(b.train_type_name.as_ref()),
            destination: name_or_blank(b.ending_station_name.as_ref()),
            time: b
                .schedule_departure_time
                .or(b.schedule_arrival_time)
                .unwrap_or_default(),
            status: TrainStatus::from_delay(b.delay_time),
            train_no: b.train_no,
        })
        .collect();

    (station_name, rows)
}

/// Deserialize each array element that fits `T`, skipping the rest.
fn entries<T: DeserializeOwned>(array: Option<&Value>) -> impl Iterator<Item = T> + '_ {
    array
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|v| v.is_object())
        .filter_map(|v| T::deserialize(v).ok())
}

fn name_at(value: &Value, key: &str) -> Option<String> {
    let name = NameType::deserialize(value.get(key)?).ok()?;
    name.display().map(str::to_string)
}

fn name_or_blank(name: Option<&NameType>) -> String {
    name.and_then(NameType::display).unwrap_or_default().to_string()
}

/// `自強(381)` → `自強`.
fn train_type_label(name: Option<&NameType>) -> String {
    let full = name.and_then(NameType::display).unwrap_or_default();
    full.split('(').next().unwrap_or_default().trim().to_string()
}

/// Render `UpdateTime` as wall-clock text in its own offset.
fn format_update_time(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(t) => t.format("%Y/%m/%d %H:%M:%S").to_string(),
        Err(_) => raw.to_string(),
    }
}
