//! TDX response records used for display.
//!
//! Only the fields the departure table shows are mapped. Everything is
//! optional except the train number, since TDX omits fields freely.

use serde::Deserialize;

/// Bilingual name (`{"Zh_tw": "臺北", "En": "Taipei"}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameType {
    #[serde(rename = "Zh_tw")]
    pub zh_tw: Option<String>,

    #[serde(rename = "En")]
    pub en: Option<String>,
}

impl NameType {
    /// Chinese name, falling back to English.
    pub fn display(&self) -> Option<&str> {
        self.zh_tw.as_deref().or(self.en.as_deref())
    }
}

/// One entry of `StationTimetables[].Timetables`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimetableEntry {
    pub train_no: String,
    pub train_type_name: Option<NameType>,
    pub destination_station_name: Option<NameType>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
}

/// One entry of `StationLiveBoards`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LiveBoardEntry {
    pub train_no: String,
    pub station_name: Option<NameType>,
    pub train_type_name: Option<NameType>,
    pub ending_station_name: Option<NameType>,
    pub schedule_departure_time: Option<String>,
    pub schedule_arrival_time: Option<String>,
    /// Delay in minutes.
    pub delay_time: Option<i64>,
}
