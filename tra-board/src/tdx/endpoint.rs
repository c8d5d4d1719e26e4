//! TDX data endpoints.

use std::fmt;
use std::str::FromStr;

use crate::domain::StationId;

/// Default base URL for the TDX basic API.
pub const DEFAULT_BASE_URL: &str = "https://tdx.transportdata.tw/api/basic";

/// Which station data set to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Board {
    /// Scheduled departures (`GeneralStationTimetable`).
    #[default]
    Timetable,
    /// Real-time departures with delays (`LiveBoard`).
    LiveBoard,
}

impl Board {
    fn path(self) -> &'static str {
        match self {
            Board::Timetable => "v3/Rail/TRA/GeneralStationTimetable/Station",
            Board::LiveBoard => "v3/Rail/TRA/LiveBoard/Station",
        }
    }

    fn query(self) -> &'static str {
        // `$` is sent percent-encoded.
        match self {
            Board::Timetable => "%24format=JSON",
            Board::LiveBoard => "%24top=30&%24format=JSON",
        }
    }

    /// Full request URL for `station` under `base_url`.
    pub fn url(self, base_url: &str, station: &StationId) -> String {
        format!(
            "{}/{}/{}?{}",
            base_url.trim_end_matches('/'),
            self.path(),
            station.as_str(),
            self.query()
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Board::Timetable => "timetable",
            Board::LiveBoard => "liveboard",
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Board {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timetable" => Ok(Board::Timetable),
            "liveboard" | "live" => Ok(Board::LiveBoard),
            other => Err(format!(
                "unknown board '{other}' (expected timetable or liveboard)"
            )),
        }
    }
}
