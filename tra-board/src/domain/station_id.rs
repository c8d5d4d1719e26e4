//! Station code types.

use std::fmt;
use std::str::FromStr;

/// Longest station code accepted. TDX codes are 4 digits or 3 letters.
const MAX_LEN: usize = 8;

/// Taipei Main Station.
const DEFAULT_STATION: &str = "1000";

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// A TRA station code as recognised by TDX (e.g. `1000` or `TPE`).
///
/// Codes are interpolated into request paths, so only ASCII letters and
/// digits are accepted. Any `StationId` value is valid by construction.
///
/// # Examples
///
/// ```
/// use tra_board::domain::StationId;
///
/// let taipei = StationId::parse("1000").unwrap();
/// assert_eq!(taipei.as_str(), "1000");
///
/// assert!(StationId::parse("TPE").is_ok());
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("10/00").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationId(String);

impl StationId {
    /// Parse a station code.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }

        if s.len() > MAX_LEN {
            return Err(InvalidStationId {
                reason: "too long",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidStationId {
                reason: "must be ASCII letters or digits",
            });
        }

        Ok(StationId(s.to_string()))
    }

    /// Parse after trimming surrounding whitespace (user input).
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidStationId> {
        Self::parse(s.trim())
    }

    /// Returns the station code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StationId {
    /// Taipei Main Station (`1000`).
    fn default() -> Self {
        StationId(DEFAULT_STATION.to_string())
    }
}

impl FromStr for StationId {
    type Err = InvalidStationId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for StationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(StationId::parse("1000").is_ok());
        assert!(StationId::parse("0900").is_ok());
        assert!(StationId::parse("TPE").is_ok());
    }

    #[test]
    fn reject_empty() {
        let err = StationId::parse("").unwrap_err();
        assert_eq!(err.to_string(), "invalid station code: must not be empty");
    }

    #[test]
    fn reject_path_characters() {
        assert!(StationId::parse("10/00").is_err());
        assert!(StationId::parse("1000?x=1").is_err());
        assert!(StationId::parse("../x").is_err());
        assert!(StationId::parse("臺北").is_err());
    }

    #[test]
    fn reject_too_long() {
        assert!(StationId::parse("123456789").is_err());
    }

    #[test]
    fn normalized_trims_whitespace() {
        let id = StationId::parse_normalized("  1000 ").unwrap();
        assert_eq!(id.as_str(), "1000");
        assert!(StationId::parse("  1000 ").is_err());
    }

    #[test]
    fn display_and_debug() {
        let id = StationId::parse("4400").unwrap();
        assert_eq!(format!("{}", id), "4400");
        assert_eq!(format!("{:?}", id), "StationId(4400)");
    }

    #[test]
    fn default_is_taipei() {
        assert_eq!(StationId::default().as_str(), "1000");
        assert_eq!(StationId::parse(DEFAULT_STATION), Ok(StationId::default()));
    }

    #[test]
    fn from_str() {
        let id: StationId = "TPE".parse().unwrap();
        assert_eq!(id.as_str(), "TPE");
    }
}
