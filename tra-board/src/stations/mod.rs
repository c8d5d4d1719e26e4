//! TRA station catalogue.
//!
//! Provides the station code → name list the station picker offers,
//! grouped by county.

mod catalogue;

pub use catalogue::{COUNTIES, County, Station, find};
