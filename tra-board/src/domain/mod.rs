//! Domain types for the departure board.
//!
//! Types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod station_id;

pub use station_id::{InvalidStationId, StationId};
