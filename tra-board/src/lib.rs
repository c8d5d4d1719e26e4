//! Taiwan Railway departure board server.
//!
//! Authenticates against the TDX transport data platform (OAuth2 client
//! credentials or HMAC-SHA1 request signing), fetches a station's timetable
//! or live board, and serves it as a web page and as raw JSON.

pub mod board;
pub mod config;
pub mod domain;
pub mod stations;
pub mod tdx;
pub mod web;
