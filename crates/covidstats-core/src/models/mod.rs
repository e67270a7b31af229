//! Data models for the global stats feed.
//!
//! - `GlobalStats`, `GlobalStatsResponse`: the API payload, every field optional
//! - `RowKind`: presentation class of a display row

pub mod row;
pub mod stats;

pub use row::RowKind;
pub use stats::{summary_lines, GlobalStats, GlobalStatsResponse};
