//! Durable state for the stats list.
//!
//! This module provides:
//! - `Preferences`: a flat JSON key-value file, read once and rewritten on every change
//! - `SchemeListStore`: the deduplicated set of display strings backed by one preference key
//!
//! The preferences file lives at `~/.config/covidstats/preferences.json` unless
//! configured otherwise.

pub mod preferences;
pub mod scheme_list;

pub use preferences::Preferences;
pub use scheme_list::{sorted_rows, SchemeListStore, LAST_REFRESH_KEY, SCHEME_LIST_KEY};
