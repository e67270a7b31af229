//! covidstats-core - fetch global COVID-19 statistics and keep them in an
//! editable, persisted list of summary strings.
//!
//! Modules:
//!
//! - [`api`]: the HTTP client that fetches and decodes the global stats feed
//! - [`models`]: typed stat records and their display mapping
//! - [`store`]: the persisted scheme list and its preferences file
//! - [`app`]: the view-controller glue that runs fetches in the background
//!   and applies them to the store on the owning task
//! - [`config`]: endpoint and file location settings
//! - [`utils`]: display formatting helpers

pub mod api;
pub mod app;
pub mod config;
pub mod models;
pub mod store;
pub mod utils;

pub use api::{ApiError, StatsClient};
pub use app::App;
pub use config::Config;
pub use models::{GlobalStats, GlobalStatsResponse, RowKind};
pub use store::{Preferences, SchemeListStore};
