//! REST API client module for the virus tracker free API.
//!
//! This module provides the `StatsClient` for fetching the global stats
//! feed. The API is public: no authentication, a single GET endpoint.

pub mod client;
pub mod error;

pub use client::{StatsClient, GLOBAL_STATS_URL};
pub use error::ApiError;
