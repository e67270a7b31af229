//! Application state for covidstats.
//!
//! `App` plays the part of the list view's controller: it owns the scheme
//! list store, starts a background fetch whenever the view appears, and
//! applies finished fetches on the owning task. Results travel back through
//! an MPSC channel so the store is never touched from the spawned task.

use std::future::Future;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::{ApiError, StatsClient};
use crate::config::Config;
use crate::models::{summary_lines, GlobalStats, RowKind};
use crate::store::{Preferences, SchemeListStore};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background fetch channel.
const CHANNEL_BUFFER_SIZE: usize = 8;

type FetchResult = Result<Vec<GlobalStats>, ApiError>;

/// What happened when a finished fetch was applied.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The list was replaced; `rows` is the new row count.
    Applied { rows: usize },
    /// The fetch failed and the previous list was kept.
    Failed(ApiError),
}

pub struct App {
    store: SchemeListStore,
    api: StatsClient,
    in_flight: usize,
    fetch_tx: mpsc::Sender<FetchResult>,
    fetch_rx: mpsc::Receiver<FetchResult>,
}

impl App {
    /// Open the preferences file and build the client from `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let prefs_path = config.preferences_path()?;
        debug!(path = %prefs_path.display(), endpoint = config.endpoint(), "Opening app");
        let prefs = Preferences::open(prefs_path)?;
        let api = StatsClient::with_url(config.endpoint())?;
        Ok(Self::from_parts(SchemeListStore::new(prefs), api))
    }

    pub fn from_parts(store: SchemeListStore, api: StatsClient) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self {
            store,
            api,
            in_flight: 0,
            fetch_tx,
            fetch_rx,
        }
    }

    pub fn store(&self) -> &SchemeListStore {
        &self.store
    }

    /// Mutable access for the manual add/remove/commit entry points.
    pub fn store_mut(&mut self) -> &mut SchemeListStore {
        &mut self.store
    }

    /// True while at least one fetch has not been applied yet.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Start a fetch of the global stats in the background.
    ///
    /// A second call while one is in flight starts another request; both
    /// are applied in the order they finish.
    pub fn on_view_appear(&mut self) {
        let api = self.api.clone();
        self.spawn_fetch(async move { api.fetch().await });
    }

    /// Run `fetch` on the runtime and queue its result for the owning task.
    pub fn spawn_fetch<F>(&mut self, fetch: F)
    where
        F: Future<Output = FetchResult> + Send + 'static,
    {
        if self.in_flight > 0 {
            debug!(in_flight = self.in_flight, "Fetch already in flight, starting another");
        }
        self.in_flight += 1;
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = fetch.await;
            Self::send_result(&tx, result).await;
        });
    }

    /// Helper to send fetch results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<FetchResult>, result: FetchResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send fetch result - channel closed");
        }
    }

    /// Apply every fetch that has finished, without waiting.
    pub fn check_background_tasks(&mut self) -> Vec<FetchOutcome> {
        let mut results = Vec::new();
        while let Ok(result) = self.fetch_rx.try_recv() {
            results.push(result);
        }
        results
            .into_iter()
            .map(|result| self.apply_fetch_result(result))
            .collect()
    }

    /// Wait for the next fetch to finish and apply it. Returns `None` when
    /// nothing is in flight.
    pub async fn wait_for_fetch(&mut self) -> Option<FetchOutcome> {
        if self.in_flight == 0 {
            return None;
        }
        let result = self.fetch_rx.recv().await?;
        Some(self.apply_fetch_result(result))
    }

    fn apply_fetch_result(&mut self, result: FetchResult) -> FetchOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        match result {
            Ok(stats) => {
                let lines = summary_lines(&stats);
                info!(records = stats.len(), lines = lines.len(), "Replacing scheme list");
                if let Err(e) = self.store.replace_all(lines) {
                    warn!(error = %e, "Failed to persist scheme list");
                }
                if let Err(e) = self.store.record_refresh(Utc::now()) {
                    warn!(error = %e, "Failed to persist refresh time");
                }
                FetchOutcome::Applied {
                    rows: self.store.row_count(),
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    transport = e.is_transport(),
                    decode = e.is_decode(),
                    "Global stats fetch failed, keeping previous list"
                );
                FetchOutcome::Failed(e)
            }
        }
    }

    // ===== Row access for the list view =====

    pub fn row_count(&self) -> usize {
        self.store.row_count()
    }

    pub fn row(&self, index: usize) -> Option<String> {
        self.store.row(index)
    }

    pub fn row_kind(&self, index: usize) -> Option<RowKind> {
        self.row(index).map(|row| RowKind::classify(&row))
    }

    /// All rows in display order with their presentation class.
    pub fn rows(&self) -> Vec<(String, RowKind)> {
        self.store
            .sorted_rows()
            .into_iter()
            .map(|row| {
                let kind = RowKind::classify(&row);
                (row, kind)
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
