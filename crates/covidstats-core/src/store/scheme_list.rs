//! The scheme list: the persisted set of summary strings shown to the user.
//!
//! The set is unordered in memory. Views ask for `sorted_rows` (or `row`)
//! and get a lexicographic order computed on demand. Every mutation rewrites
//! the preference key and publishes the new rows on a watch channel.

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::debug;

use super::Preferences;

/// Preference key holding the display strings
pub const SCHEME_LIST_KEY: &str = "SchemeList";

/// Preference key holding the time of the last successful network refresh
pub const LAST_REFRESH_KEY: &str = "LastRefresh";

/// Sort a display set for indexed rendering.
pub fn sorted_rows(entries: &HashSet<String>) -> Vec<String> {
    let mut rows: Vec<String> = entries.iter().cloned().collect();
    rows.sort();
    rows
}

/// Blank means empty after `str::trim`, so newline-only entries count too.
fn is_blank(entry: &str) -> bool {
    entry.trim().is_empty()
}

pub struct SchemeListStore {
    prefs: Preferences,
    entries: HashSet<String>,
    changes: watch::Sender<Vec<String>>,
}

impl SchemeListStore {
    /// Build the store from whatever is persisted in `prefs`.
    pub fn new(prefs: Preferences) -> Self {
        let entries = Self::load(&prefs);
        debug!(count = entries.len(), "Scheme list loaded");
        let (changes, _) = watch::channel(sorted_rows(&entries));
        Self {
            prefs,
            entries,
            changes,
        }
    }

    /// Read the persisted array and collapse it into a set, skipping blank entries.
    pub fn load(prefs: &Preferences) -> HashSet<String> {
        prefs
            .string_array(SCHEME_LIST_KEY)
            .into_iter()
            .filter(|e| !is_blank(e))
            .collect()
    }

    /// Subscribe to change notifications. The receiver always holds the
    /// latest sorted rows.
    pub fn subscribe(&self) -> watch::Receiver<Vec<String>> {
        self.changes.subscribe()
    }

    pub fn entries(&self) -> &HashSet<String> {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.entries.len()
    }

    pub fn sorted_rows(&self) -> Vec<String> {
        sorted_rows(&self.entries)
    }

    /// Row at a sorted index, or `None` past the end.
    pub fn row(&self, index: usize) -> Option<String> {
        self.sorted_rows().into_iter().nth(index)
    }

    /// Replace the whole set.
    pub fn replace_all<I, S>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries = entries
            .into_iter()
            .map(Into::<String>::into)
            .filter(|e| !is_blank(e))
            .collect();
        self.commit()
    }

    /// Insert one entry. Blank entries are not stored; returns whether the
    /// entry was new.
    pub fn add(&mut self, entry: impl Into<String>) -> Result<bool> {
        let entry = entry.into();
        if is_blank(&entry) {
            debug!("Ignoring blank scheme list entry");
            return Ok(false);
        }
        let inserted = self.entries.insert(entry);
        self.commit()?;
        Ok(inserted)
    }

    /// Remove the given entries. Returns how many were present.
    pub fn remove<I, S>(&mut self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let removed = entries
            .into_iter()
            .filter(|e| self.entries.remove(e.as_ref()))
            .count();
        self.commit()?;
        Ok(removed)
    }

    /// Rebuild the set from the values currently rendered by the view,
    /// dropping blank rows.
    pub fn commit_edits<I, S>(&mut self, rendered: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replace_all(rendered)
    }

    /// Remember when the list was last refreshed from the network.
    pub fn record_refresh(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.prefs
            .set(LAST_REFRESH_KEY, &at)
            .context("Failed to persist last refresh time")
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.prefs.get(LAST_REFRESH_KEY)
    }

    /// Publish the new rows and write them under the preference key.
    fn commit(&mut self) -> Result<()> {
        let rows = self.sorted_rows();
        self.changes.send_replace(rows.clone());
        self.prefs
            .set_string_array(SCHEME_LIST_KEY, &rows)
            .context("Failed to persist scheme list")
    }
}

// ============================================================================
// Tests
// ============================================================================
