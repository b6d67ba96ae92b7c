//! Per-sweep statistics
//!
//! This module tracks what one sweep over a board section did: pages seen,
//! threads followed, and the outcome of every candidate image.

use crate::state::ImageState;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Counters for one sweep
#[derive(Debug, Clone)]
pub struct SweepStats {
    /// When the sweep started
    pub started_at: DateTime<Utc>,

    /// When the sweep finished, if it has
    pub finished_at: Option<DateTime<Utc>>,

    /// Index pages that yielded a document
    pub pages_fetched: u32,

    /// Index pages given up on
    pub pages_missing: u32,

    /// Reply threads that yielded a document
    pub threads_fetched: u32,

    /// Reply threads given up on
    pub threads_missing: u32,

    /// Count of image tasks by terminal state
    pub images_by_state: HashMap<ImageState, u32>,
}

impl SweepStats {
    /// Starts counting a new sweep
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_fetched: 0,
            pages_missing: 0,
            threads_fetched: 0,
            threads_missing: 0,
            images_by_state: HashMap::new(),
        }
    }

    /// Records whether an index page was fetched
    pub fn record_page(&mut self, fetched: bool) {
        if fetched {
            self.pages_fetched += 1;
        } else {
            self.pages_missing += 1;
        }
    }

    /// Records whether a reply thread was fetched
    pub fn record_thread(&mut self, fetched: bool) {
        if fetched {
            self.threads_fetched += 1;
        } else {
            self.threads_missing += 1;
        }
    }

    /// Records the outcome of one image task
    ///
    /// Only terminal states are counted.
    pub fn record_image(&mut self, state: ImageState) {
        if !state.is_terminal() {
            tracing::debug!("Ignoring image still {}", state);
            return;
        }
        *self.images_by_state.entry(state).or_insert(0) += 1;
    }

    /// Number of image tasks that ended in `state`
    pub fn images(&self, state: ImageState) -> u32 {
        self.images_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Total image links looked at
    pub fn images_seen(&self) -> u32 {
        self.images_by_state.values().sum()
    }

    /// Images downloaded during this sweep
    pub fn images_downloaded(&self) -> u32 {
        self.count_where(ImageState::is_success)
    }

    /// Images skipped because they were fetched before
    pub fn images_skipped(&self) -> u32 {
        self.count_where(ImageState::is_skipped)
    }

    /// Images that were attempted and not saved
    pub fn images_failed(&self) -> u32 {
        self.count_where(ImageState::is_error)
    }

    fn count_where(&self, class: fn(&ImageState) -> bool) -> u32 {
        self.images_by_state
            .iter()
            .filter(|(state, _)| class(*state))
            .map(|(_, count)| count)
            .sum()
    }

    /// Marks the sweep as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Duration of the sweep in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Logs a one-line summary of the sweep
    pub fn log_summary(&self, section: &str) {
        tracing::info!(
            "Sweep of /{}/ done in {}s: {} pages ({} missing), {} threads ({} missing), \
             {} images seen, {} fetched, {} skipped, {} failed ({} abandoned)",
            section,
            self.duration_seconds().unwrap_or(0),
            self.pages_fetched,
            self.pages_missing,
            self.threads_fetched,
            self.threads_missing,
            self.images_seen(),
            self.images_downloaded(),
            self.images_skipped(),
            self.images_failed(),
            self.images(ImageState::Abandoned),
        );
    }
}
