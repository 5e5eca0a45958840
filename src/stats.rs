//! Cycle reporting counters
//!
//! Process-wide accumulators for download attempts and saved files. They
//! exist only for end-of-cycle reporting, not for correctness, and are an
//! explicitly constructed component rather than module-level globals.

use tokio::sync::Mutex;

/// Snapshot of counter values at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    /// Download attempts handed to workers
    pub downloads: u64,
    /// Files actually written to the content store
    pub saved_files: u64,
}

#[derive(Debug, Default)]
struct Totals {
    downloads: u64,
    saved_files: u64,
}

/// Mutex-guarded download/saved-file counters
#[derive(Debug, Default)]
pub struct Counters {
    totals: Mutex<Totals>,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one download attempt
    pub async fn record_download(&self) {
        self.totals.lock().await.downloads += 1;
    }

    /// Records one saved file
    pub async fn record_saved(&self) {
        self.totals.lock().await.saved_files += 1;
    }

    /// Reads the current totals
    pub async fn snapshot(&self) -> CounterSnapshot {
        let totals = self.totals.lock().await;
        CounterSnapshot {
            downloads: totals.downloads,
            saved_files: totals.saved_files,
        }
    }

    /// Resets both counters to zero
    pub async fn reset(&self) {
        let mut totals = self.totals.lock().await;
        totals.downloads = 0;
        totals.saved_files = 0;
    }
}
