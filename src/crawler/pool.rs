//! Download worker pool
//!
//! A fixed set of long-lived workers drains a bounded queue of
//! (url, story id) work items. Submission blocks when the queue is full,
//! which is the backpressure between the cycle driver's enumeration phase
//! and the workers. Shutdown is drain-then-stop: dropping the sender lets
//! every queued item finish, then workers exit on channel close.
//!
//! Workers fetch with the plain single-attempt fetcher. A failed fetch
//! completes its work item anyway; the link stays in the ledger and is
//! retried implicitly next cycle because the content store still lacks its
//! key.

use crate::crawler::fetcher::fetch_text;
use crate::stats::Counters;
use crate::storage::ContentStore;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// One unit of download work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// URL to download
    pub url: String,
    /// Story whose ledger referenced the URL; selects the storage namespace
    pub story_id: String,
}

/// Bounded worker pool writing fetched bodies into the content store
pub struct DownloadPool {
    tx: mpsc::Sender<WorkItem>,
    handles: Vec<JoinHandle<()>>,
}

impl DownloadPool {
    /// Spawns `workers` tasks draining a queue of `queue_depth` capacity
    pub fn spawn(
        workers: usize,
        queue_depth: usize,
        client: Client,
        store: Arc<ContentStore>,
        counters: Arc<Counters>,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<WorkItem>(queue_depth);
        let rx = Arc::new(Mutex::new(rx));

        let handles = (0..workers)
            .map(|n| {
                let rx = rx.clone();
                let client = client.clone();
                let store = store.clone();
                let counters = counters.clone();
                tokio::spawn(async move {
                    run_worker(n, rx, client, store, counters).await;
                })
            })
            .collect();

        Self { tx, handles }
    }

    /// Enqueues a work item, waiting while the queue is full
    ///
    /// Returns false if the pool has already shut down.
    pub async fn submit(&self, item: WorkItem) -> bool {
        self.tx.send(item).await.is_ok()
    }

    /// Waits for the queue to drain, then stops the workers
    ///
    /// Dropping the sender closes the channel once the last queued item has
    /// been received, so in-flight fetches finish naturally.
    pub async fn drain(self) {
        drop(self.tx);
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!("Download worker panicked: {}", e);
            }
        }
    }
}

/// Worker loop: dequeue, fetch, store
async fn run_worker(
    n: usize,
    rx: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
    client: Client,
    store: Arc<ContentStore>,
    counters: Arc<Counters>,
) {
    tracing::debug!("Worker {} started", n);
    loop {
        // Lock only to dequeue; fetching happens with the lock released
        let item = { rx.lock().await.recv().await };
        let Some(item) = item else {
            break;
        };

        counters.record_download().await;

        let body = fetch_text(&client, &item.url).await;
        if body.is_empty() {
            tracing::warn!(
                "Worker {}: no content from {}, leaving for next cycle",
                n,
                item.url
            );
            continue;
        }

        match store.save(&item.story_id, &item.url, &body).await {
            Ok(_) => counters.record_saved().await,
            Err(e) => tracing::error!("Worker {}: failed to store {}: {}", n, item.url, e),
        }
    }
    tracing::debug!("Worker {} stopped", n);
}
