//! Cycle driver - periodic crawl orchestration
//!
//! One cycle is: build the frontier from the live front page, register
//! every story's new links concurrently, enumerate the ledger links not yet
//! in the content store across all stories, feed them through the download
//! pool, and drain. `run_forever` repeats that on a fixed period with no
//! terminal state besides external interruption.

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::frontier::build_frontier;
use crate::crawler::pool::{DownloadPool, WorkItem};
use crate::crawler::registrar::register_story;
use crate::stats::Counters;
use crate::storage::{ContentStore, Ledger};
use crate::MagpieError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Outcome of one completed cycle
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleReport {
    /// Stories on the frontier this cycle
    pub stories: usize,
    /// Stories whose registration failed with an error
    pub failed_registrations: usize,
    /// New links appended across all ledgers
    pub new_links: usize,
    /// Download attempts handed to the pool
    pub downloads: u64,
    /// Files written to the content store
    pub saved_files: u64,
}

/// Long-lived pieces shared by every cycle
pub struct Driver {
    config: Config,
    client: Client,
    store: Arc<ContentStore>,
    permits: Arc<Semaphore>,
    counters: Arc<Counters>,
    root: Url,
}

impl Driver {
    /// Builds the driver from configuration
    pub fn new(config: Config) -> Result<Self, MagpieError> {
        let client = build_http_client(config.crawler.request_timeout_secs)?;
        let store = Arc::new(ContentStore::new(&config.output.downloads_dir));
        let permits = Arc::new(Semaphore::new(config.crawler.max_discussion_fetches));
        let counters = Arc::new(Counters::new());
        let root = Url::parse(&config.crawler.root_url)?;

        Ok(Self {
            config,
            client,
            store,
            permits,
            counters,
            root,
        })
    }

    /// Runs crawl cycles forever, sleeping the configured period between
    pub async fn run_forever(&self) -> Result<(), MagpieError> {
        let period = Duration::from_secs(self.config.crawler.cycle_period_secs);

        loop {
            match self.run_cycle().await {
                Ok(report) => tracing::info!(
                    "Cycle done: {} stories ({} failed), {} new links, {}/{} downloads saved",
                    report.stories,
                    report.failed_registrations,
                    report.new_links,
                    report.saved_files,
                    report.downloads,
                ),
                // A dead frontier skips the cycle; the next period retries
                Err(e) => tracing::error!("Cycle aborted: {}", e),
            }

            tracing::debug!("Sleeping {:?} until next cycle", period);
            tokio::time::sleep(period).await;
        }
    }

    /// Runs one full crawl cycle
    pub async fn run_cycle(&self) -> Result<CycleReport, MagpieError> {
        let started = std::time::Instant::now();
        self.store.ensure_root().await?;
        self.counters.reset().await;

        // Phase 1: frontier. An empty story list means the front page was
        // unreachable or unparsable, which aborts the whole cycle.
        tracing::info!("Fetching front page {}", self.root);
        let stories = build_frontier(&self.client, &self.root).await;
        if stories.is_empty() {
            return Err(MagpieError::Frontier(format!(
                "no stories parsed from {}",
                self.root
            )));
        }

        // Phase 2: registration fan-out, one independent task per story.
        // Failures are collected and logged, never propagated.
        let mut registrations: JoinSet<Result<usize, MagpieError>> = JoinSet::new();
        for story in &stories {
            let client = self.client.clone();
            let permits = self.permits.clone();
            let store = self.store.clone();
            let story = story.clone();
            let retries = self.config.crawler.max_retries;
            registrations.spawn(async move {
                register_story(&client, &permits, &store, &story, retries).await
            });
        }

        let mut new_links = 0;
        let mut failed_registrations = 0;
        while let Some(joined) = registrations.join_next().await {
            match joined {
                Ok(Ok(appended)) => new_links += appended,
                Ok(Err(e)) => {
                    failed_registrations += 1;
                    tracing::error!("Registration failed: {}", e);
                }
                Err(e) => {
                    failed_registrations += 1;
                    tracing::error!("Registration task panicked: {}", e);
                }
            }
        }

        // Phase 3: downloads. Every stored story directory is considered,
        // not just this cycle's frontier, so links registered earlier keep
        // being retried until their content lands.
        let pool = DownloadPool::spawn(
            self.config.crawler.max_workers,
            self.config.crawler.queue_depth,
            self.client.clone(),
            self.store.clone(),
            self.counters.clone(),
        );

        for story_id in self.store.story_ids().await? {
            let ledger = Ledger::new(&self.store.story_dir(&story_id));
            let links = match ledger.read().await {
                Ok(links) => links,
                Err(e) => {
                    tracing::warn!("Unreadable ledger for story {}: {}", story_id, e);
                    continue;
                }
            };

            // The first ledger line is the discussion URL, not a download
            // target
            let candidates: Vec<String> = links.into_iter().skip(1).collect();
            for url in self.store.missing(&story_id, &candidates).await {
                if !pool
                    .submit(WorkItem {
                        url,
                        story_id: story_id.clone(),
                    })
                    .await
                {
                    tracing::error!("Download pool closed early");
                    break;
                }
            }
        }

        pool.drain().await;

        let snapshot = self.counters.snapshot().await;
        tracing::info!("Cycle took {:?}", started.elapsed());

        Ok(CycleReport {
            stories: stories.len(),
            failed_registrations,
            new_links,
            downloads: snapshot.downloads,
            saved_files: snapshot.saved_files,
        })
    }
}
