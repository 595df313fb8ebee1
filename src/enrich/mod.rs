//! Enrichment cache for secondary entity names.
//!
//! Each URL maps to one slot holding its resolution state. A slot is created
//! in the `Pending` state by whichever caller first asks for the URL; that
//! caller spawns the only fetch. Every later caller subscribes to the slot
//! and waits for it to settle instead of fetching again. Resolved names are
//! kept for the whole session since the API never renames anything.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::join_all;
use tokio::sync::{Semaphore, watch};

use crate::remote::CatalogGateway;

/// Name shown for a field whose enrichment failed.
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";

/// Resolution state of one secondary URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    /// Never requested
    Unknown,
    /// A fetch is in flight
    Pending,
    Resolved(String),
    Failed,
}

impl Enrichment {
    /// Whether resolution has finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self, Enrichment::Resolved(_) | Enrichment::Failed)
    }

    /// Text to show for this field, or `None` while it is still loading.
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Enrichment::Resolved(name) => Some(name),
            Enrichment::Failed => Some(UNKNOWN_PLACEHOLDER),
            Enrichment::Unknown | Enrichment::Pending => None,
        }
    }
}

type Slot = Arc<watch::Sender<Enrichment>>;

/// Session-wide URL → name cache that fetches each URL at most once at a time.
pub struct EnrichmentCache<G> {
    gateway: Arc<G>,
    entries: Arc<DashMap<String, Slot>>,
    permits: Arc<Semaphore>,
    fetch_timeout: Duration,
}

impl<G> Clone for EnrichmentCache<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            entries: Arc::clone(&self.entries),
            permits: Arc::clone(&self.permits),
            fetch_timeout: self.fetch_timeout,
        }
    }
}

impl<G: CatalogGateway + 'static> EnrichmentCache<G> {
    /// `concurrency` bounds how many fetches run at once; it is clamped to 1.
    pub fn new(gateway: Arc<G>, concurrency: usize, fetch_timeout: Duration) -> Self {
        Self {
            gateway,
            entries: Arc::new(DashMap::new()),
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
            fetch_timeout,
        }
    }

    /// Current state of `url`, without triggering a fetch.
    pub fn lookup(&self, url: &str) -> Enrichment {
        self.entries
            .get(url)
            .map(|slot| slot.borrow().clone())
            .unwrap_or(Enrichment::Unknown)
    }

    /// Number of URLs the cache has ever been asked for.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Start resolving `urls` without waiting.
    ///
    /// Spawns one fetch per URL that is unknown or previously failed. URLs
    /// already pending are joined, resolved ones are skipped, blank ones are
    /// ignored. Returns a receiver per URL that still has to settle.
    pub fn dispatch<I, S>(&self, urls: I) -> Vec<watch::Receiver<Enrichment>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut waiters = Vec::new();
        let mut to_fetch = Vec::new();

        for url in urls {
            let url = url.as_ref().trim();
            if url.is_empty() || !seen.insert(url.to_string()) {
                continue;
            }

            match self.entries.entry(url.to_string()) {
                Entry::Occupied(slot) => {
                    let state = slot.get().borrow().clone();
                    match state {
                        Enrichment::Resolved(_) => {}
                        Enrichment::Pending => waiters.push(slot.get().subscribe()),
                        Enrichment::Failed | Enrichment::Unknown => {
                            slot.get().send_replace(Enrichment::Pending);
                            waiters.push(slot.get().subscribe());
                            to_fetch.push((url.to_string(), Arc::clone(slot.get())));
                        }
                    }
                }
                Entry::Vacant(slot) => {
                    let (tx, rx) = watch::channel(Enrichment::Pending);
                    let tx = Arc::new(tx);
                    slot.insert(Arc::clone(&tx));
                    waiters.push(rx);
                    to_fetch.push((url.to_string(), tx));
                }
            }
        }

        if !to_fetch.is_empty() {
            tracing::debug!("dispatching {} enrichment fetches", to_fetch.len());
        }
        for (url, slot) in to_fetch {
            self.spawn_fetch(url, slot);
        }

        waiters
    }

    /// Resolve `urls` and wait until every one of them has settled.
    ///
    /// Failures are recorded in the cache, never returned.
    pub async fn resolve<I, S>(&self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let waiters = self.dispatch(urls);
        join_all(waiters.into_iter().map(|mut rx| async move {
            // The sender lives in the map for the whole session
            let _ = rx.wait_for(Enrichment::is_settled).await;
        }))
        .await;
    }

    /// Wait for any of `urls` that are pending, without issuing fetches.
    pub async fn wait_settled<I, S>(&self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let waiters: Vec<_> = urls
            .into_iter()
            .filter_map(|url| {
                self.entries
                    .get(url.as_ref().trim())
                    .map(|slot| slot.subscribe())
            })
            .collect();
        join_all(waiters.into_iter().map(|mut rx| async move {
            let _ = rx.wait_for(|state| *state != Enrichment::Pending).await;
        }))
        .await;
    }

    fn spawn_fetch(&self, url: String, slot: Slot) {
        let gateway = Arc::clone(&self.gateway);
        let permits = Arc::clone(&self.permits);
        let fetch_timeout = self.fetch_timeout;

        tokio::spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                slot.send_replace(Enrichment::Failed);
                return;
            };

            let state =
                match tokio::time::timeout(fetch_timeout, gateway.fetch_entity_name(&url)).await {
                    Ok(Ok(name)) => Enrichment::Resolved(name),
                    Ok(Err(e)) => {
                        tracing::warn!("Failed to resolve {url}: {e}");
                        Enrichment::Failed
                    }
                    Err(_) => {
                        tracing::warn!("Timed out resolving {url}");
                        Enrichment::Failed
                    }
                };

            slot.send_replace(state);
        });
    }
}
