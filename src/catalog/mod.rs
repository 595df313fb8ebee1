//! Pagination and filter controller.
//!
//! The controller owns the loaded items, the active filter and the page
//! cursor. Page fetches run as spawned tasks and post their completion back
//! over a channel; the owner drives [`CatalogController::next_event`] (or
//! [`CatalogController::settle`]) to apply them one at a time. Every fetch is
//! stamped with the generation that was active when it was issued, and a
//! completion from any other generation is dropped on arrival. Filter changes
//! are therefore atomic from the reader's side: `items()` never holds results
//! from two different filters.

pub mod sensor;
pub mod state;
pub mod view;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::Config;
use crate::enrich::EnrichmentCache;
use crate::error::{PortalError, Result};
use crate::query::FilterCriteria;
use crate::remote::CatalogGateway;
use crate::types::{CatalogItem, CatalogPage, ItemId};

pub use sensor::ScrollSensor;
pub use state::{Generation, LoadState, PageCursor};
pub use view::{CatalogRow, build_rows};

/// Controller tuning
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// A page shorter than this is the last one
    pub page_size: usize,
    /// Upper bound on any single page or enrichment fetch
    pub fetch_timeout: Duration,
    /// Maximum enrichment fetches in flight
    pub enrichment_concurrency: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            page_size: 20,
            fetch_timeout: Duration::from_secs(30),
            enrichment_concurrency: 8,
        }
    }
}

impl ControllerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_size: config.page_size,
            fetch_timeout: config.request_timeout(),
            enrichment_concurrency: config.enrichment_concurrency,
        }
    }
}

/// What applying one input to the controller did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    /// A page for the active generation was appended
    PageLoaded {
        generation: Generation,
        page: u32,
        appended: usize,
        exhausted: bool,
    },
    /// A page for the active generation failed; nothing was changed
    PageFailed {
        generation: Generation,
        page: u32,
        message: String,
        retryable: bool,
    },
    /// A page from a superseded generation arrived and was dropped
    StaleDiscarded { generation: Generation, page: u32 },
    /// The sensor reported the boundary visible
    SensorTriggered { issued: bool },
    /// Every sensor handle was dropped
    SensorDetached,
}

/// Completion posted by a page fetch task
struct PageCompletion {
    generation: Generation,
    page: u32,
    result: Result<CatalogPage>,
}

pub struct CatalogController<G> {
    gateway: Arc<G>,
    enrichment: EnrichmentCache<G>,
    options: ControllerOptions,

    criteria: FilterCriteria,
    generation: Generation,
    cursor: PageCursor,
    items: Vec<CatalogItem>,
    load_state: LoadState,

    /// Page fetches of any generation whose completion is not yet applied
    outstanding: usize,
    completions_tx: mpsc::UnboundedSender<PageCompletion>,
    completions_rx: mpsc::UnboundedReceiver<PageCompletion>,
    sensor_rx: Option<mpsc::UnboundedReceiver<bool>>,
}

impl<G: CatalogGateway + 'static> CatalogController<G> {
    pub fn new(gateway: G, options: ControllerOptions) -> Self {
        Self::with_shared(Arc::new(gateway), options)
    }

    /// Build a controller over a gateway the caller keeps a handle to.
    pub fn with_shared(gateway: Arc<G>, options: ControllerOptions) -> Self {
        let enrichment = EnrichmentCache::new(
            Arc::clone(&gateway),
            options.enrichment_concurrency,
            options.fetch_timeout,
        );
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Self {
            gateway,
            enrichment,
            options,
            criteria: FilterCriteria::default(),
            generation: Generation::default(),
            cursor: PageCursor::new(),
            items: Vec::new(),
            load_state: LoadState::Idle,
            outstanding: 0,
            completions_tx,
            completions_rx,
            sensor_rx: None,
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Replace the filter and start over from page 1.
    ///
    /// Clears the items synchronously, so readers see an empty list until
    /// the new first page lands. Fetches still in flight for the previous
    /// filter will be discarded when they complete. Must be called from
    /// within a tokio runtime.
    pub fn set_filter(&mut self, criteria: FilterCriteria) -> Generation {
        self.generation = self.generation.next();
        self.criteria = criteria;
        self.items.clear();
        self.cursor.reset();
        self.load_state = LoadState::Idle;

        tracing::info!("filter changed to {:?} ({})", self.criteria, self.generation);
        self.request_next_page();
        self.generation
    }

    /// Request the page under the cursor for the active filter.
    ///
    /// No-op (returns `false`) while a fetch for the active generation is in
    /// flight or once the server has run out of pages. After a failure this
    /// retries the same page. Must be called from within a tokio runtime.
    pub fn request_next_page(&mut self) -> bool {
        match self.load_state {
            LoadState::Loading { .. } | LoadState::Exhausted => return false,
            LoadState::Idle | LoadState::Failed { .. } => {}
        }

        let page = self.cursor.next_page();
        self.load_state = LoadState::Loading { page };
        self.outstanding += 1;
        self.spawn_page_fetch(page);
        true
    }

    /// Subscribe to a scroll sensor. Replaces any previous subscription.
    pub fn attach_sensor(&mut self) -> ScrollSensor {
        let (sensor, rx) = ScrollSensor::channel();
        self.sensor_rx = Some(rx);
        sensor
    }

    /// Unsubscribe from the scroll sensor.
    pub fn detach_sensor(&mut self) {
        self.sensor_rx = None;
    }

    /// Handle one boundary-visibility signal.
    pub fn on_boundary_visible(&mut self, visible: bool) -> bool {
        visible && self.request_next_page()
    }

    // ------------------------------------------------------------------
    // Event loop
    // ------------------------------------------------------------------

    /// Wait for the next page completion or sensor signal and apply it.
    ///
    /// Pends forever if nothing is in flight and no sensor is attached.
    pub async fn next_event(&mut self) -> CatalogEvent {
        loop {
            tokio::select! {
                Some(completion) = self.completions_rx.recv() => {
                    return self.apply(completion);
                }
                signal = recv_signal(&mut self.sensor_rx) => match signal {
                    Some(true) => {
                        let issued = self.request_next_page();
                        return CatalogEvent::SensorTriggered { issued };
                    }
                    Some(false) => continue,
                    None => {
                        self.sensor_rx = None;
                        return CatalogEvent::SensorDetached;
                    }
                },
            }
        }
    }

    /// Apply completions until no page fetch of any generation is in flight.
    pub async fn settle(&mut self) -> Vec<CatalogEvent> {
        let mut events = Vec::new();
        while self.outstanding > 0 {
            match self.completions_rx.recv().await {
                Some(completion) => events.push(self.apply(completion)),
                None => break,
            }
        }
        events
    }

    /// Wait for every enrichment the loaded items are waiting on.
    pub async fn await_enrichment(&self) {
        self.enrichment
            .wait_settled(self.items.iter().flat_map(|item| item.enrichment_urls()))
            .await;
    }

    /// Re-issue enrichment for loaded items whose lookup failed.
    pub async fn retry_failed_enrichment(&self) {
        self.enrichment
            .resolve(self.items.iter().flat_map(|item| item.enrichment_urls()))
            .await;
    }

    fn apply(&mut self, completion: PageCompletion) -> CatalogEvent {
        self.outstanding = self.outstanding.saturating_sub(1);
        let PageCompletion {
            generation,
            page,
            result,
        } = completion;

        if generation != self.generation {
            tracing::debug!(
                "discarding page {page} from {generation}, current is {}",
                self.generation
            );
            return CatalogEvent::StaleDiscarded { generation, page };
        }

        match result {
            Ok(catalog_page) => {
                let appended = catalog_page.results.len();
                let exhausted = appended < self.options.page_size || !catalog_page.has_next();
                let start = self.items.len();

                self.items.extend(catalog_page.results);
                self.cursor.advance();
                self.load_state = if exhausted {
                    LoadState::Exhausted
                } else {
                    LoadState::Idle
                };

                // Only the URLs this page introduced; the cache skips the rest
                self.enrichment.dispatch(
                    self.items[start..]
                        .iter()
                        .flat_map(|item| item.enrichment_urls()),
                );

                CatalogEvent::PageLoaded {
                    generation,
                    page,
                    appended,
                    exhausted,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to load page {page}: {e}");
                let message = e.to_string();
                let retryable = e.is_transient();
                self.load_state = LoadState::Failed {
                    page,
                    message: message.clone(),
                    retryable,
                };
                CatalogEvent::PageFailed {
                    generation,
                    page,
                    message,
                    retryable,
                }
            }
        }
    }

    fn spawn_page_fetch(&self, page: u32) {
        let gateway = Arc::clone(&self.gateway);
        let criteria = self.criteria.clone();
        let generation = self.generation;
        let fetch_timeout = self.options.fetch_timeout;
        let tx = self.completions_tx.clone();

        tokio::spawn(async move {
            let result =
                match tokio::time::timeout(fetch_timeout, gateway.fetch_page(page, &criteria))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(PortalError::Timeout(format!("catalog page {page}"))),
                };
            // The receiver lives as long as the controller
            let _ = tx.send(PageCompletion {
                generation,
                page,
                result,
            });
        });
    }

    // ------------------------------------------------------------------
    // Detail
    // ------------------------------------------------------------------

    /// Fetch one item by id and resolve its secondary references.
    pub async fn load_detail(&self, id: ItemId) -> Result<CatalogItem> {
        let item = tokio::time::timeout(self.options.fetch_timeout, self.gateway.fetch_item(id))
            .await
            .map_err(|_| PortalError::Timeout(format!("item {id}")))??;
        self.enrichment.resolve(item.enrichment_urls()).await;
        Ok(item)
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// Loaded items of the active generation, in server order
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Whether the server may hold more pages for the active filter
    pub fn has_more(&self) -> bool {
        !self.load_state.is_exhausted()
    }

    /// Page fetches of any generation still in flight
    pub fn outstanding_fetches(&self) -> usize {
        self.outstanding
    }

    pub fn enrichment(&self) -> &EnrichmentCache<G> {
        &self.enrichment
    }

    /// Refined, enriched rows for display
    pub fn rows(&self) -> Vec<CatalogRow<'_>> {
        build_rows(&self.items, &self.criteria, &self.enrichment)
    }
}

async fn recv_signal(rx: &mut Option<mpsc::UnboundedReceiver<bool>>) -> Option<bool> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
