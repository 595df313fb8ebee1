//! Display rows: refined items joined with their enrichment state.

use crate::enrich::{Enrichment, EnrichmentCache};
use crate::query::{FilterCriteria, refine};
use crate::remote::CatalogGateway;
use crate::types::CatalogItem;

/// One item ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRow<'a> {
    pub item: &'a CatalogItem,
    pub location: Enrichment,
    pub first_seen: Enrichment,
}

impl CatalogRow<'_> {
    /// Last known location, or `None` while it is still resolving.
    ///
    /// Items without a location URL show the name the server inlined.
    pub fn location_name(&self) -> Option<&str> {
        if self.item.location.link().is_none() {
            return Some(self.item.location.name.as_str());
        }
        self.location.display_name()
    }

    /// Name of the first episode, or `None` while it is still resolving.
    pub fn first_seen_name(&self) -> Option<&str> {
        self.first_seen.display_name()
    }

    /// Whether any field is still waiting on the network.
    pub fn is_loading(&self) -> bool {
        self.location_name().is_none()
            || (self.item.first_seen_url().is_some() && self.first_seen_name().is_none())
    }
}

/// Refine `items` by `criteria` and attach the cached enrichment state.
pub fn build_rows<'a, G>(
    items: &'a [CatalogItem],
    criteria: &FilterCriteria,
    cache: &EnrichmentCache<G>,
) -> Vec<CatalogRow<'a>>
where
    G: CatalogGateway + 'static,
{
    refine(items, criteria)
        .into_iter()
        .map(|item| CatalogRow {
            item,
            location: item
                .location
                .link()
                .map(|url| cache.lookup(url))
                .unwrap_or(Enrichment::Unknown),
            first_seen: item
                .first_seen_url()
                .map(|url| cache.lookup(url))
                .unwrap_or(Enrichment::Unknown),
        })
        .collect()
}
