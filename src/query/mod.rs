//! Client-side refinement of loaded catalog items.
//!
//! The server already filters by the same criteria, but it does not
//! normalize values: species arrive in several case and spacing variants and
//! some items carry no species at all. The filters here re-apply the
//! criteria locally with that normalization, as composable trait objects.

use unicase::UniCase;

use crate::types::{CatalogItem, Gender, LifeStatus};

pub mod criteria;

pub use criteria::FilterCriteria;

/// Synthetic species for items whose species is blank.
pub const UNKNOWN_SPECIES: &str = "unknown";

/// Trait for item filters
pub trait ItemFilter: Send + Sync {
    fn matches(&self, item: &CatalogItem) -> bool;
}

/// Case-insensitive substring match on the item name
pub struct NameFilter {
    needle: String,
}

impl NameFilter {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.trim().to_lowercase(),
        }
    }
}

impl ItemFilter for NameFilter {
    fn matches(&self, item: &CatalogItem) -> bool {
        item.name.to_lowercase().contains(&self.needle)
    }
}

/// Filter items by life status
pub struct StatusFilter {
    target_status: LifeStatus,
}

impl StatusFilter {
    pub fn new(status: LifeStatus) -> Self {
        Self {
            target_status: status,
        }
    }
}

impl ItemFilter for StatusFilter {
    fn matches(&self, item: &CatalogItem) -> bool {
        item.status == self.target_status
    }
}

/// Filter items by species, ignoring case and whitespace
pub struct SpeciesFilter {
    target_species: String,
}

impl SpeciesFilter {
    pub fn new(species: &str) -> Self {
        Self {
            target_species: normalize_species(species),
        }
    }
}

impl ItemFilter for SpeciesFilter {
    fn matches(&self, item: &CatalogItem) -> bool {
        let species = normalize_species(&item.species);
        UniCase::new(species.as_str()) == UniCase::new(self.target_species.as_str())
    }
}

/// Filter items by gender
pub struct GenderFilter {
    target_gender: Gender,
}

impl GenderFilter {
    pub fn new(gender: Gender) -> Self {
        Self {
            target_gender: gender,
        }
    }
}

impl ItemFilter for GenderFilter {
    fn matches(&self, item: &CatalogItem) -> bool {
        item.gender == self.target_gender
    }
}

/// Strip all whitespace; a blank species becomes [`UNKNOWN_SPECIES`].
pub fn normalize_species(species: &str) -> String {
    let compact: String = species.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        UNKNOWN_SPECIES.to_string()
    } else {
        compact
    }
}

/// Build the filter chain for the given criteria.
pub fn build_filters(criteria: &FilterCriteria) -> Vec<Box<dyn ItemFilter>> {
    let mut filters: Vec<Box<dyn ItemFilter>> = Vec::new();
    if let Some(name) = criteria.name_query() {
        filters.push(Box::new(NameFilter::new(name)));
    }
    if let Some(status) = criteria.status {
        filters.push(Box::new(StatusFilter::new(status)));
    }
    if let Some(species) = criteria.species_query() {
        filters.push(Box::new(SpeciesFilter::new(species)));
    }
    if let Some(gender) = criteria.gender {
        filters.push(Box::new(GenderFilter::new(gender)));
    }
    filters
}

/// Derive the displayed subset of `items`.
///
/// Pure: the output is `items` in their original order minus those rejected
/// by any filter built from `criteria`.
pub fn refine<'a>(items: &'a [CatalogItem], criteria: &FilterCriteria) -> Vec<&'a CatalogItem> {
    let filters = build_filters(criteria);
    items
        .iter()
        .filter(|item| filters.iter().all(|f| f.matches(item)))
        .collect()
}
