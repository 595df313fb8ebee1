//! Remote catalog gateway.
//!
//! The catalog API is treated as a black box: a paginated, filterable list
//! endpoint plus plain GET endpoints for the secondary entities an item
//! links to.

pub mod http;

use crate::error::Result;
use crate::query::FilterCriteria;
use crate::types::{CatalogItem, CatalogPage, ItemId};

pub use http::HttpGateway;

/// Common interface for catalog sources
pub trait CatalogGateway: Send + Sync {
    /// Fetch one page of items matching the server-side filter
    fn fetch_page(
        &self,
        page: u32,
        criteria: &FilterCriteria,
    ) -> impl std::future::Future<Output = Result<CatalogPage>> + Send;

    /// Fetch a secondary entity by URL and extract its display name
    fn fetch_entity_name(&self, url: &str)
    -> impl std::future::Future<Output = Result<String>> + Send;

    /// Fetch a single item by identifier
    fn fetch_item(&self, id: ItemId)
    -> impl std::future::Future<Output = Result<CatalogItem>> + Send;
}
