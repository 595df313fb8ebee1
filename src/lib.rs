pub mod catalog;
pub mod commands;
pub mod config;
pub mod display;
pub mod enrich;
pub mod error;
pub mod query;
pub mod remote;
pub mod types;

pub use catalog::{
    CatalogController, CatalogEvent, CatalogRow, ControllerOptions, Generation, LoadState,
    PageCursor, ScrollSensor,
};
pub use config::Config;
pub use enrich::{Enrichment, EnrichmentCache, UNKNOWN_PLACEHOLDER};
pub use error::{PortalError, Result};
pub use query::{FilterCriteria, refine};
pub use remote::{CatalogGateway, HttpGateway};
pub use types::{CatalogItem, CatalogPage, EntityRef, Gender, ItemId, LifeStatus, PageInfo};
