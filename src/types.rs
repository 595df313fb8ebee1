use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PortalError;

/// Server-assigned identifier of a catalog item.
pub type ItemId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LifeStatus {
    #[serde(rename = "Alive", alias = "alive")]
    Alive,
    #[serde(rename = "Dead", alias = "dead")]
    Dead,
    #[default]
    #[serde(rename = "unknown", alias = "Unknown")]
    Unknown,
}

impl LifeStatus {
    /// Value sent in the `status` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            LifeStatus::Alive => "alive",
            LifeStatus::Dead => "dead",
            LifeStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LifeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifeStatus::Alive => write!(f, "Alive"),
            LifeStatus::Dead => write!(f, "Dead"),
            LifeStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

impl FromStr for LifeStatus {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alive" => Ok(LifeStatus::Alive),
            "dead" => Ok(LifeStatus::Dead),
            "unknown" => Ok(LifeStatus::Unknown),
            _ => Err(PortalError::InvalidStatus(s.to_string())),
        }
    }
}

pub const VALID_STATUSES: &[&str] = &["alive", "dead", "unknown"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Gender {
    #[serde(rename = "Female", alias = "female")]
    Female,
    #[serde(rename = "Male", alias = "male")]
    Male,
    #[serde(rename = "Genderless", alias = "genderless")]
    Genderless,
    #[default]
    #[serde(rename = "unknown", alias = "Unknown")]
    Unknown,
}

impl Gender {
    /// Value sent in the `gender` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Genderless => "genderless",
            Gender::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Female => write!(f, "Female"),
            Gender::Male => write!(f, "Male"),
            Gender::Genderless => write!(f, "Genderless"),
            Gender::Unknown => write!(f, "Unknown"),
        }
    }
}

impl FromStr for Gender {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "female" => Ok(Gender::Female),
            "male" => Ok(Gender::Male),
            "genderless" => Ok(Gender::Genderless),
            "unknown" => Ok(Gender::Unknown),
            _ => Err(PortalError::InvalidGender(s.to_string())),
        }
    }
}

pub const VALID_GENDERS: &[&str] = &["female", "male", "genderless", "unknown"];

/// Reference to a secondary entity: a URL to resolve plus the name the
/// server inlined alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl EntityRef {
    /// The URL to resolve, if the server provided one.
    ///
    /// The API sends `""` for locations it has no record of.
    pub fn link(&self) -> Option<&str> {
        let url = self.url.trim();
        if url.is_empty() { None } else { Some(url) }
    }
}

/// One entity returned by the paginated list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub status: LifeStatus,
    #[serde(default)]
    pub species: String,
    #[serde(default, rename = "type")]
    pub subtype: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub origin: EntityRef,
    #[serde(default)]
    pub location: EntityRef,
    #[serde(default)]
    pub image: String,
    /// Episode URLs in broadcast order
    #[serde(default, rename = "episode")]
    pub episodes: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created: String,
}

impl CatalogItem {
    /// URL of the episode the item first appeared in.
    pub fn first_seen_url(&self) -> Option<&str> {
        self.episodes
            .first()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Every secondary URL this item needs resolved before display.
    pub fn enrichment_urls(&self) -> impl Iterator<Item = &str> {
        self.location.link().into_iter().chain(self.first_seen_url())
    }
}

/// Pagination metadata returned with every catalog page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub pages: u32,
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// One page of the catalog query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub info: PageInfo,
    pub results: Vec<CatalogItem>,
}

impl CatalogPage {
    /// The reply the API gives when a filter matches nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the server says another page follows this one.
    pub fn has_next(&self) -> bool {
        self.info.next.is_some()
    }
}

/// A secondary entity; only the name is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedEntity {
    pub name: String,
}
