//! Filter criteria shared by the server query and the local refiner.

use serde::{Deserialize, Serialize};

use crate::types::{Gender, LifeStatus};

/// The active filter. Each dimension is either unconstrained (`None`) or
/// pinned to a single value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LifeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl FilterCriteria {
    /// Criteria matching everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text name query, trimmed. Blank text clears the
    /// constraint.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = trimmed(name.into());
        self
    }

    pub fn with_status(mut self, status: LifeStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the species, trimmed. Blank text clears the constraint.
    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = trimmed(species.into());
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Whether no dimension is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.name_query().is_none()
            && self.status.is_none()
            && self.species_query().is_none()
            && self.gender.is_none()
    }

    /// The name query, if it has any non-whitespace content.
    pub fn name_query(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// The species constraint, if it has any non-whitespace content.
    pub fn species_query(&self) -> Option<&str> {
        self.species.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Query-string pairs for the server-side filter.
    ///
    /// Unconstrained dimensions are omitted entirely rather than sent empty.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = self.name_query() {
            pairs.push(("name", name.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_param().to_string()));
        }
        if let Some(species) = self.species_query() {
            pairs.push(("species", species.to_string()));
        }
        if let Some(gender) = self.gender {
            pairs.push(("gender", gender.as_param().to_string()));
        }
        pairs
    }
}

fn trimmed(text: String) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
