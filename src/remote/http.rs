//! HTTP gateway for the public catalog API.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{PortalError, Result};
use crate::query::FilterCriteria;
use crate::types::{CatalogItem, CatalogPage, ItemId, NamedEntity};

use super::CatalogGateway;

/// Catalog gateway backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    /// API root, always ending in `/` so relative joins append
    base_url: Url,
}

impl HttpGateway {
    /// Create a gateway from configuration
    ///
    /// Applies the configured request and connect timeouts to every call.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("portal/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base(&config.api_url)?,
        })
    }

    /// Create a gateway for the given API root with default timeouts
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("portal/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base(base_url)?,
        })
    }

    /// URL of one catalog page. Unconstrained filters are left out.
    pub fn page_url(&self, page: u32, criteria: &FilterCriteria) -> Result<Url> {
        let mut url = self.base_url.join("character/")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.to_string());
            for (key, value) in criteria.query_pairs() {
                query.append_pair(key, &value);
            }
        }
        Ok(url)
    }

    /// URL of a single item.
    pub fn item_url(&self, id: ItemId) -> Result<Url> {
        Ok(self.base_url.join(&format!("character/{id}"))?)
    }

    /// GET a URL and decode its JSON body.
    ///
    /// Non-2xx replies become [`PortalError::Status`]; bodies that fail to
    /// decode become [`PortalError::Malformed`].
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                PortalError::Timeout(url.to_string())
            } else {
                PortalError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| PortalError::Malformed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

impl CatalogGateway for HttpGateway {
    async fn fetch_page(&self, page: u32, criteria: &FilterCriteria) -> Result<CatalogPage> {
        let url = self.page_url(page, criteria)?;
        match self.get_json::<CatalogPage>(url.as_str()).await {
            // The API answers a filter with no matches with a 404
            Err(PortalError::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
                tracing::debug!("no results for {url}");
                Ok(CatalogPage::empty())
            }
            other => other,
        }
    }

    async fn fetch_entity_name(&self, url: &str) -> Result<String> {
        let entity: NamedEntity = self.get_json(url).await?;
        Ok(entity.name)
    }

    async fn fetch_item(&self, id: ItemId) -> Result<CatalogItem> {
        let url = self.item_url(id)?;
        match self.get_json::<CatalogItem>(url.as_str()).await {
            Err(PortalError::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
                Err(PortalError::ItemNotFound(id))
            }
            other => other,
        }
    }
}

/// Parse the API root and make sure it ends with a slash.
fn normalize_base(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(PortalError::Config(format!(
            "API URL must be http or https, got '{raw}'"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
