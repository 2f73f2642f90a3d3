//! HTTP catalog source
//!
//! Performs the single GET that populates the viewer. There is no retry,
//! caching or pagination: a failure is terminal for the session.

use log::{debug, info};

use super::product::{parse_catalog, Product};
use crate::error::{Result, ViewerError};

/// Fetches the product list from a fixed endpoint
#[derive(Clone)]
pub struct CatalogSource {
    client: reqwest::Client,
    endpoint: String,
}

impl CatalogSource {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetches, validates and classifies the catalog.
    ///
    /// # Errors
    /// Transport failures, non-success statuses and every error of
    /// [`parse_catalog`].
    pub async fn fetch(&self) -> Result<Vec<Product>> {
        info!("Fetching product catalog from {}", self.endpoint);

        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ViewerError::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!("Catalog response: {} bytes", body.len());

        let products = parse_catalog(&body)?;
        info!("Received {} products", products.len());
        Ok(products)
    }
}
