//! Product records and catalog parsing

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::classifier::{classify, CategoryLabel};
use crate::error::{Result, ViewerError};

/// A product as delivered by the catalog API.
///
/// Only `name` and `glbUrl` are interpreted; every other field is kept
/// verbatim in [`Product::extra`]. The category is derived from the name
/// when the record is received and is not part of the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,

    #[serde(rename = "glbUrl", default, skip_serializing_if = "Option::is_none")]
    pub glb_url: Option<String>,

    #[serde(skip)]
    category: CategoryLabel,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Creates a classified product
    pub fn new(name: impl Into<String>, glb_url: Option<&str>) -> Self {
        let name = name.into();
        let category = classify(&name);
        Self {
            name,
            glb_url: glb_url.map(str::to_string),
            category,
            extra: Map::new(),
        }
    }

    pub fn category(&self) -> CategoryLabel {
        self.category
    }

    /// Returns the model URL, treating an empty string like a missing one
    pub fn model_url(&self) -> Option<&str> {
        self.glb_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    fn classified(mut self) -> Self {
        self.category = classify(&self.name);
        self
    }
}

/// Parses a catalog response body into classified products.
///
/// # Errors
/// - [`ViewerError::Parse`] if the body is not JSON or a record lacks `name`
/// - [`ViewerError::NotAnArray`] if the JSON root is not an array
/// - [`ViewerError::EmptyCatalog`] if the array is empty
pub fn parse_catalog(body: &[u8]) -> Result<Vec<Product>> {
    let root: Value = serde_json::from_slice(body)?;

    let Value::Array(records) = root else {
        return Err(ViewerError::NotAnArray);
    };

    if records.is_empty() {
        return Err(ViewerError::EmptyCatalog);
    }

    records
        .into_iter()
        .map(|record| {
            serde_json::from_value::<Product>(record)
                .map(Product::classified)
                .map_err(ViewerError::from)
        })
        .collect()
}
