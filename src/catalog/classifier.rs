//! Category classification by product name
//!
//! Names are matched against two ordered marker lists. Street markers are
//! always tested before fashion markers, so a name carrying both kinds of
//! marker is classified as street.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Markers that classify a product as [`CategoryLabel::Street`]
pub const STREET_MARKERS: [&str; 3] = ["Jacket", "Fila", "Nike"];

/// Markers that classify a product as [`CategoryLabel::Fashion`]
pub const FASHION_MARKERS: [&str; 3] = ["Balenciaga", "Bag", "Dior"];

/// Category derived from a product name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryLabel {
    Street,
    Fashion,
    #[default]
    Other,
}

impl CategoryLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryLabel::Street => "street",
            CategoryLabel::Fashion => "fashion",
            CategoryLabel::Other => "other",
        }
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a product name into a category.
///
/// Matching is case-insensitive substring containment, so "Bag" also matches
/// "Cabbage". Never fails: empty or markerless names yield
/// [`CategoryLabel::Other`].
pub fn classify(name: &str) -> CategoryLabel {
    let lowered = name.to_lowercase();

    if contains_any(&lowered, &STREET_MARKERS) {
        CategoryLabel::Street
    } else if contains_any(&lowered, &FASHION_MARKERS) {
        CategoryLabel::Fashion
    } else {
        CategoryLabel::Other
    }
}

fn contains_any(lowered_name: &str, markers: &[&str]) -> bool {
    markers
        .iter()
        .any(|marker| lowered_name.contains(&marker.to_lowercase()))
}
