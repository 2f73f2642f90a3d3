//! # Product Catalog
//!
//! Product records as delivered by the catalog API, the category classifier
//! applied to them on receipt, and the HTTP source that fetches them.
//!
//! ## Key Components
//!
//! - [`Product`] - One API record, enriched with a derived [`CategoryLabel`]
//! - [`classify`] - Maps a product name to its category by marker substrings
//! - [`CatalogSource`] - Fetches and validates the product list
//!
//! ## Usage
//!
//! ```rust
//! use vitrine::catalog::{classify, CategoryLabel};
//!
//! assert_eq!(classify("Nike Bag"), CategoryLabel::Street);
//! assert_eq!(classify("Dior Sunglasses"), CategoryLabel::Fashion);
//! ```

pub mod classifier;
pub mod product;
pub mod source;

// Re-export main types
pub use classifier::{classify, CategoryLabel};
pub use product::{parse_catalog, Product};
pub use source::CatalogSource;
