//! Category filter selected in the UI

use std::fmt;

use crate::catalog::{CategoryLabel, Product};

/// The filter applied to the catalog. Defaults to [`FilterState::All`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterState {
    #[default]
    All,
    Street,
    Fashion,
}

impl FilterState {
    /// All selectable filters, in the order the selector lists them
    pub const ALL: [FilterState; 3] = [FilterState::All, FilterState::Street, FilterState::Fashion];

    /// Whether a product passes this filter.
    ///
    /// Category filters use exact equality on the already-derived category.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            FilterState::All => true,
            FilterState::Street => product.category() == CategoryLabel::Street,
            FilterState::Fashion => product.category() == CategoryLabel::Fashion,
        }
    }

    /// Human-readable label for the selector
    pub fn label(&self) -> &'static str {
        match self {
            FilterState::All => "All",
            FilterState::Street => "Street",
            FilterState::Fashion => "Fashion",
        }
    }

    /// Position in [`FilterState::ALL`]
    pub fn position(&self) -> usize {
        match self {
            FilterState::All => 0,
            FilterState::Street => 1,
            FilterState::Fashion => 2,
        }
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_matches_everything() {
        for name in ["Nike Air", "Dior Bag", "Plain Shirt", ""] {
            assert!(FilterState::All.matches(&Product::new(name, None)));
        }
    }

    #[test]
    fn test_category_filters_are_exact() {
        let street = Product::new("Nike Bag", None);
        let fashion = Product::new("Dior Bag", None);
        let other = Product::new("Plain Shirt", None);

        assert!(FilterState::Street.matches(&street));
        assert!(!FilterState::Fashion.matches(&street));
        assert!(FilterState::Fashion.matches(&fashion));
        assert!(!FilterState::Street.matches(&other));
        assert!(!FilterState::Fashion.matches(&other));
    }

    #[test]
    fn test_positions_follow_selector_order() {
        for (i, filter) in FilterState::ALL.iter().enumerate() {
            assert_eq!(filter.position(), i);
        }
        assert_eq!(FilterState::default(), FilterState::All);
    }
}
