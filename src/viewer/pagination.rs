//! Filtered, wrap-around pagination over the product list

use super::filter::FilterState;
use crate::catalog::Product;

/// Owns the active filter, the source list, the filtered view and the
/// current position in it.
///
/// The filtered view is stored as indices into the source list, so it is
/// always a stable-order subsequence. Every mutating operation recomputes
/// the view and the index together; `index` is `Some` exactly when the
/// filtered view is non-empty.
#[derive(Debug, Default, Clone)]
pub struct PaginationController {
    filter: FilterState,
    source: Vec<Product>,
    filtered: Vec<usize>,
    index: Option<usize>,
}

impl PaginationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the source list and resets to the first match
    pub fn set_source_list(&mut self, products: Vec<Product>) {
        self.source = products;
        self.refilter();
    }

    /// Applies a new filter and resets to the first match
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.refilter();
    }

    /// Advances with wrap-around. No-op on an empty view.
    pub fn next(&mut self) {
        let count = self.filtered.len();
        if let Some(index) = self.index.as_mut() {
            *index = (*index + 1) % count;
        }
    }

    /// Steps back with wrap-around. No-op on an empty view.
    pub fn previous(&mut self) {
        let count = self.filtered.len();
        if let Some(index) = self.index.as_mut() {
            *index = (*index + count - 1) % count;
        }
    }

    /// The product at the current index, or `None` if nothing matches
    pub fn current(&self) -> Option<&Product> {
        self.index
            .and_then(|i| self.filtered.get(i))
            .map(|&source_index| &self.source[source_index])
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// 1-based `(position, count)` for the product counter
    pub fn position(&self) -> Option<(usize, usize)> {
        self.index.map(|i| (i + 1, self.filtered.len()))
    }

    pub fn filter(&self) -> FilterState {
        self.filter
    }

    /// Number of products in the filtered view
    pub fn len(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    /// Iterates the filtered view in source order
    pub fn filtered(&self) -> impl Iterator<Item = &Product> + '_ {
        self.filtered.iter().map(move |&i| &self.source[i])
    }

    fn refilter(&mut self) {
        self.filtered = self
            .source
            .iter()
            .enumerate()
            .filter(|(_, product)| self.filter.matches(product))
            .map(|(i, _)| i)
            .collect();

        self.index = if self.filtered.is_empty() { None } else { Some(0) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CategoryLabel;
    use rand::Rng;

    fn sample_products() -> Vec<Product> {
        vec![
            Product::new("Nike Air", Some("a.glb")),
            Product::new("Dior Bag", Some("b.glb")),
            Product::new("Plain Shirt", None),
            Product::new("Fila Jacket", Some("c.glb")),
            Product::new("Balenciaga Runner", Some("d.glb")),
        ]
    }

    fn names(controller: &PaginationController) -> Vec<&str> {
        controller.filtered().map(|p| p.name.as_str()).collect()
    }

    fn random_products(rng: &mut impl Rng, len: usize) -> Vec<Product> {
        const NAMES: [&str; 6] = [
            "Nike Air",
            "Dior Bag",
            "Plain Shirt",
            "Fila Jacket",
            "Balenciaga Runner",
            "Generic Tee",
        ];
        (0..len)
            .map(|_| Product::new(NAMES[rng.random_range(0..NAMES.len())], None))
            .collect()
    }

    #[test]
    fn test_fresh_controller_is_empty() {
        let controller = PaginationController::new();
        assert_eq!(controller.index(), None);
        assert!(controller.current().is_none());
        assert_eq!(controller.filter(), FilterState::All);
    }

    #[test]
    fn test_set_source_list_resets_index() {
        let mut controller = PaginationController::new();
        controller.set_source_list(sample_products());
        controller.next();
        controller.next();
        assert_eq!(controller.index(), Some(2));

        controller.set_source_list(sample_products());
        assert_eq!(controller.index(), Some(0));
        assert_eq!(controller.current().unwrap().name, "Nike Air");
    }

    #[test]
    fn test_filter_street_scenario() {
        let mut controller = PaginationController::new();
        controller.set_source_list(vec![
            Product::new("Nike Air", Some("a.glb")),
            Product::new("Dior Bag", Some("b.glb")),
            Product::new("Plain Shirt", None),
        ]);
        controller.next();

        controller.set_filter(FilterState::Street);

        assert_eq!(names(&controller), vec!["Nike Air"]);
        assert_eq!(controller.index(), Some(0));
        assert_eq!(controller.current().unwrap().name, "Nike Air");
    }

    #[test]
    fn test_filter_preserves_source_order() {
        let mut controller = PaginationController::new();
        controller.set_source_list(sample_products());

        controller.set_filter(FilterState::Street);
        assert_eq!(names(&controller), vec!["Nike Air", "Fila Jacket"]);

        controller.set_filter(FilterState::Fashion);
        assert_eq!(names(&controller), vec!["Dior Bag", "Balenciaga Runner"]);

        controller.set_filter(FilterState::All);
        assert_eq!(controller.len(), 5);
    }

    #[test]
    fn test_wraparound() {
        let mut controller = PaginationController::new();
        controller.set_source_list(sample_products());

        controller.previous();
        assert_eq!(controller.index(), Some(4));
        assert_eq!(controller.position(), Some((5, 5)));

        controller.next();
        assert_eq!(controller.index(), Some(0));
    }

    #[test]
    fn test_empty_filter_is_safe() {
        let mut controller = PaginationController::new();
        controller.set_source_list(vec![Product::new("Plain Shirt", None)]);
        controller.set_filter(FilterState::Fashion);

        assert!(controller.is_empty());
        controller.next();
        controller.previous();
        assert_eq!(controller.index(), None);
        assert!(controller.current().is_none());
        assert_eq!(controller.position(), None);

        controller.set_filter(FilterState::All);
        assert_eq!(controller.index(), Some(0));
    }

    #[test]
    fn test_random_lists_filter_exactly() {
        let mut rng = rand::rng();

        for _ in 0..50 {
            let len = rng.random_range(0..20);
            let products = random_products(&mut rng, len);
            let mut controller = PaginationController::new();
            controller.set_source_list(products.clone());

            for filter in FilterState::ALL {
                controller.set_filter(filter);
                let expected: Vec<&Product> =
                    products.iter().filter(|p| filter.matches(p)).collect();
                let actual: Vec<&Product> = controller.filtered().collect();

                assert_eq!(actual, expected);
                assert_eq!(controller.index().is_none(), expected.is_empty());
                if let Some(current) = controller.current() {
                    assert_eq!(current, expected[0]);
                }
                if filter != FilterState::All {
                    assert!(actual.iter().all(|p| p.category() != CategoryLabel::Other));
                }
            }
        }
    }

    #[test]
    fn test_random_next_cycles_and_previous_inverts() {
        let mut rng = rand::rng();

        for _ in 0..50 {
            let len = rng.random_range(1..15);
            let mut controller = PaginationController::new();
            controller.set_source_list(random_products(&mut rng, len));

            for _ in 0..rng.random_range(0..len) {
                controller.next();
            }
            let start = controller.index();

            for _ in 0..controller.len() {
                controller.next();
            }
            assert_eq!(controller.index(), start);

            controller.next();
            controller.previous();
            assert_eq!(controller.index(), start);

            controller.previous();
            controller.next();
            assert_eq!(controller.index(), start);
        }
    }
}
