//! Test builders: ergonomic constructors for facet states and services.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use std::sync::Arc;

use shelf::SearchService;
use shelf_core::config::{CatalogConfig, Config};
use shelf_core::{FacetFilterState, PriceRange, SortMode};
use shelf_index::VectorIndex;

// ---------------------------------------------------------------------------
// FacetFilterStateBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`FacetFilterState`] fixtures. Starts from nothing
/// selected, price `0..=100`, no sort.
///
/// # Example
///
/// ```rust
/// let state = StateBuilder::new()
///     .colors(["blue", "green"])
///     .sizes(["M"])
///     .price(80.0, 20.0)
///     .sort(SortMode::PriceDescending)
///     .build();
/// ```
pub struct StateBuilder {
    colors: Vec<String>,
    sizes: Vec<String>,
    price: (f64, f64),
    sort: SortMode,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            colors: Vec::new(),
            sizes: Vec::new(),
            price: (0.0, 100.0),
            sort: SortMode::None,
        }
    }

    pub fn colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes = sizes.into_iter().map(Into::into).collect();
        self
    }

    pub fn price(mut self, low: f64, high: f64) -> Self {
        self.price = (low, high);
        self
    }

    pub fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn build(self) -> FacetFilterState {
        FacetFilterState::new(
            self.colors,
            self.sizes,
            PriceRange::new(self.price.0, self.price.1),
            self.sort,
        )
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// Catalog constants used across harnesses: mean 25, max 50, page size 12.
pub fn test_catalog() -> CatalogConfig {
    CatalogConfig {
        average_price: 25.0,
        maximum_price: 50.0,
        top_k: 12,
    }
}

/// Default configuration with [`test_catalog`] constants.
pub fn test_config() -> Config {
    let mut config = Config::defaults();
    config.catalog = test_catalog();
    config
}

/// A [`SearchService`] over `index` with [`test_config`].
pub fn service_over(index: impl VectorIndex + 'static) -> Arc<SearchService> {
    Arc::new(SearchService::new(&test_config(), Arc::new(index)))
}
