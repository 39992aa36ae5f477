//! Translation of a [`FacetFilterState`] into a [`QueryRequest`].
//!
//! The filter expression carries the facet constraints; the query vector
//! carries the sort intent. The index ranks results by proximity to the
//! vector, and only its third coordinate means anything: it is a price the
//! results should cluster around.
//!
//! | Sort mode    | Vector                       |
//! |--------------|------------------------------|
//! | `none`       | `[0, 0, average_price]`      |
//! | `price-asc`  | `[0, 0, 0]`                  |
//! | `price-desc` | `[0, 0, maximum_price]`      |
//!
//! An empty color or size selection becomes a clause no item satisfies
//! (`color = ""`): deselecting every option hides everything rather than
//! lifting the constraint.

use crate::config::CatalogConfig;
use crate::filter::{FilterExpressionBuilder, Operator};
use crate::types::{FacetFilterState, QueryRequest, SortMode, PRICE_BIAS_AXIS, VECTOR_DIMENSIONS};

pub const COLOR_FIELD: &str = "color";
pub const SIZE_FIELD: &str = "size";
pub const PRICE_FIELD: &str = "price";

/// Builds index requests for one catalog.
#[derive(Debug, Clone)]
pub struct QueryPlanner {
    catalog: CatalogConfig,
}

impl QueryPlanner {
    pub fn new(catalog: CatalogConfig) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CatalogConfig {
        &self.catalog
    }

    /// Full translation: filter expression, bias vector and paging.
    pub fn plan(&self, state: &FacetFilterState) -> QueryRequest {
        let filter = self.filter_for(state);
        let request = QueryRequest {
            top_k: self.catalog.top_k,
            vector: self.vector_for(state.sort_mode),
            include_metadata: true,
            filter: filter.build(),
        };
        tracing::debug!(
            sort = %state.sort_mode,
            colors = state.colors.len(),
            sizes = state.sizes.len(),
            filter = ?request.filter,
            "planned index query"
        );
        request
    }

    /// The populated builder for `state`, before rendering.
    pub fn filter_for(&self, state: &FacetFilterState) -> FilterExpressionBuilder {
        let mut filter = FilterExpressionBuilder::new();
        add_label_group(&mut filter, COLOR_FIELD, &state.colors);
        add_label_group(&mut filter, SIZE_FIELD, &state.sizes);

        let (low, high) = state.price_range.bounds();
        filter.add_raw(
            PRICE_FIELD,
            format!("{PRICE_FIELD} >= {low} AND {PRICE_FIELD} <= {high}"),
        );
        filter
    }

    /// Query vector encoding `sort` as a price bias.
    pub fn vector_for(&self, sort: SortMode) -> [f64; VECTOR_DIMENSIONS] {
        let mut vector = [0.0; VECTOR_DIMENSIONS];
        vector[PRICE_BIAS_AXIS] = match sort {
            SortMode::None => self.catalog.average_price,
            SortMode::PriceAscending => 0.0,
            SortMode::PriceDescending => self.catalog.maximum_price,
        };
        vector
    }
}

fn add_label_group(filter: &mut FilterExpressionBuilder, field: &str, labels: &[String]) {
    if labels.is_empty() {
        filter.add_raw(field, format!("{field} = \"\""));
        return;
    }
    for label in labels {
        filter.add(field, Operator::Eq, label);
    }
}
