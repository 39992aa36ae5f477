//! Search service: validate, translate, query.
//!
//! The one path every caller goes through: the HTTP transport hands it raw
//! JSON bodies, [`SearchSession`](crate::session::SearchSession) hands it
//! already-built facet states.

use std::sync::Arc;

use serde_json::Value;
use shelf_core::config::Config;
use shelf_core::validate::FilterValidator;
use shelf_core::{FacetFilterState, QueryMatch, QueryPlanner, QueryRequest, Result};
use shelf_index::VectorIndex;

pub struct SearchService {
    validator: FilterValidator,
    planner: QueryPlanner,
    index: Arc<dyn VectorIndex>,
}

impl SearchService {
    pub fn new(config: &Config, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            validator: FilterValidator::new(&config.facets),
            planner: QueryPlanner::new(config.catalog.clone()),
            index,
        }
    }

    pub fn planner(&self) -> &QueryPlanner {
        &self.planner
    }

    /// Validate a transport body and run the search. Invalid input fails
    /// before the index is contacted.
    pub async fn search_body(&self, body: &Value) -> Result<Vec<QueryMatch>> {
        let state = self.validator.parse_body(body).inspect_err(|e| {
            tracing::debug!(error = %e, "rejected filter body");
        })?;
        self.search(&state).await
    }

    pub async fn search(&self, state: &FacetFilterState) -> Result<Vec<QueryMatch>> {
        let request = self.planner.plan(state);
        self.index.query(&request).await
    }
}

/// Validate a raw transport body and plan its index request without
/// querying anything. Backs `shelf translate`.
pub fn translate_body(config: &Config, body: &str) -> anyhow::Result<QueryRequest> {
    let body: Value = serde_json::from_str(body)?;
    let state = FilterValidator::new(&config.facets).parse_body(&body)?;
    Ok(QueryPlanner::new(config.catalog.clone()).plan(&state))
}
