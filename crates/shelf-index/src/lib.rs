//! shelf-index: vector index adapters for shelf.
//!
//! Each adapter accepts a [`QueryRequest`] produced by the planner and
//! returns ranked [`QueryMatch`] values. Every failure surfaces as
//! [`SearchError::UpstreamQueryFailure`](shelf_core::SearchError); adapters
//! never retry.

pub mod expr;
pub mod http;
pub mod memory;

pub use http::HttpIndex;
pub use memory::MemoryIndex;

use shelf_core::{QueryMatch, QueryRequest, Result};

/// A similarity-search backend that filters by metadata expression and
/// ranks by vector proximity.
#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync {
    async fn query(&self, request: &QueryRequest) -> Result<Vec<QueryMatch>>;
}

#[async_trait::async_trait]
impl<T: VectorIndex + ?Sized> VectorIndex for std::sync::Arc<T> {
    async fn query(&self, request: &QueryRequest) -> Result<Vec<QueryMatch>> {
        (**self).query(request).await
    }
}
