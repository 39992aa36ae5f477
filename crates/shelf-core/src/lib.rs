//! shelf-core: faceted catalog search core library.
//!
//! This crate turns a user's facet selections into the request a hosted
//! vector index understands. Nothing in here performs I/O; every function is
//! a synchronous, single-pass transformation.
//!
//! # Architecture
//!
//! ```text
//! JSON body ──► validate ──► FacetFilterState ──► QueryPlanner ──► QueryRequest
//!                                                    │
//!                                                    └──► FilterExpressionBuilder
//! ```
//!
//! The index adapters live in `shelf-index`; the HTTP transport and the
//! debounced client session live in the `shelf` binary crate.

pub mod config;
pub mod error;
pub mod filter;
pub mod translate;
pub mod types;
pub mod validate;

pub use error::{Result, SearchError};
pub use filter::{FilterExpressionBuilder, FilterValue, Operator};
pub use translate::QueryPlanner;
pub use types::{
    FacetFilterState, ItemRecord, PriceRange, QueryMatch, QueryRequest, SortMode,
    VECTOR_DIMENSIONS,
};
