//! Shared test utilities for shelf integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Timing-sensitive helpers are deterministic under
//! `tokio::time::pause()`.

pub mod assertions;
pub mod builders;
pub mod fake_index;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
