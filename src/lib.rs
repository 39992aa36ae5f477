//! shelf: faceted catalog search over a hosted vector index.
//!
//! This crate wires the translation core (`shelf-core`) to an index adapter
//! (`shelf-index`) and exposes the outer surfaces as public modules so the
//! integration harnesses can drive them directly.
//!
//! # Architecture
//!
//! ```text
//! HTTP body ──► server ──┐
//!                        ├──► SearchService ──► QueryPlanner ──► VectorIndex
//! facet edits ─► session ┘
//! ```
//!
//! The server and the session share one [`service::SearchService`]; the
//! session adds debouncing and last-write-wins on top.

pub mod server;
pub mod service;
pub mod session;

pub use service::SearchService;
pub use session::{SearchOutcome, SearchSession};
