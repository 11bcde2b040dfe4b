//! # Crashlog Store
//!
//! Persists the session (history and running profit) as a single JSON document.
//!
//! ## Architectural Principles
//!
//! - **Fail-open loads:** A missing or unreadable document is indistinguishable from a
//!   fresh install. `load` never fails; it logs and returns an empty session.
//! - **Reported saves:** `save` returns a `StoreError` and never retries. The in-memory
//!   state stays the source of truth for the rest of the session.
//!
//! ## Public API
//!
//! - `SessionRepository`: The seam the engine persists through.
//! - `JsonFileRepository`: The on-disk implementation.
//! - `InMemoryRepository`: A volatile implementation for tests and dry runs.
//! - `SessionDocument`: The exact shape of the JSON document.

pub mod document;
pub mod error;
pub mod repository;

pub use document::SessionDocument;
pub use error::StoreError;
pub use repository::{InMemoryRepository, JsonFileRepository, SessionRepository};
