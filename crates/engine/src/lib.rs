//! # Crashlog Engine
//!
//! Owns the live session. A `SessionEngine` runs as a single tokio task and is the
//! only place the history and profit are ever mutated; everything else talks to it
//! through a cloneable `SessionHandle`. Every mutation is persisted before it is
//! acknowledged.
//!
//! The `DashboardRefresher` is the periodic redraw loop. It is just another client
//! of the handle, so refreshes and user input can never interleave mid-update.

pub mod command;
pub mod dashboard;
pub mod error;
pub mod session;
pub mod snapshot;

pub use command::{Cleared, Recorded, SessionCommand};
pub use dashboard::{DashboardRefresher, DashboardSink, RefreshControl};
pub use error::EngineError;
pub use session::{SessionEngine, SessionHandle};
pub use snapshot::DashboardSnapshot;
