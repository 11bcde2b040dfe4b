use crate::snapshot::DashboardSnapshot;
use core_types::{Outcome, SessionState};
use store::StoreError;
use tokio::sync::oneshot;

/// A request to the session task. Every variant carries the channel its answer goes back on.
#[derive(Debug)]
pub enum SessionCommand {
    /// Append an outcome, book its profit and persist.
    Record {
        outcome: Outcome,
        reply: oneshot::Sender<Recorded>,
    },
    /// Drop the whole history, zero the profit and persist.
    Clear { reply: oneshot::Sender<Cleared> },
    /// Persist the current state without changing it.
    Save {
        reply: oneshot::Sender<Result<(), StoreError>>,
    },
    /// Recompute statistics and risk for the current state.
    Snapshot {
        reply: oneshot::Sender<DashboardSnapshot>,
    },
    /// A copy of the raw session, for views that need the full history.
    State { reply: oneshot::Sender<SessionState> },
}

/// Acknowledgement of a `Record` command.
///
/// The outcome is part of the in-memory session even when `persisted` is an error.
#[derive(Debug)]
pub struct Recorded {
    /// 1-based round number of the new outcome.
    pub round: usize,
    pub outcome: Outcome,
    /// Profit booked for this round alone.
    pub profit: f64,
    pub persisted: Result<(), StoreError>,
}

/// Acknowledgement of a `Clear` command.
#[derive(Debug)]
pub struct Cleared {
    /// How many outcomes were dropped.
    pub removed: usize,
    pub persisted: Result<(), StoreError>,
}
