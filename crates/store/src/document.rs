use chrono::{DateTime, Utc};
use core_types::{Outcome, SessionState};
use serde::{Deserialize, Serialize};

/// The on-disk shape of a session.
///
/// ```json
/// {
///   "history": [2.0, 1.5, 3.0],
///   "profit": 35.0,
///   "last_update": "2026-10-18T12:00:00Z"
/// }
/// ```
///
/// Every field is optional when reading; absent fields take their empty value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionDocument {
    #[serde(default)]
    pub history: Vec<Outcome>,
    #[serde(default)]
    pub profit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

impl SessionDocument {
    /// Captures `state` stamped with the current time.
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            history: state.history.clone(),
            profit: state.profit,
            last_update: Some(Utc::now()),
        }
    }

    pub fn into_state(self) -> SessionState {
        SessionState::new(self.history, self.profit)
    }
}
