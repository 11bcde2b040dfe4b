use serde::{Deserialize, Serialize};

/// How a single round ended for a player holding the fixed stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundResult {
    Win,
    Loss,
}

impl RoundResult {
    /// A round is a win only when the multiplier strictly exceeds 1.0.
    pub fn from_multiplier(value: f64) -> Self {
        if value > 1.0 {
            RoundResult::Win
        } else {
            RoundResult::Loss
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, RoundResult::Win)
    }
}
