use crate::enums::RoundResult;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The amount assumed to be wagered on every round when no stake is configured.
pub const DEFAULT_STAKE: f64 = 10.0;

/// One recorded crash multiplier.
///
/// An `Outcome` can only be built from a finite value strictly greater than zero,
/// so everything downstream (statistics, persistence) can rely on that.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Outcome(f64);

impl Outcome {
    pub fn new(value: f64) -> Result<Self, CoreError> {
        if !value.is_finite() {
            return Err(CoreError::NotFinite(value));
        }
        if value <= 0.0 {
            return Err(CoreError::NonPositive(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn result(&self) -> RoundResult {
        RoundResult::from_multiplier(self.0)
    }

    /// Profit of this round for a player who cashed out at the multiplier.
    ///
    /// A win pays `(multiplier - 1) * stake`; anything else loses the whole stake.
    pub fn profit(&self, stake: f64) -> f64 {
        match self.result() {
            RoundResult::Win => (self.0 - 1.0) * stake,
            RoundResult::Loss => -stake,
        }
    }
}

impl TryFrom<f64> for Outcome {
    type Error = CoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Outcome::new(value)
    }
}

impl From<Outcome> for f64 {
    fn from(outcome: Outcome) -> Self {
        outcome.0
    }
}

impl FromStr for Outcome {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Empty);
        }
        // Accept the "2.5x" form the values are usually displayed in.
        let numeric = trimmed.strip_suffix(['x', 'X']).unwrap_or(trimmed);
        let value = numeric
            .trim()
            .parse::<f64>()
            .map_err(|_| CoreError::NotANumber(trimmed.to_string()))?;
        Outcome::new(value)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}x", self.0)
    }
}

/// The complete mutable state of a recording session.
///
/// `history` is chronological (most recent last) and is only ever appended to
/// or cleared wholesale. `profit` is the running fixed-stake ledger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub history: Vec<Outcome>,
    pub profit: f64,
}

impl SessionState {
    pub fn new(history: Vec<Outcome>, profit: f64) -> Self {
        Self { history, profit }
    }

    /// Appends an outcome and books its profit. Returns the profit of that round.
    pub fn record(&mut self, outcome: Outcome, stake: f64) -> f64 {
        let round_profit = outcome.profit(stake);
        self.history.push(outcome);
        self.profit += round_profit;
        round_profit
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.profit = 0.0;
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// The history as raw multipliers, in chronological order.
    pub fn values(&self) -> Vec<f64> {
        self.history.iter().map(Outcome::value).collect()
    }
}
