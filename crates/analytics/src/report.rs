use crate::prediction::BetSignal;
use crate::series::RecentPoint;
use serde::{Deserialize, Serialize};

/// A complete snapshot of the statistics for one history.
///
/// This struct is the final output of the `AnalyticsEngine` and is what every
/// terminal view renders from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    // I. Session
    pub total_points: usize,
    pub profit: f64,
    pub profit_per_round: Option<f64>, // None for an empty history

    // II. Location and Spread
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub variance: f64,
    pub volatility: f64,

    // III. Shape
    pub skewness: f64,
    pub kurtosis: f64,

    // IV. Performance
    pub win_rate_pct: f64,
    pub risk_reward_ratio: Option<f64>, // None when there is no volatility

    // V. Outlook
    pub prediction: Option<f64>,
    pub signal: Option<BetSignal>,
    pub recent: Vec<RecentPoint>,
}

impl StatisticsReport {
    /// Creates a new, zeroed-out report, which is what an empty history produces.
    pub fn new() -> Self {
        Self {
            total_points: 0,
            profit: 0.0,
            profit_per_round: None,
            mean: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
            range: 0.0,
            variance: 0.0,
            volatility: 0.0,
            skewness: 0.0,
            kurtosis: 0.0,
            win_rate_pct: 0.0,
            risk_reward_ratio: None,
            prediction: None,
            signal: None,
            recent: Vec::new(),
        }
    }

    /// The prediction formatted the way it is displayed, `"N/A"` when there is none.
    pub fn prediction_label(&self) -> String {
        match self.prediction {
            Some(value) => format!("{value:.2}x"),
            None => "N/A".to_string(),
        }
    }
}

impl Default for StatisticsReport {
    fn default() -> Self {
        Self::new()
    }
}
