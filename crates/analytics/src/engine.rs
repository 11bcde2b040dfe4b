use crate::error::AnalyticsError;
use crate::prediction::{predict_with, BetSignal, PredictionParams};
use crate::report::StatisticsReport;
use crate::series::recent_points;
use crate::stats;
use configuration::AnalysisSettings;
use core_types::{SessionState, DEFAULT_STAKE};

/// A stateless calculator deriving every displayed metric from a session.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    prediction: PredictionParams,
    stake: f64,
    recent_window: usize,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self {
            prediction: PredictionParams::default(),
            stake: DEFAULT_STAKE,
            recent_window: 10,
        }
    }
}

impl AnalyticsEngine {
    pub fn new(settings: &AnalysisSettings, stake: f64) -> Result<Self, AnalyticsError> {
        if !(stake.is_finite() && stake > 0.0) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "stake must be positive, got {stake}"
            )));
        }
        Ok(Self {
            prediction: PredictionParams::from_settings(settings)?,
            stake,
            recent_window: settings.recent_window,
        })
    }

    pub fn stake(&self) -> f64 {
        self.stake
    }

    /// The main entry point for calculating the statistics of a session.
    ///
    /// Never fails: metrics that need more data than is available are zero or `None`.
    pub fn calculate(&self, state: &SessionState) -> StatisticsReport {
        let mut report = StatisticsReport::new();
        report.profit = state.profit;

        if state.is_empty() {
            // If there are no points, the zeroed-out report is already correct.
            return report;
        }

        let values = state.values();
        report.total_points = values.len();
        report.profit_per_round = Some(state.profit / values.len() as f64);

        report.mean = stats::mean(&values);
        report.median = stats::median(&values);
        report.min = stats::min(&values);
        report.max = stats::max(&values);
        report.range = stats::range(&values);
        report.variance = stats::variance(&values);
        report.volatility = stats::volatility(&values);
        report.skewness = stats::skewness(&values);
        report.kurtosis = stats::kurtosis(&values);
        report.win_rate_pct = stats::win_rate(&values);

        if report.volatility > 0.0 {
            report.risk_reward_ratio = Some(report.mean / report.volatility);
        }

        report.prediction = predict_with(&values, &self.prediction);
        report.signal = report.prediction.map(BetSignal::from_prediction);
        report.recent = recent_points(&state.history, self.recent_window, self.stake);

        tracing::debug!(
            points = report.total_points,
            volatility = report.volatility,
            prediction = ?report.prediction,
            "statistics recalculated"
        );

        report
    }
}
