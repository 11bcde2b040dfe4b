use crate::error::AnalyticsError;
use crate::stats::mean;
use configuration::AnalysisSettings;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters of the next-round heuristic.
///
/// The heuristic is `max(floor, mean(last window points) * multiplier)`. It carries no
/// error bound or confidence measure.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionParams {
    pub window: usize,
    pub multiplier: f64,
    pub floor: f64,
    pub min_points: usize,
}

impl Default for PredictionParams {
    fn default() -> Self {
        Self {
            window: 5,
            multiplier: 1.1,
            floor: 1.01,
            min_points: 3,
        }
    }
}

impl PredictionParams {
    pub fn from_settings(settings: &AnalysisSettings) -> Result<Self, AnalyticsError> {
        if settings.prediction_window == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "prediction window must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            window: settings.prediction_window,
            multiplier: settings.prediction_multiplier,
            floor: settings.prediction_floor,
            min_points: settings.min_prediction_points,
        })
    }
}

/// Predicts the next multiplier with the default parameters.
///
/// Returns `None` while fewer than three points are recorded.
pub fn predict(values: &[f64]) -> Option<f64> {
    predict_with(values, &PredictionParams::default())
}

pub fn predict_with(values: &[f64], params: &PredictionParams) -> Option<f64> {
    if values.is_empty() || values.len() < params.min_points {
        return None;
    }
    let start = values.len().saturating_sub(params.window);
    let estimate = mean(&values[start..]) * params.multiplier;
    Some(estimate.max(params.floor))
}

/// How attractive the next round looks according to the prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetSignal {
    Strong,
    Moderate,
    Avoid,
}

impl BetSignal {
    pub fn from_prediction(prediction: f64) -> Self {
        if prediction > 2.5 {
            BetSignal::Strong
        } else if prediction > 1.8 {
            BetSignal::Moderate
        } else {
            BetSignal::Avoid
        }
    }
}

impl fmt::Display for BetSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BetSignal::Strong => "Strong",
            BetSignal::Moderate => "Moderate",
            BetSignal::Avoid => "Avoid",
        };
        f.write_str(label)
    }
}
