use crate::error::RiskError;
use crate::{Recommendation, RiskAssessment, RiskClassifier, RiskLevel};
use configuration::RiskSettings;

/// A fixed-threshold implementation of the `RiskClassifier` trait.
///
/// `volatility < medium` is Low, `medium <= volatility < high` is Medium and
/// anything at or above `high` is High. Histories shorter than `min_points`
/// are always Low with a request for more data.
#[derive(Debug, Clone)]
pub struct ThresholdClassifier {
    medium_threshold: f64,
    high_threshold: f64,
    min_points: usize,
}

impl Default for ThresholdClassifier {
    fn default() -> Self {
        Self {
            medium_threshold: 0.5,
            high_threshold: 1.0,
            min_points: 3,
        }
    }
}

impl ThresholdClassifier {
    /// Creates a new `ThresholdClassifier` with the given configuration parameters.
    pub fn new(params: &RiskSettings) -> Result<Self, RiskError> {
        // Validate that risk parameters are logical.
        if !params.medium_threshold.is_finite() || !params.high_threshold.is_finite() {
            return Err(RiskError::InvalidParameters(
                "thresholds must be finite numbers".to_string(),
            ));
        }
        if params.medium_threshold < 0.0 {
            return Err(RiskError::InvalidParameters(
                "medium_threshold must not be negative".to_string(),
            ));
        }
        if params.high_threshold <= params.medium_threshold {
            return Err(RiskError::InvalidParameters(
                "high_threshold must be greater than medium_threshold".to_string(),
            ));
        }
        Ok(Self {
            medium_threshold: params.medium_threshold,
            high_threshold: params.high_threshold,
            min_points: params.min_points,
        })
    }
}

impl RiskClassifier for ThresholdClassifier {
    fn classify(&self, volatility: f64, points: usize) -> RiskAssessment {
        if points < self.min_points {
            return RiskAssessment {
                level: RiskLevel::Low,
                volatility: 0.0,
                recommendation: Recommendation::AddMoreData,
            };
        }

        let (level, recommendation) = if volatility < self.medium_threshold {
            (RiskLevel::Low, Recommendation::SafeToBet)
        } else if volatility < self.high_threshold {
            (RiskLevel::Medium, Recommendation::BetWithCaution)
        } else {
            (RiskLevel::High, Recommendation::AvoidBetting)
        };

        tracing::trace!(volatility, points, ?level, "risk classified");

        RiskAssessment {
            level,
            volatility,
            recommendation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        let classifier = ThresholdClassifier::default();

        assert_eq!(classifier.classify(0.0, 3).level, RiskLevel::Low);
        assert_eq!(classifier.classify(0.4999, 3).level, RiskLevel::Low);
        assert_eq!(classifier.classify(0.5, 3).level, RiskLevel::Medium);
        assert_eq!(classifier.classify(0.9999, 3).level, RiskLevel::Medium);
        assert_eq!(classifier.classify(1.0, 3).level, RiskLevel::High);
        assert_eq!(classifier.classify(7.5, 10).level, RiskLevel::High);
    }

    #[test]
    fn test_recommendations() {
        let classifier = ThresholdClassifier::default();
        assert_eq!(
            classifier.classify(0.1, 5).recommendation,
            Recommendation::SafeToBet
        );
        assert_eq!(
            classifier.classify(0.7, 5).recommendation,
            Recommendation::BetWithCaution
        );
        assert_eq!(
            classifier.classify(3.0, 5).recommendation,
            Recommendation::AvoidBetting
        );
        assert_eq!(Recommendation::AvoidBetting.to_string(), "Avoid betting");
    }

    #[test]
    fn test_short_history_is_forced_low() {
        let classifier = ThresholdClassifier::default();
        let assessment = classifier.classify(5.0, 2);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert_eq!(assessment.recommendation, Recommendation::AddMoreData);
        assert_eq!(assessment.volatility, 0.0);
    }

    #[test]
    fn test_reference_history_classification() {
        // Population standard deviation of [2.0, 1.5, 3.0].
        let assessment = ThresholdClassifier::default().classify(0.6236, 3);
        assert_eq!(assessment.level, RiskLevel::Medium);
        assert_eq!(assessment.volatility, 0.6236);

        let empty = ThresholdClassifier::default().classify(0.0, 0);
        assert_eq!(empty.level, RiskLevel::Low);
        assert_eq!(empty.recommendation, Recommendation::AddMoreData);
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        let params = RiskSettings {
            medium_threshold: 1.0,
            high_threshold: 0.5,
            min_points: 3,
        };
        assert!(ThresholdClassifier::new(&params).is_err());

        let params = RiskSettings {
            medium_threshold: -0.1,
            high_threshold: 0.5,
            min_points: 3,
        };
        assert!(ThresholdClassifier::new(&params).is_err());

        assert!(ThresholdClassifier::new(&RiskSettings::default()).is_ok());
    }
}
