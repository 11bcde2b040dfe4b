//! # Crashlog Risk Classifier
//!
//! Maps the volatility of a history onto one of three risk tiers, each with a
//! fixed recommendation. Classification is recomputed on every call; nothing is
//! remembered between calls.

pub mod error;
pub mod threshold_classifier;

pub use error::RiskError;
pub use threshold_classifier::ThresholdClassifier;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(label)
    }
}

/// The advice attached to a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    AddMoreData,
    SafeToBet,
    BetWithCaution,
    AvoidBetting,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Recommendation::AddMoreData => "Add more data",
            Recommendation::SafeToBet => "Safe to bet",
            Recommendation::BetWithCaution => "Bet with caution",
            Recommendation::AvoidBetting => "Avoid betting",
        };
        f.write_str(text)
    }
}

/// The result of classifying a history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    /// Volatility the classification was based on. Zero when data was insufficient.
    pub volatility: f64,
    pub recommendation: Recommendation,
}

/// Turns a volatility reading into a `RiskAssessment`.
pub trait RiskClassifier {
    /// Classifies an already computed volatility for a history of `points` rounds.
    fn classify(&self, volatility: f64, points: usize) -> RiskAssessment;
}
