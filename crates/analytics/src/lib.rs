//! # Crashlog Analytics Engine
//!
//! Descriptive statistics over a recorded crash history, plus the naive
//! next-round prediction.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** Every function in `stats`, `prediction` and `series` is a pure,
//!   total function of its inputs. Short histories produce zeros or `None`, never errors.
//! - **Stateless Calculation:** The `AnalyticsEngine` holds only its parameters. It takes
//!   a `SessionState` as input and produces a `StatisticsReport` as output.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: Bundles the configured parameters and builds reports.
//! - `StatisticsReport`: Every metric shown by the dashboard and the analysis view.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod prediction;
pub mod report;
pub mod series;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use prediction::{predict, predict_with, BetSignal, PredictionParams};
pub use report::StatisticsReport;
pub use series::{history_points, profit_curve, recent_points, HistoryPoint, RecentPoint, Trend};
pub use stats::{
    histogram, kurtosis, max, mean, median, min, range, skewness, variance, volatility,
    win_rate, HistogramBin,
};
