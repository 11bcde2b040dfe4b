use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// Upper bound on the number of histogram bins the distribution view accepts.
pub const MAX_HISTOGRAM_BINS: usize = 1000;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; omitted sections and keys take the
/// defaults below, which reproduce the behaviour of a fresh install.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub wagering: WageringSettings,
    pub analysis: AnalysisSettings,
    pub risk: RiskSettings,
    pub dashboard: DashboardSettings,
    pub logging: LoggingSettings,
}

/// Where the session document lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Path of the JSON session document, relative to the working directory.
    pub data_file: PathBuf,
}

/// Parameters of the fixed-stake profit ledger.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WageringSettings {
    /// The amount assumed to be wagered on every round.
    pub stake: f64,
}

/// Parameters for the statistics engine and the prediction heuristic.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// How many of the most recent points the prediction averages.
    pub prediction_window: usize,
    pub prediction_multiplier: f64,
    /// The prediction never goes below this multiplier.
    pub prediction_floor: f64,
    /// Below this many points no prediction is made.
    pub min_prediction_points: usize,
    /// How many points the "recent" views show.
    pub recent_window: usize,
    pub histogram_bins: usize,
}

/// Volatility thresholds for the risk tiers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskSettings {
    /// Volatility at or above this is at least Medium risk.
    pub medium_threshold: f64,
    /// Volatility at or above this is High risk.
    pub high_threshold: f64,
    /// Below this many points the classifier asks for more data.
    pub min_points: usize,
}

/// Settings of the periodically refreshed dashboard.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub refresh_interval_secs: u64,
    pub auto_refresh: bool,
}

/// Output format of the console log layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, used when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("crash_data.json"),
        }
    }
}

impl Default for WageringSettings {
    fn default() -> Self {
        Self { stake: 10.0 }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            prediction_window: 5,
            prediction_multiplier: 1.1,
            prediction_floor: 1.01,
            min_prediction_points: 3,
            recent_window: 10,
            histogram_bins: 15,
        }
    }
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            medium_threshold: 0.5,
            high_threshold: 1.0,
            min_points: 3,
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 5,
            auto_refresh: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
            directory: None,
        }
    }
}

impl Settings {
    /// Rejects values that would make the downstream calculations meaningless.
    ///
    /// Threshold ordering is checked by the risk classifier itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.wagering.stake.is_finite() && self.wagering.stake > 0.0) {
            return Err(ConfigError::ValidationError(
                "wagering.stake must be a positive number".to_string(),
            ));
        }
        if self.storage.data_file.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.data_file must not be empty".to_string(),
            ));
        }

        let analysis = &self.analysis;
        if analysis.prediction_window == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.prediction_window must be at least 1".to_string(),
            ));
        }
        if analysis.recent_window == 0 || analysis.histogram_bins == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.recent_window and analysis.histogram_bins must be at least 1".to_string(),
            ));
        }
        if analysis.histogram_bins > MAX_HISTOGRAM_BINS {
            return Err(ConfigError::ValidationError(format!(
                "analysis.histogram_bins must be at most {MAX_HISTOGRAM_BINS}"
            )));
        }
        if !analysis.prediction_multiplier.is_finite() || !analysis.prediction_floor.is_finite() {
            return Err(ConfigError::ValidationError(
                "analysis prediction parameters must be finite".to_string(),
            ));
        }

        if self.dashboard.refresh_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "dashboard.refresh_interval_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
