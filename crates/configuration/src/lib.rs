//! # Crashlog Configuration
//!
//! Strongly-typed settings for every other crate in the workspace, plus the
//! one-time tracing setup used by the binary.
//!
//! Settings are layered: built-in defaults, then an optional `crashlog.toml`
//! (or an explicit file), then `CRASHLOG__SECTION__KEY` environment variables.
//! A `.env` file in the working directory is honoured for the latter.

use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use logging::init_tracing;
pub use settings::{
    AnalysisSettings, DashboardSettings, LogFormat, LoggingSettings, RiskSettings, Settings,
    StorageSettings, WageringSettings, MAX_HISTOGRAM_BINS,
};

/// Base name of the optional configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "crashlog";

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "CRASHLOG";

/// Loads the application configuration.
///
/// When `path` is given the file must exist. Otherwise `crashlog.toml` is read
/// if present and silently skipped if not.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    // Missing .env is the normal case.
    let _ = dotenvy::dotenv();

    let file_source = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file_source)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    tracing::debug!(?settings, "configuration loaded");
    Ok(settings)
}
