use thiserror::Error;

/// Rejections raised at the input boundary when an outcome is entered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Please enter a crash point")]
    Empty,

    #[error("Please enter a valid number: '{0}'")]
    NotANumber(String),

    #[error("Crash point must be a finite number, got {0}")]
    NotFinite(f64),

    #[error("Point must be greater than zero, got {0}")]
    NonPositive(f64),
}
