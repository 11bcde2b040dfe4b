use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Risk configuration error: {0}")]
    Risk(#[from] risk::RiskError),

    #[error("Failed to persist session: {0}")]
    Store(#[from] store::StoreError),

    #[error("The session engine is no longer running.")]
    Stopped,
}
