use crate::command::{Cleared, Recorded, SessionCommand};
use crate::error::EngineError;
use crate::snapshot::DashboardSnapshot;
use analytics::AnalyticsEngine;
use chrono::Utc;
use configuration::Settings;
use core_types::{Outcome, SessionState};
use risk::{RiskClassifier, ThresholdClassifier};
use std::sync::Arc;
use store::{SessionRepository, StoreError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Capacity of the command channel. Senders wait when it is full.
const COMMAND_BUFFER: usize = 64;

/// The single owner of the session state.
///
/// The engine runs as one tokio task. Nothing else holds the state; every read and
/// write arrives as a `SessionCommand` through a `SessionHandle`, so mutations are
/// applied and persisted strictly one after another.
pub struct SessionEngine {
    state: SessionState,
    repository: Arc<dyn SessionRepository>,
    analytics: AnalyticsEngine,
    classifier: Arc<dyn RiskClassifier + Send + Sync>,
}

impl SessionEngine {
    /// Creates an engine, loading the persisted session from `repository`.
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        analytics: AnalyticsEngine,
        classifier: Arc<dyn RiskClassifier + Send + Sync>,
    ) -> Self {
        let state = repository.load();
        Self {
            state,
            repository,
            analytics,
            classifier,
        }
    }

    /// Builds the calculation components from the application settings.
    pub fn from_settings(
        settings: &Settings,
        repository: Arc<dyn SessionRepository>,
    ) -> Result<Self, EngineError> {
        let analytics = AnalyticsEngine::new(&settings.analysis, settings.wagering.stake)?;
        let classifier = ThresholdClassifier::new(&settings.risk)?;
        Ok(Self::new(repository, analytics, Arc::new(classifier)))
    }

    /// Moves the engine onto its own task and returns the handle to talk to it.
    ///
    /// The task ends once every `SessionHandle` has been dropped.
    pub fn spawn(self) -> (SessionHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let task = tokio::spawn(self.run(rx));
        (SessionHandle { tx }, task)
    }

    async fn run(mut self, mut rx: mpsc::Receiver<SessionCommand>) {
        tracing::debug!(points = self.state.len(), "session engine started");

        while let Some(command) = rx.recv().await {
            self.handle(command);
        }

        tracing::debug!(points = self.state.len(), "session engine stopped");
    }

    fn handle(&mut self, command: SessionCommand) {
        // A dropped reply channel only means the caller stopped waiting.
        match command {
            SessionCommand::Record { outcome, reply } => {
                let _ = reply.send(self.record(outcome));
            }
            SessionCommand::Clear { reply } => {
                let _ = reply.send(self.clear());
            }
            SessionCommand::Save { reply } => {
                let _ = reply.send(self.persist());
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            SessionCommand::State { reply } => {
                let _ = reply.send(self.state.clone());
            }
        }
    }

    fn record(&mut self, outcome: Outcome) -> Recorded {
        let profit = self.state.record(outcome, self.analytics.stake());
        let round = self.state.len();
        tracing::info!(round, multiplier = outcome.value(), profit, "outcome recorded");

        Recorded {
            round,
            outcome,
            profit,
            persisted: self.persist(),
        }
    }

    fn clear(&mut self) -> Cleared {
        let removed = self.state.len();
        self.state.clear();
        tracing::info!(removed, "session cleared");

        Cleared {
            removed,
            persisted: self.persist(),
        }
    }

    fn persist(&self) -> Result<(), StoreError> {
        let result = self.repository.save(&self.state);
        if let Err(e) = &result {
            tracing::error!(error = %e, "failed to save session; keeping in-memory state");
        }
        result
    }

    fn snapshot(&self) -> DashboardSnapshot {
        let report = self.analytics.calculate(&self.state);
        let risk = self
            .classifier
            .classify(report.volatility, report.total_points);
        DashboardSnapshot {
            taken_at: Utc::now(),
            report,
            risk,
        }
    }
}

/// A cheap, cloneable front door to a running `SessionEngine`.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub async fn record(&self, outcome: Outcome) -> Result<Recorded, EngineError> {
        self.request(|reply| SessionCommand::Record { outcome, reply })
            .await
    }

    pub async fn clear(&self) -> Result<Cleared, EngineError> {
        self.request(|reply| SessionCommand::Clear { reply }).await
    }

    pub async fn save(&self) -> Result<(), EngineError> {
        self.request(|reply| SessionCommand::Save { reply })
            .await?
            .map_err(EngineError::from)
    }

    pub async fn snapshot(&self) -> Result<DashboardSnapshot, EngineError> {
        self.request(|reply| SessionCommand::Snapshot { reply })
            .await
    }

    pub async fn state(&self) -> Result<SessionState, EngineError> {
        self.request(|reply| SessionCommand::State { reply }).await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, EngineError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| EngineError::Stopped)?;
        response.await.map_err(|_| EngineError::Stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk::{Recommendation, RiskLevel};
    use std::path::PathBuf;
    use store::InMemoryRepository;

    /// A store whose disk is always full.
    struct FailingRepository;

    impl SessionRepository for FailingRepository {
        fn load(&self) -> SessionState {
            SessionState::default()
        }

        fn save(&self, _state: &SessionState) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: PathBuf::from("crash_data.json"),
                source: std::io::Error::other("no space left on device"),
            })
        }
    }

    fn spawn_engine(repo: Arc<InMemoryRepository>) -> (SessionHandle, JoinHandle<()>) {
        SessionEngine::new(
            repo,
            AnalyticsEngine::default(),
            Arc::new(ThresholdClassifier::default()),
        )
        .spawn()
    }

    fn outcome(value: f64) -> Outcome {
        Outcome::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_record_persists_before_acknowledging() {
        let repo = Arc::new(InMemoryRepository::new());
        let (handle, _task) = spawn_engine(repo.clone());

        let recorded = handle.record(outcome(2.5)).await.unwrap();
        assert_eq!(recorded.round, 1);
        assert_eq!(recorded.profit, 15.0);
        assert!(recorded.persisted.is_ok());

        let saved = repo.saved().unwrap();
        assert_eq!(saved.values(), vec![2.5]);
        assert_eq!(saved.profit, 15.0);
    }

    #[tokio::test]
    async fn test_engine_starts_from_persisted_state() {
        let mut initial = SessionState::default();
        initial.record(outcome(3.0), 10.0);
        let repo = Arc::new(InMemoryRepository::with_state(initial));
        let (handle, _task) = spawn_engine(repo);

        let state = handle.state().await.unwrap();
        assert_eq!(state.values(), vec![3.0]);
        assert_eq!(state.profit, 20.0);
    }

    #[tokio::test]
    async fn test_snapshot_scenarios() {
        let repo = Arc::new(InMemoryRepository::new());
        let (handle, _task) = spawn_engine(repo);

        let empty = handle.snapshot().await.unwrap();
        assert_eq!(empty.report.win_rate_pct, 0.0);
        assert_eq!(empty.report.volatility, 0.0);
        assert_eq!(empty.report.prediction_label(), "N/A");
        assert_eq!(empty.risk.level, RiskLevel::Low);
        assert_eq!(empty.risk.recommendation, Recommendation::AddMoreData);

        for value in [2.0, 1.5, 3.0] {
            handle.record(outcome(value)).await.unwrap();
        }
        let snapshot = handle.snapshot().await.unwrap();
        assert!((snapshot.report.win_rate_pct - 66.667).abs() < 1e-3);
        assert_eq!(snapshot.risk.level, RiskLevel::Medium);
        assert_eq!(snapshot.report.prediction_label(), "2.38x");
    }

    #[tokio::test]
    async fn test_clear_empties_and_persists() {
        let repo = Arc::new(InMemoryRepository::new());
        let (handle, _task) = spawn_engine(repo.clone());

        handle.record(outcome(2.0)).await.unwrap();
        handle.record(outcome(0.5)).await.unwrap();

        let cleared = handle.clear().await.unwrap();
        assert_eq!(cleared.removed, 2);
        assert!(cleared.persisted.is_ok());

        let saved = repo.saved().unwrap();
        assert!(saved.is_empty());
        assert_eq!(saved.profit, 0.0);
    }

    #[tokio::test]
    async fn test_concurrent_records_are_serialized() {
        let repo = Arc::new(InMemoryRepository::new());
        let (handle, _task) = spawn_engine(repo.clone());

        let mut tasks = Vec::new();
        for i in 0..20 {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move {
                handle.record(outcome(1.0 + i as f64 / 10.0)).await
            }));
        }
        let mut rounds = Vec::new();
        for task in tasks {
            rounds.push(task.await.unwrap().unwrap().round);
        }
        rounds.sort_unstable();

        assert_eq!(rounds, (1..=20).collect::<Vec<_>>());
        assert_eq!(repo.saved().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_explicit_save_writes_current_state() {
        let mut initial = SessionState::default();
        initial.record(outcome(1.2), 10.0);
        let repo = Arc::new(InMemoryRepository::with_state(initial.clone()));
        let (handle, _task) = spawn_engine(repo.clone());

        handle.save().await.unwrap();
        assert_eq!(repo.saved(), Some(initial));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_in_memory_state() {
        let (handle, _task) = SessionEngine::new(
            Arc::new(FailingRepository),
            AnalyticsEngine::default(),
            Arc::new(ThresholdClassifier::default()),
        )
        .spawn();

        let recorded = handle.record(outcome(2.5)).await.unwrap();
        assert!(matches!(recorded.persisted, Err(StoreError::Io { .. })));
        assert_eq!(recorded.round, 1);

        // The failed write does not roll back the session.
        let state = handle.state().await.unwrap();
        assert_eq!(state.values(), vec![2.5]);
        assert_eq!(state.profit, 15.0);
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.report.total_points, 1);

        assert!(matches!(
            handle.save().await,
            Err(EngineError::Store(StoreError::Io { .. }))
        ));
        let cleared = handle.clear().await.unwrap();
        assert!(cleared.persisted.is_err());
        assert!(handle.state().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handle_reports_stopped_engine() {
        let repo = Arc::new(InMemoryRepository::new());
        let (handle, task) = spawn_engine(repo);
        task.abort();
        let _ = task.await;

        assert!(matches!(
            handle.snapshot().await,
            Err(EngineError::Stopped)
        ));
    }
}
