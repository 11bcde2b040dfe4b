use crate::error::EngineError;
use crate::session::SessionHandle;
use crate::snapshot::DashboardSnapshot;
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// What the refresh loop should be doing, set through a `watch` channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshControl {
    Run,
    /// Keep the timer going but leave the screen alone.
    Pause,
    Stop,
}

/// Something that can display a dashboard snapshot.
pub trait DashboardSink: Send {
    fn render(&mut self, snapshot: &DashboardSnapshot);
}

/// Periodically recomputes the dashboard and hands it to a sink.
///
/// The refresher never touches the session directly; it asks the session task for a
/// snapshot on every tick, exactly like an interactive caller would.
pub struct DashboardRefresher<S> {
    handle: SessionHandle,
    period: Duration,
    sink: S,
}

impl<S: DashboardSink> DashboardRefresher<S> {
    pub fn new(handle: SessionHandle, period: Duration, sink: S) -> Self {
        Self {
            handle,
            period,
            sink,
        }
    }

    /// Runs until `control` is set to `Stop`, its sender is dropped, or the session
    /// task goes away. Ticks that fall while paused are skipped. Returns the sink so
    /// callers can inspect what was rendered.
    pub async fn run(mut self, mut control: watch::Receiver<RefreshControl>) -> S {
        tracing::debug!(period = ?self.period, "dashboard refresh started");
        // Create a timer that ticks every period. The first tick is immediate.
        let mut timer = interval(self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    let current = *control.borrow();
                    match current {
                        RefreshControl::Run => {}
                        RefreshControl::Pause => continue,
                        RefreshControl::Stop => break,
                    }
                    match self.handle.snapshot().await {
                        Ok(snapshot) => self.sink.render(&snapshot),
                        Err(EngineError::Stopped) => {
                            tracing::debug!("session engine gone, stopping dashboard refresh");
                            break;
                        }
                        Err(e) => tracing::warn!(error = %e, "dashboard refresh failed"),
                    }
                }
                changed = control.changed() => {
                    if changed.is_err() || *control.borrow() == RefreshControl::Stop {
                        break;
                    }
                }
            }
        }

        tracing::debug!("dashboard refresh stopped");
        self.sink
    }
}
