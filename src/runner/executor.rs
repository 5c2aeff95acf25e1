use chrono::Utc;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cloud::{CloudResult, CloudSession, CloudStatus};
use crate::context::TestContext;
use crate::runner::types::{ItemUpdate, RunEvent, RunSummary, RunnerState, TestItem, TestState};
use crate::stats::StatsStore;
use crate::units::Registry;
use crate::{ProbeError, Result};

/// Runs the registry one check at a time against a shared context.
///
/// Every run reconnects first. Check `i + 1` starts only once check `i` has
/// resolved; a failing check never stops the run, a failing connection stops
/// it before any check executes.
pub struct TestRunner<S: CloudSession> {
    registry: Registry,
    context: TestContext<S>,
    stats: StatsStore,
    items: Vec<TestItem>,
    state: RunnerState,
    events: Option<UnboundedSender<RunEvent>>,
}

impl<S: CloudSession> TestRunner<S> {
    pub fn new(registry: Registry, context: TestContext<S>, stats: StatsStore) -> Self {
        let items = registry.iter().map(|u| TestItem::new(&u.name)).collect();
        Self {
            registry,
            context,
            stats,
            items,
            state: RunnerState::Idle,
            events: None,
        }
    }

    /// Send run events to `tx` (single consumer).
    pub fn with_events(mut self, tx: UnboundedSender<RunEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn items(&self) -> &[TestItem] {
        &self.items
    }

    pub fn context(&self) -> &TestContext<S> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut TestContext<S> {
        &mut self.context
    }

    pub fn stats(&self) -> &StatsStore {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut StatsStore {
        &mut self.stats
    }

    /// Connect, then run every check in order.
    ///
    /// The first check is timed from the moment the connection is requested.
    /// Returns `ProbeError::Connection` when the session cannot be opened.
    pub async fn start(&mut self) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, "Starting run of {} checks", self.registry.len());

        for item in &mut self.items {
            item.reset();
        }
        self.emit(RunEvent::Started {
            run_id,
            total: self.registry.len(),
        });

        self.state = RunnerState::Connecting;
        let connect_started = Instant::now();
        if let Err(status) = self.connect().await {
            let alert = !self.context.session.handles_status(status);
            warn!(%run_id, "Connection failed: {}", status);
            self.state = RunnerState::Aborted;
            self.emit(RunEvent::Aborted { status, alert });
            return Err(ProbeError::Connection(status));
        }
        if !self.items.is_empty() {
            self.record_duration(0, connect_started);
        }

        for index in 0..self.registry.len() {
            self.advance(index).await;
        }

        self.state = RunnerState::Completed;
        let summary = RunSummary::from_items(run_id, started_at, self.items.clone());
        info!(
            %run_id,
            "Run finished: {} passed, {} failed",
            summary.passed, summary.failed
        );
        self.emit(RunEvent::Completed(summary.clone()));
        Ok(summary)
    }

    /// Open the session; a forbidden access logs out and tries once more.
    async fn connect(&mut self) -> CloudResult<()> {
        let session = &mut self.context.session;
        match session.open_session().await {
            Err(CloudStatus::ForbiddenAccess)
                if !session.handles_status(CloudStatus::ForbiddenAccess) =>
            {
                info!("Access forbidden, logging out and reconnecting");
                session.logout();
                session.open_session().await
            }
            other => other,
        }
    }

    async fn advance(&mut self, index: usize) {
        self.state = RunnerState::Running(index);
        self.items[index].state = TestState::InProgress;
        self.notify(index);

        let started = Instant::now();
        let outcome = match self.registry.get(index) {
            Some(unit) => unit.execute(&mut self.context).await,
            None => TestState::Failed,
        };
        debug!("{} -> {:?}", self.items[index].name, outcome);

        self.items[index].state = outcome;
        // the first check already carries the connect time
        self.record_duration(index, started);
        self.notify(index);
    }

    /// At most one measurement per check and run.
    fn record_duration(&mut self, index: usize, started: Instant) {
        let duration = started.elapsed();
        let item = &mut self.items[index];
        if item.measure(duration) {
            self.stats.add_stat(duration, &item.name);
        }
    }

    fn notify(&self, index: usize) {
        let item = &self.items[index];
        self.emit(RunEvent::ItemChanged(ItemUpdate {
            index,
            name: item.name.clone(),
            state: item.state,
            duration: item.duration,
            average: self.stats.average(&item.name),
        }));
    }

    fn emit(&self, event: RunEvent) {
        if let Some(tx) = &self.events {
            // receiver gone: nobody is watching, keep running
            let _ = tx.send(event);
        }
    }
}
