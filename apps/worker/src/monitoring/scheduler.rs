use std::fmt;
use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use super::executor::MonitoringExecutor;
use super::types::{AlertDisposition, ProbeReport};
use crate::error::PipelineError;
use crate::models::CheckState;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

pub type PipelineHandle = JoinHandle<Result<ProbeReport, PipelineError>>;

/// Monitoring scheduler - fires ticks and fans out one pipeline per check
pub struct MonitoringScheduler {
    executor: Arc<MonitoringExecutor>,
    interval: Duration,
}

/// Aggregate of one fully awaited tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub launched: usize,
    pub up: usize,
    pub down: usize,
    pub alerts_sent: usize,
    pub alerts_failed: usize,
    /// Validation rejections
    pub skipped: usize,
    /// Store failures and panicked pipelines
    pub failed: usize,
}

impl TickSummary {
    fn record(&mut self, result: &Result<ProbeReport, PipelineError>) {
        match result {
            Ok(report) => {
                match report.state {
                    CheckState::Up => self.up += 1,
                    CheckState::Down => self.down += 1,
                }
                match report.alert {
                    AlertDisposition::Sent => self.alerts_sent += 1,
                    AlertDisposition::Failed => self.alerts_failed += 1,
                    AlertDisposition::NotWarranted => {}
                }
            }
            Err(PipelineError::Validation(_)) => self.skipped += 1,
            Err(_) => self.failed += 1,
        }
    }
}

impl fmt::Display for TickSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} checks: {} up, {} down, {} skipped, {} failed, {} alerts sent, {} alerts failed",
            self.launched,
            self.up,
            self.down,
            self.skipped,
            self.failed,
            self.alerts_sent,
            self.alerts_failed
        )
    }
}

impl MonitoringScheduler {
    /// Create a new monitoring scheduler
    pub fn new(executor: Arc<MonitoringExecutor>, interval: Duration) -> Self {
        Self { executor, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one tick: list every check and spawn an independent pipeline per id.
    ///
    /// Returns without waiting for the pipelines. Dropping the handles
    /// detaches the tasks; it does not cancel them. A failed listing makes
    /// the tick a no-op.
    pub async fn tick(&self) -> Vec<PipelineHandle> {
        let ids = match self.executor.list_checks().await {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Could not list checks, skipping this tick: {}", e);
                return Vec::new();
            }
        };

        if ids.is_empty() {
            info!("Could not find any checks to process");
        }

        ids.into_iter().map(|id| self.spawn_pipeline(id)).collect()
    }

    fn spawn_pipeline(&self, check_id: String) -> PipelineHandle {
        let executor = self.executor.clone();

        tokio::spawn(async move {
            let result = executor.execute_check(&check_id).await;
            log_pipeline_result(&check_id, &result);
            result
        })
    }

    /// Run one tick and wait for all of its pipelines
    pub async fn run_once(&self) -> TickSummary {
        let handles = self.tick().await;
        let mut summary = TickSummary { launched: handles.len(), ..TickSummary::default() };

        for joined in join_all(handles).await {
            match joined {
                Ok(result) => summary.record(&result),
                Err(e) => {
                    log_task_failure(&e);
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// Tick forever
    pub async fn run(&self) {
        self.run_until(pending::<()>()).await
    }

    /// Tick until `shutdown` resolves.
    ///
    /// The first tick fires immediately. Finished pipelines are collected
    /// between ticks only to report panics, so a slow pipeline cannot hold
    /// back the next tick. Pipelines still in flight at shutdown are left
    /// to finish on the runtime.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut timer = interval(self.interval);
        let mut in_flight = FuturesUnordered::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, no further ticks will run");
                    break;
                }
                _ = timer.tick() => {
                    let handles = self.tick().await;
                    debug!("Tick launched {} check pipelines", handles.len());
                    in_flight.extend(handles);
                }
                Some(joined) = in_flight.next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        log_task_failure(&e);
                    }
                }
            }
        }
    }
}

fn log_task_failure(e: &JoinError) {
    error!("Check pipeline task failed: {}", e);
}

fn log_pipeline_result(check_id: &str, result: &Result<ProbeReport, PipelineError>) {
    match result {
        Ok(report) if report.changed() => {
            info!("Check {} is now {} ({})", check_id, report.state, report.outcome)
        }
        Ok(report) => debug!("Check {} is still {} ({})", check_id, report.state, report.outcome),
        Err(PipelineError::Validation(e)) => {
            warn!("Check {} is not properly formatted, skipping it: {}", check_id, e)
        }
        Err(e) => warn!("Check {} pipeline stopped: {}", check_id, e),
    }
}
