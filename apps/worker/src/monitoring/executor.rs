use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::alert::{alert_message, alert_warranted};
use super::checker::Checker;
use super::evaluator::evaluate;
use super::types::{AlertDisposition, ProbeReport};
use super::validation::validate_check;
use crate::error::PipelineError;
use crate::models::check::record_with_probe;
use crate::models::{Check, CheckState};
use crate::notify::Notifier;
use crate::store::{RecordStore, StoreError};

/// Monitoring executor - runs the pipeline of a single check.
///
/// Holds only shared, immutable handles, so one instance serves every
/// concurrent pipeline.
pub struct MonitoringExecutor {
    store: Arc<dyn RecordStore>,
    checker: Arc<dyn Checker>,
    notifier: Arc<dyn Notifier>,
    collection: String,
}

impl MonitoringExecutor {
    pub fn new(
        store: Arc<dyn RecordStore>,
        checker: Arc<dyn Checker>,
        notifier: Arc<dyn Notifier>,
        collection: impl Into<String>,
    ) -> Self {
        Self { store, checker, notifier, collection: collection.into() }
    }

    /// Ids of every check currently in the store
    pub async fn list_checks(&self) -> Result<Vec<String>, StoreError> {
        self.store.list(&self.collection).await
    }

    /// Read, validate, probe, classify, persist and, on a transition, alert.
    ///
    /// Stages run strictly in order and the first failing one ends the
    /// pipeline. Alert delivery happens only after the write committed, and
    /// its failure is reported in the result instead of as an error.
    pub async fn execute_check(&self, check_id: &str) -> Result<ProbeReport, PipelineError> {
        let record =
            self.store.read(&self.collection, check_id).await.map_err(PipelineError::Read)?;
        let check = validate_check(&record)?;

        let outcome = self.checker.probe(&check).await;
        let state = evaluate(&outcome, &check);
        let checked_at = Utc::now();
        debug!("Check {} probed: {} -> {}", check_id, outcome, state);

        let updated = record_with_probe(&record, state, checked_at);
        self.store
            .update(&self.collection, check_id, &updated)
            .await
            .map_err(PipelineError::Write)?;

        let alert = if alert_warranted(&check, state) {
            self.dispatch_alert(&check, state).await
        } else {
            debug!("Check {} outcome has not changed, no alert needed", check_id);
            AlertDisposition::NotWarranted
        };

        Ok(ProbeReport {
            check_id: check_id.to_string(),
            outcome,
            previous_state: check.state,
            state,
            checked_at,
            alert,
        })
    }

    async fn dispatch_alert(&self, check: &Check, state: CheckState) -> AlertDisposition {
        let message = alert_message(check, state);
        match self.notifier.send(&check.owner_id, &message).await {
            Ok(()) => {
                info!("Owner of check {} was alerted to a status change: {}", check.id, message);
                AlertDisposition::Sent
            }
            Err(e) => {
                warn!("Could not alert owner of check {} to a status change: {}", check.id, e);
                AlertDisposition::Failed
            }
        }
    }
}
