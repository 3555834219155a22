#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use checkup_worker::models::Check;
use checkup_worker::monitoring::{Checker, MonitoringExecutor, Outcome};
use checkup_worker::notify::{Notifier, NotifierError};
use checkup_worker::store::{MemoryStore, RecordStore, StoreError};

pub const COLLECTION: &str = "checks";
pub const OWNER: &str = "5551234567";

/// 20 character check id derived from a short tag
pub fn check_id(tag: &str) -> String {
    format!("{tag:0>20}")
}

pub fn check_record(id: &str, url: &str) -> Value {
    json!({
        "id": id,
        "ownerId": OWNER,
        "protocol": "http",
        "url": url,
        "method": "get",
        "successCodes": [200],
        "timeoutSeconds": 1,
    })
}

/// Checker that replays queued outcomes, then repeats a fallback
pub struct ScriptedChecker {
    script: Mutex<VecDeque<Outcome>>,
    fallback: Outcome,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedChecker {
    pub fn always(outcome: Outcome) -> Self {
        Self::new(Vec::new(), outcome)
    }

    pub fn new(script: Vec<Outcome>, fallback: Outcome) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Checker for ScriptedChecker {
    async fn probe(&self, _check: &Check) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.script.lock().await.pop_front().unwrap_or(self.fallback);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        outcome
    }
}

/// Checker whose every probe panics, counting the attempts
#[derive(Default)]
pub struct PanickingChecker {
    calls: AtomicUsize,
}

impl PanickingChecker {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Checker for PanickingChecker {
    async fn probe(&self, check: &Check) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        panic!("checker blew up on {}", check.id)
    }
}

/// Notifier that records every alert, optionally failing delivery
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self { sent: Mutex::new(Vec::new()), fail: true }
    }

    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, owner_id: &str, message: &str) -> Result<(), NotifierError> {
        self.sent.lock().await.push((owner_id.to_string(), message.to_string()));
        if self.fail { Err(NotifierError::Rejected(503)) } else { Ok(()) }
    }
}

/// Memory store wrapper with injectable failures and an update counter
#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    pub fail_list: bool,
    pub fail_read: Vec<String>,
    pub fail_update: Vec<String>,
    pub updates: AtomicUsize,
}

impl FaultyStore {
    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    fn unavailable() -> StoreError {
        StoreError::Io(std::io::Error::other("store unavailable"))
    }
}

#[async_trait]
impl RecordStore for FaultyStore {
    async fn list(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        if self.fail_list {
            return Err(Self::unavailable());
        }
        self.inner.list(collection).await
    }

    async fn read(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        if self.fail_read.iter().any(|failing| failing == id) {
            return Err(Self::unavailable());
        }
        self.inner.read(collection, id).await
    }

    async fn update(&self, collection: &str, id: &str, record: &Value) -> Result<(), StoreError> {
        if self.fail_update.iter().any(|failing| failing == id) {
            return Err(Self::unavailable());
        }
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(collection, id, record).await
    }
}

pub fn executor(
    store: Arc<dyn RecordStore>,
    checker: Arc<dyn Checker>,
    notifier: Arc<dyn Notifier>,
) -> Arc<MonitoringExecutor> {
    Arc::new(MonitoringExecutor::new(store, checker, notifier, COLLECTION))
}
