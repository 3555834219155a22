/// Monitoring engine module - turns stored checks into up/down states
///
/// This module is responsible for:
/// - Validating raw check records
/// - Probing HTTP/HTTPS endpoints under a per-check deadline
/// - Classifying outcomes and deciding on transition alerts
/// - Scheduling the periodic sweep over all checks
pub mod alert;
pub mod checker;
pub mod evaluator;
pub mod executor;
pub mod scheduler;
pub mod types;
pub mod validation;

pub use checker::{Checker, HttpChecker};
pub use executor::MonitoringExecutor;
pub use scheduler::{MonitoringScheduler, TickSummary};
pub use types::{AlertDisposition, ErrorKind, Outcome, ProbeReport};
