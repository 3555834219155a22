//! Uptime check worker.
//!
//! Periodically probes every stored HTTP/HTTPS check, records whether it is
//! up or down, and alerts the owner when that state changes.

pub mod config;
pub mod error;
pub mod models;
pub mod monitoring;
pub mod notify;
pub mod store;
