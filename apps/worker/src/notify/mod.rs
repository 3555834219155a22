//! Alert delivery.
//!
//! The worker hands a finished alert text to a [`Notifier`]; how it reaches
//! the owner is up to the implementation.

pub mod log;
pub mod webhook;

pub use self::log::LogNotifier;
pub use webhook::WebhookNotifier;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{NotifierConfig, NotifierKind};

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("Alert request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Alert endpoint rejected the alert with status {0}")]
    Rejected(u16),

    #[error("Invalid notifier configuration: {0}")]
    Config(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message` to the owner identified by `owner_id`
    async fn send(&self, owner_id: &str, message: &str) -> Result<(), NotifierError>;
}

/// Build the notifier selected in the configuration
pub fn build_notifier(config: &NotifierConfig) -> Result<Arc<dyn Notifier>, NotifierError> {
    match config.kind {
        NotifierKind::Log => Ok(Arc::new(LogNotifier)),
        NotifierKind::Webhook => {
            let url = config.webhook_url.as_deref().ok_or_else(|| {
                NotifierError::Config("webhook notifier requires webhook_url".to_string())
            })?;
            Ok(Arc::new(WebhookNotifier::new(url, config.timeout())?))
        }
    }
}
