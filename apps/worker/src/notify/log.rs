use async_trait::async_trait;
use tracing::info;

use super::{Notifier, NotifierError};

/// Writes alerts to the log instead of delivering them
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, owner_id: &str, message: &str) -> Result<(), NotifierError> {
        info!(owner = %owner_id, "{message}");
        Ok(())
    }
}
