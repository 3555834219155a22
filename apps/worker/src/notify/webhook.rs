use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use super::{Notifier, NotifierError};

#[derive(Debug, Serialize)]
struct AlertPayload<'a> {
    to: &'a str,
    message: &'a str,
}

/// POSTs each alert as JSON `{"to": ..., "message": ...}` to a fixed URL
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: Url,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, NotifierError> {
        let url = Url::parse(url)
            .map_err(|e| NotifierError::Config(format!("invalid webhook url '{url}': {e}")))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { url, client })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, owner_id: &str, message: &str) -> Result<(), NotifierError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&AlertPayload { to: owner_id, message })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() { Ok(()) } else { Err(NotifierError::Rejected(status.as_u16())) }
    }
}
