use std::time::Instant;

use tokio::time::timeout;
use tracing::debug;
use url::Url;

use super::types::{ErrorKind, Outcome};
use crate::models::{Check, Method};

/// Probe executor seam
#[async_trait::async_trait]
pub trait Checker: Send + Sync {
    /// Make exactly one attempt against the check's endpoint.
    ///
    /// Always yields an outcome; transport problems are outcomes, not errors.
    async fn probe(&self, check: &Check) -> Outcome;
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// HTTP/HTTPS checker
pub struct HttpChecker {
    client: reqwest::Client,
}

impl HttpChecker {
    /// Build the checker around one shared client.
    ///
    /// No client-wide timeout is set; each probe carries its own deadline.
    /// Redirects are reported as-is instead of being followed.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("checkup-worker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Checker for HttpChecker {
    async fn probe(&self, check: &Check) -> Outcome {
        let target = match Url::parse(&check.target()) {
            Ok(target) => target,
            Err(e) => {
                debug!("Check {} has an unusable target {}: {}", check.id, check.target(), e);
                return Outcome::Failure(ErrorKind::NetworkError);
            }
        };

        let start = Instant::now();
        let request = self.client.request(check.method.into(), target).send();

        // Whichever of response, transport error or deadline comes first ends
        // the attempt. On the deadline the request future is dropped, which
        // abandons the connection.
        let outcome = match timeout(check.timeout(), request).await {
            Ok(Ok(response)) => Outcome::Response { status: response.status().as_u16() },
            Ok(Err(e)) if e.is_timeout() => Outcome::Failure(ErrorKind::TimeoutError),
            Ok(Err(e)) => {
                debug!("Probe of check {} failed: {}", check.id, e);
                Outcome::Failure(ErrorKind::NetworkError)
            }
            Err(_) => Outcome::Failure(ErrorKind::TimeoutError),
        };

        debug!(
            "Probed {} {} in {}ms: {}",
            check.method,
            check.target(),
            start.elapsed().as_millis(),
            outcome
        );
        outcome
    }
}
