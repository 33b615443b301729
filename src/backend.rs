use std::time::Duration;

use crate::domain::SubscriptionRequest;

/// Why a submission that passed validation did not go through.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("subscription service unavailable: {0}")]
    Unavailable(String),
}

/// Whatever actually records a subscription. The controller only cares that
/// `deliver` eventually resolves; it may be dropped mid-flight if the request
/// is cancelled.
#[async_trait::async_trait]
pub trait SubscriptionBackend: Send + Sync {
    async fn deliver(
        &self,
        request: &SubscriptionRequest,
    ) -> Result<(), SubmissionError>;
}

/// Stand-in for a real mailing-list service: waits `delay`, then accepts.
/// Nothing leaves the process and nothing is stored.
#[derive(Clone, Debug)]
pub struct SimulatedBackend {
    delay: Duration,
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self { Self { delay } }
}

#[async_trait::async_trait]
impl SubscriptionBackend for SimulatedBackend {
    #[tracing::instrument(
        name = "Simulating subscription delivery",
        skip_all,
        fields(attempt = %request.attempt, email = %request.email)
    )]
    async fn deliver(
        &self,
        request: &SubscriptionRequest,
    ) -> Result<(), SubmissionError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}
