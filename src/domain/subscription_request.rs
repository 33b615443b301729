use tokio_util::sync::CancellationToken;

use super::SubscriberEmail;

/// Per-controller submission counter. The first accepted submission is
/// attempt 1; rejected submissions never consume an id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptId(u64);

impl AttemptId {
    pub fn first() -> Self { Self(1) }

    pub fn next(self) -> Self { Self(self.0 + 1) }
}

impl std::fmt::Display for AttemptId {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A validated address on its way to the backend.
///
/// The token is a child of the owning controller's token: it is cancelled
/// when the surface unmounts or the attempt is abandoned by a reset, and a
/// completion for a cancelled request is never applied.
#[derive(Clone, Debug)]
pub struct SubscriptionRequest {
    pub email: SubscriberEmail,
    pub attempt: AttemptId,
    token: CancellationToken,
}

impl SubscriptionRequest {
    pub fn new(
        email: SubscriberEmail,
        attempt: AttemptId,
        token: CancellationToken,
    ) -> Self {
        Self {
            email,
            attempt,
            token,
        }
    }

    pub fn is_cancelled(&self) -> bool { self.token.is_cancelled() }

    pub fn cancel(&self) { self.token.cancel() }

    /// Resolves once the request has been cancelled.
    pub async fn cancelled(&self) { self.token.cancelled().await }
}
