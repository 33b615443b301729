use serde::Serialize;

/// Lifecycle of a single capture surface. Owned by exactly one controller;
/// never shared between surfaces.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SubscriptionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    /// Delivery failed after the address was accepted. Validation rejections
    /// never land here; they leave the state untouched.
    Failed(String),
}

impl SubscriptionState {
    /// `Idle` and `Failed` accept a new submission; the other states drop it.
    pub fn accepts_submit(&self) -> bool { matches!(self, Self::Idle | Self::Failed(_)) }
}

impl std::fmt::Display for SubscriptionState {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Submitting => write!(f, "submitting"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}
