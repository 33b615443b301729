use serde::Serialize;
use tokio::sync::mpsc;

use crate::configuration::NotificationSettings;
use crate::domain::InvalidReason;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Rejected,
    Success,
    Failed,
}

/// Toast-shaped event handed to the notification collaborator, serialised as
/// `{ "kind": "...", "title": "...", "description": "..." }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn rejected(
        copy: &NotificationSettings,
        reason: InvalidReason,
    ) -> Self {
        tracing::trace!(%reason, "building rejection notice");
        Self {
            kind: NotificationKind::Rejected,
            title: copy.rejected_title.clone(),
            description: copy.rejected_description.clone(),
        }
    }

    pub fn success(copy: &NotificationSettings) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: copy.success_title.clone(),
            description: copy.success_description.clone(),
        }
    }

    /// The backend's reason is logged, not shown; users get the generic copy.
    pub fn failed(copy: &NotificationSettings) -> Self {
        Self {
            kind: NotificationKind::Failed,
            title: copy.failed_title.clone(),
            description: copy.failed_description.clone(),
        }
    }
}

/// The toast collaborator. How (or whether) a notification is rendered is not
/// our concern; implementations must not block.
pub trait Notifier: Send + Sync {
    fn notify(
        &self,
        notification: Notification,
    );
}

/// Emits every notification as a structured log event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(
        &self,
        notification: Notification,
    ) {
        tracing::info!(
            kind = ?notification.kind,
            title = %notification.title,
            description = %notification.description,
            "notification"
        );
    }
}

/// Forwards notifications to whoever holds the receiving half (a toast
/// renderer, or a test).
#[derive(Clone, Debug)]
pub struct ChannelNotifier(mpsc::UnboundedSender<Notification>);

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(
        &self,
        notification: Notification,
    ) {
        if let Err(e) = self.0.send(notification) {
            // nobody is rendering toasts any more; not worth failing over
            tracing::warn!(kind = ?e.0.kind, "notification dropped, receiver gone");
        }
    }
}
