use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::backend::SimulatedBackend;
use crate::backend::SubmissionError;
use crate::backend::SubscriptionBackend;
use crate::configuration::CaptureSettings;
use crate::configuration::NotificationSettings;
use crate::configuration::Settings;
use crate::domain::AttemptId;
use crate::domain::EmailInput;
use crate::domain::InvalidReason;
use crate::domain::SubscriberEmail;
use crate::domain::SubscriptionRequest;
use crate::domain::SubscriptionState;
use crate::notification::Notification;
use crate::notification::Notifier;
use crate::surfaces::CaptureSurface;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error("capture surface has been unmounted")]
    Unmounted,
}

/// What happened to a submit intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Address accepted; a completion is now outstanding.
    Accepted(AttemptId),
    /// Address malformed; state and input are untouched.
    Rejected(InvalidReason),
    /// An attempt is already in flight (or already succeeded).
    Ignored,
}

/// Owns the submission lifecycle of one capture surface:
///
/// ```text
/// Idle/Failed --submit(valid)--> Submitting --complete(ok)--> Succeeded
///      |                             |                            |
///      +--submit(invalid): notify    +--complete(err)--> Failed   +--reset--> (grace) Idle
/// ```
///
/// Submits while `Submitting` are dropped, so at most one completion is ever
/// outstanding. Dropping the controller unmounts it; nothing it scheduled can
/// change state afterwards.
///
/// Completions and resets run as spawned tasks, so `submit` and `reset` must
/// be called from within a tokio runtime.
pub struct SubscriptionController {
    inner: Arc<Inner>,
}

struct Inner {
    id: Uuid,
    surface: CaptureSurface,
    capture: CaptureSettings,
    copy: NotificationSettings,
    backend: Arc<dyn SubscriptionBackend>,
    notifier: Arc<dyn Notifier>,
    /// Only ever written while `core` is locked
    state: watch::Sender<SubscriptionState>,
    core: Mutex<Core>,
    /// Parent of every request/reset token; cancelled on unmount
    lifetime: CancellationToken,
}

#[derive(Default)]
struct Core {
    input: EmailInput,
    last_attempt: Option<AttemptId>,
    in_flight: Option<SubscriptionRequest>,
    pending_reset: Option<CancellationToken>,
}

impl SubscriptionController {
    /// Mount a controller in `Idle`.
    pub fn new(
        surface: CaptureSurface,
        settings: &Settings,
        backend: Arc<dyn SubscriptionBackend>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(SubscriptionState::Idle);
        let inner = Inner {
            id: Uuid::new_v4(),
            surface,
            capture: settings.capture.clone(),
            copy: settings.notifications.clone(),
            backend,
            notifier,
            state,
            core: Mutex::new(Core::default()),
            lifetime: CancellationToken::new(),
        };
        tracing::debug!(%surface, controller_id = %inner.id, "mounted");
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Mount a controller backed by `SimulatedBackend` with the configured
    /// submit delay.
    pub fn simulated(
        surface: CaptureSurface,
        settings: &Settings,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let backend = Arc::new(SimulatedBackend::new(settings.capture.submit_delay()));
        Self::new(surface, settings, backend, notifier)
    }

    pub fn surface(&self) -> CaptureSurface { self.inner.surface }

    pub fn state(&self) -> SubscriptionState { self.inner.state.borrow().clone() }

    /// Every state change from now on. The receiver errors once the
    /// controller is gone.
    pub fn subscribe(&self) -> watch::Receiver<SubscriptionState> { self.inner.state.subscribe() }

    pub fn input(&self) -> String {
        let core = self.inner.core.lock().unwrap_or_else(PoisonError::into_inner);
        core.input.as_ref().to_owned()
    }

    pub fn is_unmounted(&self) -> bool { self.inner.lifetime.is_cancelled() }

    pub fn update_input(
        &self,
        raw: impl Into<String>,
    ) -> Result<(), ControllerError> {
        self.inner.lock()?.input.update(raw.into());
        Ok(())
    }

    /// Submit whatever is currently in the input field.
    #[tracing::instrument(
        name = "Submitting subscription",
        skip(self),
        fields(
            surface = %self.inner.surface,
            controller_id = %self.inner.id,
        )
    )]
    pub fn submit(&self) -> Result<SubmitOutcome, ControllerError> {
        let inner = &self.inner;
        let mut core = inner.lock()?;

        let state = inner.state.borrow().clone();
        if !state.accepts_submit() {
            tracing::debug!(%state, "submit dropped");
            return Ok(SubmitOutcome::Ignored);
        }

        let email = match SubscriberEmail::parse(core.input.as_ref().to_owned()) {
            Ok(email) => email,
            Err(reason) => {
                // the input is left as is, so it can be corrected
                drop(core);
                tracing::info!(%reason, "submission rejected");
                inner.notifier.notify(Notification::rejected(&inner.copy, reason));
                return Ok(SubmitOutcome::Rejected(reason));
            }
        };

        let attempt = core
            .last_attempt
            .map_or_else(AttemptId::first, AttemptId::next);
        core.last_attempt = Some(attempt);
        core.input.clear();
        if let Some(reset) = core.pending_reset.take() {
            reset.cancel();
        }
        let request = SubscriptionRequest::new(email, attempt, inner.lifetime.child_token());
        core.in_flight = Some(request.clone());
        inner.state.send_replace(SubscriptionState::Submitting);
        drop(core);

        tracing::info!(%attempt, email = %request.email, "submission accepted");
        let span = tracing::info_span!(
            "Subscription attempt",
            surface = %inner.surface,
            %attempt,
        );
        tokio::spawn(Arc::clone(inner).run_attempt(request).instrument(span));
        Ok(SubmitOutcome::Accepted(attempt))
    }

    /// Return to `Idle` (with an empty input) once the grace delay has passed,
    /// never immediately. An outstanding attempt is abandoned; a reset that is
    /// already pending is not restarted.
    #[tracing::instrument(
        name = "Resetting capture surface",
        skip(self),
        fields(
            surface = %self.inner.surface,
            controller_id = %self.inner.id,
        )
    )]
    pub fn reset(&self) -> Result<(), ControllerError> {
        let inner = &self.inner;
        let mut core = inner.lock()?;
        if core.pending_reset.is_some() {
            tracing::debug!("reset already pending");
            return Ok(());
        }
        if let Some(request) = core.in_flight.take() {
            tracing::info!(attempt = %request.attempt, "abandoning in-flight attempt");
            request.cancel();
        }
        let token = inner.lifetime.child_token();
        core.pending_reset = Some(token.clone());
        drop(core);

        tokio::spawn(Arc::clone(inner).run_reset(token).in_current_span());
        Ok(())
    }

    /// Terminal. Cancels the outstanding attempt and any pending reset; every
    /// later call fails with `ControllerError::Unmounted`.
    pub fn unmount(&self) {
        let mut core = self.inner.core.lock().unwrap_or_else(PoisonError::into_inner);
        if self.inner.lifetime.is_cancelled() {
            return;
        }
        self.inner.lifetime.cancel();
        core.in_flight = None;
        core.pending_reset = None;
        tracing::debug!(
            surface = %self.inner.surface,
            controller_id = %self.inner.id,
            "unmounted"
        );
    }

    /// Resolves with the current state as soon as it is not `Submitting` (or
    /// the controller is unmounted).
    pub async fn settled(&self) -> SubscriptionState {
        let mut rx = self.subscribe();
        tokio::select! {
            biased;
            _ = self.inner.lifetime.cancelled() => {}
            _ = rx.wait_for(|s| *s != SubscriptionState::Submitting) => {}
        }
        self.state()
    }
}

impl Drop for SubscriptionController {
    fn drop(&mut self) { self.unmount() }
}

impl Inner {
    /// Lock the mutable core, unless the surface is gone. A poisoned lock is
    /// recovered: every write leaves `Core` consistent.
    fn lock(&self) -> Result<MutexGuard<'_, Core>, ControllerError> {
        let core = self.core.lock().unwrap_or_else(PoisonError::into_inner);
        match self.lifetime.is_cancelled() {
            true => Err(ControllerError::Unmounted),
            false => Ok(core),
        }
    }

    async fn run_attempt(
        self: Arc<Self>,
        request: SubscriptionRequest,
    ) {
        let outcome = tokio::select! {
            biased;
            _ = request.cancelled() => {
                tracing::debug!("attempt cancelled before completion");
                return;
            }
            outcome = self.backend.deliver(&request) => outcome,
        };
        self.complete(&request, outcome);
    }

    fn complete(
        &self,
        request: &SubscriptionRequest,
        outcome: Result<(), SubmissionError>,
    ) {
        let Ok(mut core) = self.lock() else {
            tracing::debug!("completion after unmount discarded");
            return;
        };
        let current = core.in_flight.as_ref().map(|r| r.attempt) == Some(request.attempt);
        if request.is_cancelled() || !current {
            tracing::debug!("stale completion discarded");
            return;
        }
        core.in_flight = None;

        let notification = match outcome {
            Ok(()) => {
                self.state.send_replace(SubscriptionState::Succeeded);
                tracing::info!("subscription succeeded");
                Notification::success(&self.copy)
            }
            Err(e) => {
                tracing::error!(error.message = %e, error.debug = ?e, "subscription failed");
                self.state.send_replace(SubscriptionState::Failed(e.to_string()));
                Notification::failed(&self.copy)
            }
        };
        drop(core);
        self.notifier.notify(notification);
    }

    async fn run_reset(
        self: Arc<Self>,
        token: CancellationToken,
    ) {
        tokio::select! {
            biased;
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(self.capture.reset_grace()) => {}
        }
        let Ok(mut core) = self.lock() else {
            return;
        };
        // a submit may have claimed the surface while we waited
        if token.is_cancelled() {
            return;
        }
        core.pending_reset = None;
        core.input.clear();
        self.state.send_replace(SubscriptionState::Idle);
        tracing::debug!("reset to idle");
    }
}
