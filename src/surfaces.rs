//! Thin adapters for the three places the subscribe form appears. None of
//! them hold subscription state of their own: they forward input and submit
//! intents to their controller and map its state onto a `View`.

use std::fmt::Display;

use serde::Serialize;

use crate::controller::ControllerError;
use crate::controller::SubmitOutcome;
use crate::controller::SubscriptionController;
use crate::domain::SubscriptionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureSurface {
    /// Landing page hero section
    Hero,
    /// "Subscribe" dialog
    Modal,
    /// Capture block at the bottom of the tools index
    ToolsPage,
}

impl Display for CaptureSurface {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CaptureSurface::Hero => "hero",
                CaptureSurface::Modal => "modal",
                CaptureSurface::ToolsPage => "tools_page",
            }
        )
    }
}

/// What a surface should render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "reason", rename_all = "snake_case")]
pub enum View {
    Form,
    Spinner,
    Success,
    /// The form again, with the failure reason shown above it
    Retry(String),
}

impl From<&SubscriptionState> for View {
    fn from(state: &SubscriptionState) -> Self {
        match state {
            SubscriptionState::Idle => View::Form,
            SubscriptionState::Submitting => View::Spinner,
            SubscriptionState::Succeeded => View::Success,
            SubscriptionState::Failed(reason) => View::Retry(reason.clone()),
        }
    }
}

/// Inline capture block (hero section, tools page). Once it shows success it
/// keeps showing success until it is unmounted, i.e. the user navigates away.
pub struct CaptureBlock {
    controller: SubscriptionController,
}

impl CaptureBlock {
    pub fn new(controller: SubscriptionController) -> Self { Self { controller } }

    pub fn surface(&self) -> CaptureSurface { self.controller.surface() }

    pub fn update_input(
        &self,
        raw: impl Into<String>,
    ) -> Result<(), ControllerError> {
        self.controller.update_input(raw)
    }

    pub fn submit(&self) -> Result<SubmitOutcome, ControllerError> { self.controller.submit() }

    pub fn view(&self) -> View { View::from(&self.controller.state()) }

    pub fn controller(&self) -> &SubscriptionController { &self.controller }
}

/// The subscribe dialog. Dismissing it always schedules a reset, whatever the
/// outcome, so reopening it later starts from an empty form.
pub struct SubscribeModal {
    controller: SubscriptionController,
    open: bool,
}

impl SubscribeModal {
    pub fn new(controller: SubscriptionController) -> Self {
        Self {
            controller,
            open: false,
        }
    }

    pub fn open(&mut self) { self.open = true }

    pub fn is_open(&self) -> bool { self.open }

    pub fn update_input(
        &self,
        raw: impl Into<String>,
    ) -> Result<(), ControllerError> {
        self.controller.update_input(raw)
    }

    /// A closed dialog has no form to submit.
    pub fn submit(&self) -> Result<SubmitOutcome, ControllerError> {
        match self.open {
            true => self.controller.submit(),
            false => Ok(SubmitOutcome::Ignored),
        }
    }

    /// Close the dialog; state is cleared after the grace delay.
    pub fn dismiss(&mut self) -> Result<(), ControllerError> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.controller.reset()
    }

    pub fn view(&self) -> View { View::from(&self.controller.state()) }

    pub fn controller(&self) -> &SubscriptionController { &self.controller }
}
