use std::sync::Arc;

use crate::backend::SimulatedBackend;
use crate::backend::SubscriptionBackend;
use crate::configuration::Settings;
use crate::controller::SubscriptionController;
use crate::notification::Notifier;
use crate::notification::TracingNotifier;
use crate::surfaces::CaptureBlock;
use crate::surfaces::CaptureSurface;
use crate::surfaces::SubscribeModal;

/// Everything a capture surface needs in order to mount. Not to be confused
/// with the surfaces themselves: every `mount_*` call produces an independent
/// controller, so surfaces never share subscription state. Only the backend
/// and the toast collaborator are shared.
#[derive(Clone)]
pub struct Site {
    settings: Settings,
    backend: Arc<dyn SubscriptionBackend>,
    notifier: Arc<dyn Notifier>,
}

impl Site {
    /// Simulated backend, notifications logged
    pub fn build(settings: Settings) -> Self {
        let backend = Arc::new(SimulatedBackend::new(settings.capture.submit_delay()));
        Self::with_collaborators(settings, backend, Arc::new(TracingNotifier))
    }

    pub fn with_collaborators(
        settings: Settings,
        backend: Arc<dyn SubscriptionBackend>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            settings,
            backend,
            notifier,
        }
    }

    fn controller(
        &self,
        surface: CaptureSurface,
    ) -> SubscriptionController {
        SubscriptionController::new(
            surface,
            &self.settings,
            Arc::clone(&self.backend),
            Arc::clone(&self.notifier),
        )
    }

    pub fn mount_hero(&self) -> CaptureBlock {
        CaptureBlock::new(self.controller(CaptureSurface::Hero))
    }

    pub fn mount_tools_page(&self) -> CaptureBlock {
        CaptureBlock::new(self.controller(CaptureSurface::ToolsPage))
    }

    pub fn mount_modal(&self) -> SubscribeModal {
        SubscribeModal::new(self.controller(CaptureSurface::Modal))
    }
}
