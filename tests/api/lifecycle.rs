use std::sync::Arc;

use claims::assert_err;
use claims::assert_matches;
use subscription_capture::controller::ControllerError;
use subscription_capture::controller::SubmitOutcome;
use subscription_capture::controller::SubscriptionController;
use subscription_capture::domain::AttemptId;
use subscription_capture::domain::SubscriptionState;
use subscription_capture::notification::ChannelNotifier;
use subscription_capture::notification::NotificationKind;
use subscription_capture::surfaces::CaptureSurface;
use subscription_capture::surfaces::View;
use tokio::time::sleep;

use crate::helpers::spawn_site_with_backend;
use crate::helpers::test_settings;
use crate::helpers::FlakyBackend;
use crate::helpers::GRACE;
use crate::helpers::SUBMIT_DELAY;
use crate::helpers::TICK;

#[tokio::test(start_paused = true)]
async fn completion_after_unmount_is_discarded() {
    let (notifier, mut notifications) = ChannelNotifier::new();
    let controller = SubscriptionController::simulated(
        CaptureSurface::Hero,
        &test_settings(),
        Arc::new(notifier),
    );

    controller.update_input("user@example.com").unwrap();
    controller.submit().unwrap();
    sleep(SUBMIT_DELAY / 2).await;
    controller.unmount();

    sleep(SUBMIT_DELAY * 2).await;
    assert_eq!(controller.state(), SubscriptionState::Submitting);
    assert_err!(notifications.try_recv());
    assert_eq!(controller.submit(), Err(ControllerError::Unmounted));
}

#[tokio::test(start_paused = true)]
async fn dropping_a_surface_unmounts_it() {
    let mut app = spawn_site_with_backend(Arc::new(FlakyBackend::new(0)));
    let hero = app.site.mount_hero();
    let mut rx = hero.controller().subscribe();

    hero.update_input("user@example.com").unwrap();
    hero.submit().unwrap();
    rx.changed().await.unwrap();
    drop(hero);

    sleep(SUBMIT_DELAY * 2).await;
    assert!(app.drain_notifications().is_empty());
    // the sender went away with the controller
    assert_err!(rx.changed().await);
}

#[tokio::test(start_paused = true)]
async fn backend_failure_then_retry() {
    let mut app = spawn_site_with_backend(Arc::new(FlakyBackend::new(1)));
    let hero = app.site.mount_hero();

    hero.update_input("user@example.com").unwrap();
    hero.submit().unwrap();
    let state = hero.controller().settled().await;
    assert_matches!(state, SubscriptionState::Failed(_));
    assert_matches!(hero.view(), View::Retry(reason) if reason.contains("mailing list is down"));
    assert_eq!(app.drain_notifications(), vec![NotificationKind::Failed]);
    // the field was cleared on acceptance and stays cleared
    assert_eq!(hero.controller().input(), "");

    // rejection from `Failed` leaves it `Failed`
    hero.update_input("nope").unwrap();
    assert_matches!(hero.submit(), Ok(SubmitOutcome::Rejected(_)));
    assert_matches!(hero.controller().state(), SubscriptionState::Failed(_));

    hero.update_input("user@example.com").unwrap();
    assert_eq!(
        hero.submit(),
        Ok(SubmitOutcome::Accepted(AttemptId::first().next()))
    );
    assert_eq!(hero.controller().settled().await, SubscriptionState::Succeeded);
    assert_eq!(
        app.drain_notifications(),
        vec![NotificationKind::Rejected, NotificationKind::Success]
    );
}

#[tokio::test(start_paused = true)]
async fn failed_modal_resets_after_grace() {
    let app = spawn_site_with_backend(Arc::new(FlakyBackend::new(1)));
    let mut modal = app.site.mount_modal();
    modal.open();

    modal.update_input("user@example.com").unwrap();
    modal.submit().unwrap();
    sleep(SUBMIT_DELAY + TICK).await;
    assert_matches!(modal.view(), View::Retry(_));

    modal.dismiss().unwrap();
    sleep(GRACE + TICK).await;
    assert_eq!(modal.controller().state(), SubscriptionState::Idle);
}
