use claims::assert_matches;
use subscription_capture::controller::SubmitOutcome;
use subscription_capture::domain::AttemptId;
use subscription_capture::domain::SubscriptionState;
use subscription_capture::notification::NotificationKind;
use subscription_capture::surfaces::CaptureSurface;
use subscription_capture::surfaces::View;
use tokio::time::sleep;

use crate::helpers::spawn_site;
use crate::helpers::SUBMIT_DELAY;
use crate::helpers::TICK;

#[tokio::test(start_paused = true)]
async fn valid_address_succeeds_after_delay() {
    let mut app = spawn_site();
    let hero = app.site.mount_hero();

    hero.update_input("user@example.com").unwrap();
    assert_eq!(hero.submit(), Ok(SubmitOutcome::Accepted(AttemptId::first())));
    assert_eq!(hero.view(), View::Spinner);
    assert_eq!(hero.controller().input(), "");

    sleep(SUBMIT_DELAY - TICK).await;
    assert_eq!(hero.controller().state(), SubscriptionState::Submitting);
    assert!(app.drain_notifications().is_empty());

    sleep(TICK * 2).await;
    assert_eq!(hero.controller().state(), SubscriptionState::Succeeded);
    assert_eq!(hero.view(), View::Success);
    assert_eq!(hero.controller().input(), "");
    assert_eq!(app.drain_notifications(), vec![NotificationKind::Success]);

    // blocks never go back on their own
    sleep(SUBMIT_DELAY * 100).await;
    assert_eq!(hero.view(), View::Success);
}

#[tokio::test(start_paused = true)]
async fn invalid_address_never_leaves_idle() {
    let mut app = spawn_site();
    let tools = app.site.mount_tools_page();

    for input in ["not-an-email", "", "   ", "john@localhost", "john doe@foo.com"] {
        tools.update_input(input).unwrap();
        assert_matches!(tools.submit(), Ok(SubmitOutcome::Rejected(_)));
        assert_eq!(tools.view(), View::Form, "{input:?}");
        // kept, so it can be corrected
        assert_eq!(tools.controller().input(), input);
    }

    sleep(SUBMIT_DELAY * 2).await;
    assert_eq!(tools.controller().state(), SubscriptionState::Idle);
    assert_eq!(app.drain_notifications(), vec![NotificationKind::Rejected; 5]);
}

#[tokio::test(start_paused = true)]
async fn submits_while_submitting_are_dropped() {
    let mut app = spawn_site();
    let hero = app.site.mount_hero();

    hero.update_input("user@example.com").unwrap();
    assert_matches!(hero.submit(), Ok(SubmitOutcome::Accepted(_)));

    // the field was cleared, the user types again and hammers the button
    hero.update_input("other@example.com").unwrap();
    for _ in 0..3 {
        assert_eq!(hero.submit(), Ok(SubmitOutcome::Ignored));
        assert_eq!(hero.view(), View::Spinner);
    }

    sleep(SUBMIT_DELAY * 3).await;
    assert_eq!(hero.controller().state(), SubscriptionState::Succeeded);
    // exactly one completion was scheduled
    assert_eq!(app.drain_notifications(), vec![NotificationKind::Success]);
    assert_eq!(hero.controller().input(), "other@example.com");

    // and nothing new is accepted once succeeded
    assert_eq!(hero.submit(), Ok(SubmitOutcome::Ignored));
}

#[tokio::test(start_paused = true)]
async fn surfaces_do_not_share_state() {
    let mut app = spawn_site();
    let hero = app.site.mount_hero();
    let tools = app.site.mount_tools_page();
    assert_eq!(hero.surface(), CaptureSurface::Hero);
    assert_eq!(tools.surface(), CaptureSurface::ToolsPage);

    hero.update_input("user@example.com").unwrap();
    tools.update_input("half-typed").unwrap();
    hero.submit().unwrap();

    assert_eq!(hero.view(), View::Spinner);
    assert_eq!(tools.view(), View::Form);
    assert_eq!(tools.controller().input(), "half-typed");

    sleep(SUBMIT_DELAY + TICK).await;
    assert_eq!(hero.view(), View::Success);
    assert_eq!(tools.view(), View::Form);

    // each surface numbers its own attempts
    tools.update_input("other@example.com").unwrap();
    assert_eq!(tools.submit(), Ok(SubmitOutcome::Accepted(AttemptId::first())));
    assert_eq!(app.drain_notifications(), vec![NotificationKind::Success]);
}

#[tokio::test(start_paused = true)]
async fn state_changes_are_published() {
    let app = spawn_site();
    let hero = app.site.mount_hero();
    let mut rx = hero.controller().subscribe();

    hero.update_input("user@example.com").unwrap();
    hero.submit().unwrap();

    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), SubscriptionState::Submitting);
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), SubscriptionState::Succeeded);
}

#[tokio::test(start_paused = true)]
async fn settled_waits_for_completion() {
    let app = spawn_site();
    let hero = app.site.mount_hero();

    hero.update_input("user@example.com").unwrap();
    hero.submit().unwrap();

    let start = tokio::time::Instant::now();
    assert_eq!(hero.controller().settled().await, SubscriptionState::Succeeded);
    assert!(start.elapsed() >= SUBMIT_DELAY);
}
