use std::time::Duration;

use crate::{
    CloseReason, Closer, DisplayInfo, HeadlessBackend, NotificationEvent, NotificationHandle,
    NotificationService, NotifyConfig, StackSnapshot,
};

mod scheduler;

/// Height of one slot with the default config (80 + 4 padding).
const SLOT: u32 = 84;

fn test_config() -> NotifyConfig {
    NotifyConfig {
        logging: false,
        display_time_ms: 60_000,
        idle_sweep_secs: 3600,
        ..NotifyConfig::default()
    }
}

/// Primary display tall enough for exactly `slots` notifications.
fn display_fitting(slots: u32) -> DisplayInfo {
    DisplayInfo::full(1920, SLOT * slots)
}

fn start(slots: u32, config: NotifyConfig) -> (HeadlessBackend, NotificationService) {
    let backend = HeadlessBackend::with_display(display_fitting(slots));
    let service = NotificationService::start(backend.clone(), config);
    (backend, service)
}

/// Let the engine drain its queue, animations included.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(500)).await;
}

async fn next_event(handle: &mut NotificationHandle) -> NotificationEvent {
    tokio::time::timeout(Duration::from_secs(600), handle.next_event())
        .await
        .expect("timed out waiting for notification event")
        .expect("notification channel closed")
}

async fn expect_shown(handle: &mut NotificationHandle) -> Closer {
    match next_event(handle).await {
        NotificationEvent::Shown { id, closer } => {
            assert_eq!(id, handle.id());
            closer
        }
        other => panic!("expected show event, got {other:?}"),
    }
}

async fn expect_closed(handle: &mut NotificationHandle) -> CloseReason {
    match next_event(handle).await {
        NotificationEvent::Closed { id, reason } => {
            assert_eq!(id, handle.id());
            reason
        }
        other => panic!("expected close event, got {other:?}"),
    }
}

fn active_ids(snapshot: &StackSnapshot) -> Vec<u64> {
    snapshot.active.iter().map(|&(_, id)| id).collect()
}

/// Every visible window sits exactly on its slot, with no gaps.
fn assert_contiguous(backend: &HeadlessBackend, snapshot: &StackSnapshot) {
    assert!(snapshot.active.len() <= snapshot.layout.max_visible);
    for (slot, &(window, id)) in snapshot.active.iter().enumerate() {
        let state = backend.window(window).expect("active window exists");
        assert!(state.visible, "notification {id} should be visible");
        assert_eq!(
            state.position,
            snapshot.layout.slot_position(slot),
            "notification {id} should occupy slot {slot}"
        );
    }
}
