use super::*;
use crate::{NotificationRequest, NotifyError, SurfaceMessage};

#[tokio::test(start_paused = true)]
async fn test_ids_increase_from_zero() {
    let (_backend, service) = start(5, test_config());
    let notifier = service.notifier();

    let ids: Vec<u64> = (0..3)
        .map(|n| notifier.notify(NotificationRequest::new(format!("n{n}"))).id())
        .collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_shown_notification_is_positioned_and_filled() {
    let (backend, service) = start(5, test_config());
    let notifier = service.notifier();

    let mut handle = notifier.notify(NotificationRequest::new("Deploy").with_text("done"));
    expect_shown(&mut handle).await;
    settle().await;

    let snapshot = notifier.snapshot().await.unwrap();
    assert_eq!(active_ids(&snapshot), vec![0]);
    assert_contiguous(&backend, &snapshot);

    let (window, _) = snapshot.active[0];
    let state = backend.window(window).unwrap();
    match state.messages.last() {
        Some(SurfaceMessage::SetContents(contents)) => {
            assert_eq!(contents.window_id, window);
            assert_eq!(contents.id, 0);
            assert_eq!(contents.request.title, "Deploy");
        }
        other => panic!("expected set-contents, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_closing_top_promotes_backlog() {
    let (backend, service) = start(2, test_config());
    let notifier = service.notifier();

    let mut a = notifier.notify(NotificationRequest::new("A"));
    let mut b = notifier.notify(NotificationRequest::new("B"));
    let mut c = notifier.notify(NotificationRequest::new("C"));

    let close_a = expect_shown(&mut a).await;
    expect_shown(&mut b).await;
    settle().await;

    let snapshot = notifier.snapshot().await.unwrap();
    assert_eq!(snapshot.layout.max_visible, 2);
    assert_eq!(active_ids(&snapshot), vec![0, 1]);
    assert_eq!(snapshot.backlog, 1);
    assert!(c.try_next_event().is_none());
    let window_b = snapshot.active[1].0;

    close_a.close();
    assert_eq!(expect_closed(&mut a).await, CloseReason::ClosedByApi);
    expect_shown(&mut c).await;
    settle().await;

    let snapshot = notifier.snapshot().await.unwrap();
    assert_eq!(active_ids(&snapshot), vec![1, 2]);
    assert_eq!(snapshot.backlog, 0);
    assert_eq!(snapshot.active[0].0, window_b);
    assert_contiguous(&backend, &snapshot);
}

#[tokio::test(start_paused = true)]
async fn test_queue_limit_rejects_31st_request() {
    let (_backend, service) = start(5, test_config());
    let notifier = service.notifier();

    let mut handles: Vec<_> = (0..31)
        .map(|n| notifier.notify(NotificationRequest::new(format!("burst {n}"))))
        .collect();

    let mut rejected = handles.pop().unwrap();
    assert_eq!(rejected.id(), 30);
    match next_event(&mut rejected).await {
        NotificationEvent::Failed { id, error } => {
            assert_eq!(id, 30);
            assert!(matches!(error, NotifyError::QueueFull { limit: 30 }));
            assert_eq!(error.to_string(), "max notification queue size reached: 30");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(rejected.next_event().await.is_none());

    settle().await;
    for (n, handle) in handles.iter_mut().enumerate() {
        match handle.try_next_event() {
            Some(NotificationEvent::Shown { .. }) => assert!(n < 5),
            None => assert!(n >= 5),
            Some(other) => panic!("unexpected event for {n}: {other:?}"),
        }
    }

    let snapshot = notifier.snapshot().await.unwrap();
    assert_eq!(snapshot.active.len(), 5);
    assert_eq!(snapshot.backlog, 25);
    assert_eq!(notifier.waiting(), 25);
}

#[tokio::test(start_paused = true)]
async fn test_admission_reopens_after_backlog_drains() {
    let config = NotifyConfig {
        max_queue_size: 2,
        ..test_config()
    };
    let (_backend, service) = start(1, config);
    let notifier = service.notifier();

    let mut a = notifier.notify(NotificationRequest::new("A"));
    let mut b = notifier.notify(NotificationRequest::new("B"));
    let mut c = notifier.notify(NotificationRequest::new("C"));
    assert!(matches!(
        next_event(&mut c).await,
        NotificationEvent::Failed { .. }
    ));

    let close_a = expect_shown(&mut a).await;
    settle().await;
    assert_eq!(notifier.waiting(), 1);

    let mut d = notifier.notify(NotificationRequest::new("D"));
    close_a.close();
    expect_shown(&mut b).await;
    settle().await;
    assert!(d.try_next_event().is_none());
    assert_eq!(notifier.snapshot().await.unwrap().backlog, 1);
}

#[tokio::test(start_paused = true)]
async fn test_double_close_reports_once() {
    let (backend, service) = start(5, test_config());
    let notifier = service.notifier();

    let mut handle = notifier.notify(NotificationRequest::new("once"));
    let closer = expect_shown(&mut handle).await;

    closer.close();
    closer.close_with(CloseReason::Close);
    assert_eq!(expect_closed(&mut handle).await, CloseReason::ClosedByApi);
    assert!(handle.next_event().await.is_none());

    settle().await;
    let snapshot = notifier.snapshot().await.unwrap();
    assert!(snapshot.active.is_empty());
    assert_eq!(snapshot.pooled, 1);
    assert!(backend.visible_windows().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_auto_dismiss_uses_config_display_time() {
    let config = NotifyConfig {
        display_time_ms: 1_000,
        ..test_config()
    };
    let (backend, service) = start(5, config);
    let notifier = service.notifier();

    let mut handle = notifier.notify(NotificationRequest::new("fleeting"));
    expect_shown(&mut handle).await;
    let shown_at = tokio::time::Instant::now();

    assert_eq!(expect_closed(&mut handle).await, CloseReason::Timeout);
    assert!(shown_at.elapsed() >= Duration::from_millis(1_000));
    settle().await;
    assert!(backend.visible_windows().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_request_display_time_overrides_default() {
    let (_backend, service) = start(5, test_config());
    let notifier = service.notifier();

    let mut short = notifier.notify(NotificationRequest::new("short").with_display_time_ms(200));
    let mut long = notifier.notify(NotificationRequest::new("long"));
    expect_shown(&mut short).await;
    expect_shown(&mut long).await;

    assert_eq!(expect_closed(&mut short).await, CloseReason::Timeout);
    settle().await;
    assert!(long.try_next_event().is_none());
    assert_eq!(active_ids(&notifier.snapshot().await.unwrap()), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn test_restack_keeps_slots_contiguous() {
    let (backend, service) = start(3, test_config());
    let notifier = service.notifier();

    let mut handles: Vec<_> = (0..8)
        .map(|n| notifier.notify(NotificationRequest::new(format!("n{n}"))))
        .collect();
    let mut closers = std::collections::HashMap::new();

    // Close the middle notification each round until everything drained.
    for _ in 0..8 {
        settle().await;
        for handle in handles.iter_mut() {
            if let Some(NotificationEvent::Shown { id, closer }) = handle.try_next_event() {
                closers.insert(id, closer);
            }
        }
        let snapshot = notifier.snapshot().await.unwrap();
        assert_contiguous(&backend, &snapshot);

        let victim = snapshot.active[snapshot.active.len() / 2].1;
        closers[&victim].close();
    }

    settle().await;
    let snapshot = notifier.snapshot().await.unwrap();
    assert!(snapshot.active.is_empty());
    assert_eq!(snapshot.backlog, 0);
}

#[tokio::test(start_paused = true)]
async fn test_closed_windows_are_recycled() {
    let (backend, service) = start(5, test_config());
    let notifier = service.notifier();

    let mut a = notifier.notify(NotificationRequest::new("A"));
    expect_shown(&mut a).await.close();
    expect_closed(&mut a).await;
    settle().await;

    let mut b = notifier.notify(NotificationRequest::new("B"));
    expect_shown(&mut b).await;
    settle().await;

    assert_eq!(backend.created_count(), 1);
    let snapshot = notifier.snapshot().await.unwrap();
    assert_eq!(snapshot.pooled, 0);
    let window = snapshot.active[0].0;
    let messages = backend.window(window).unwrap().messages;
    assert!(messages.contains(&SurfaceMessage::ResetContents));
}

#[tokio::test(start_paused = true)]
async fn test_idle_sweep_destroys_pooled_windows() {
    let config = NotifyConfig {
        idle_sweep_secs: 60,
        ..test_config()
    };
    let (backend, service) = start(5, config);
    let notifier = service.notifier();

    let mut a = notifier.notify(NotificationRequest::new("A"));
    let mut b = notifier.notify(NotificationRequest::new("B"));
    expect_shown(&mut a).await.close();
    expect_shown(&mut b).await.close();
    settle().await;
    assert_eq!(notifier.snapshot().await.unwrap().pooled, 2);

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(notifier.snapshot().await.unwrap().pooled, 0);
    assert_eq!(backend.live_window_count(), 0);
    assert_eq!(backend.destroyed_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_template_failure_drops_request_quietly() {
    let (backend, service) = start(5, test_config());
    backend.fail_next_loads(1);
    let notifier = service.notifier();

    let mut broken = notifier.notify(NotificationRequest::new("broken"));
    let mut fine = notifier.notify(NotificationRequest::new("fine"));

    assert!(broken.next_event().await.is_none());
    expect_shown(&mut fine).await;
    settle().await;

    let snapshot = notifier.snapshot().await.unwrap();
    assert_eq!(active_ids(&snapshot), vec![1]);
    assert_contiguous(&backend, &snapshot);
    assert_eq!(notifier.waiting(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_close_burst_is_coalesced() {
    let (backend, service) = start(2, test_config());
    let notifier = service.notifier();

    let mut a = notifier.notify(NotificationRequest::new("A"));
    let mut b = notifier.notify(NotificationRequest::new("B"));
    let close_a = expect_shown(&mut a).await;
    let close_b = expect_shown(&mut b).await;
    settle().await;

    for _ in 0..300 {
        close_a.close();
    }
    close_b.close();
    let mut c = notifier.notify(NotificationRequest::new("C"));
    settle().await;

    assert_eq!(expect_closed(&mut a).await, CloseReason::ClosedByApi);
    assert!(a.next_event().await.is_none());
    assert_eq!(expect_closed(&mut b).await, CloseReason::ClosedByApi);
    expect_shown(&mut c).await;

    let snapshot = notifier.snapshot().await.unwrap();
    assert_eq!(active_ids(&snapshot), vec![2]);
    assert_eq!(snapshot.pending_actions, 0);
    assert_eq!(snapshot.pending_closes, 0);
    assert_contiguous(&backend, &snapshot);
}

#[tokio::test(start_paused = true)]
async fn test_late_closes_leave_no_bookkeeping() {
    let (_backend, service) = start(5, test_config());
    let notifier = service.notifier();

    for n in 0..40 {
        let mut handle = notifier.notify(NotificationRequest::new(format!("n{n}")));
        let closer = expect_shown(&mut handle).await;
        closer.close();
        expect_closed(&mut handle).await;
        closer.close();
    }
    settle().await;

    let snapshot = notifier.snapshot().await.unwrap();
    assert!(snapshot.active.is_empty());
    assert_eq!(snapshot.pending_closes, 0);
}

#[tokio::test(start_paused = true)]
async fn test_backlog_head_is_not_overtaken() {
    let (_backend, service) = start(1, test_config());
    let notifier = service.notifier();

    let mut a = notifier.notify(NotificationRequest::new("A"));
    let mut b = notifier.notify(NotificationRequest::new("B"));
    let close_a = expect_shown(&mut a).await;
    settle().await;
    assert_eq!(notifier.snapshot().await.unwrap().backlog, 1);

    // C is admitted in the same burst as the close that frees the slot.
    close_a.close();
    let mut c = notifier.notify(NotificationRequest::new("C"));

    assert_eq!(expect_closed(&mut a).await, CloseReason::ClosedByApi);
    expect_shown(&mut b).await;
    settle().await;
    assert!(c.try_next_event().is_none());

    let snapshot = notifier.snapshot().await.unwrap();
    assert_eq!(active_ids(&snapshot), vec![1]);
    assert_eq!(snapshot.backlog, 1);
}
