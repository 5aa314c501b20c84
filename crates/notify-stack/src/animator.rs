//! Re-stacking animation after a notification closes.

use futures::future::join_all;
use tokio::time::sleep;

use crate::backend::{WindowBackend, WindowId};
use crate::config::AnimationSettings;
use crate::geometry::{Layout, Point};

/// Slide every window from slot `from` onward to its slot position.
///
/// Called after the window at `from` was removed from `active`, so each
/// remaining window moves one slot towards the anchor. Resolves once every
/// affected window reached its target.
pub async fn move_one_down<B: WindowBackend>(
    backend: &B,
    layout: &Layout,
    active: &[WindowId],
    from: usize,
    animation: AnimationSettings,
) {
    if from >= active.len() {
        return;
    }

    let moves = active
        .iter()
        .enumerate()
        .skip(from)
        .map(|(slot, &window)| (window, layout.slot_y(slot)));

    if animation.parallel {
        join_all(moves.map(|(window, target_y)| {
            animate_window(backend, window, layout.first_pos.x, target_y, animation)
        }))
        .await;
    } else {
        for (window, target_y) in moves {
            animate_window(backend, window, layout.first_pos.x, target_y, animation).await;
        }
    }
}

/// Move one window vertically in `steps` ticks, landing exactly on `target_y`.
async fn animate_window<B: WindowBackend>(
    backend: &B,
    window: WindowId,
    x: i32,
    target_y: i32,
    animation: AnimationSettings,
) {
    let start_y = match backend.position(window) {
        Ok(position) => position.y,
        Err(e) => {
            tracing::warn!(window = %window, error = %e, "Cannot animate window");
            return;
        }
    };

    let steps = animation.steps.max(1);
    let step = f64::from(target_y - start_y) / f64::from(steps);

    for current in 1..=steps {
        sleep(animation.step_interval).await;
        // Intermediate positions are truncated; the last tick snaps.
        let y = if current == steps {
            target_y
        } else {
            (f64::from(start_y) + step * f64::from(current)) as i32
        };
        if let Err(e) = backend.set_position(window, Point::new(x, y)) {
            tracing::warn!(window = %window, error = %e, "Window vanished mid-animation");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::NotifyConfig;
    use crate::geometry::DisplayInfo;
    use crate::headless::HeadlessBackend;
    use crate::pool::WindowPool;

    fn settings(parallel: bool) -> AnimationSettings {
        AnimationSettings {
            steps: 5,
            step_interval: Duration::from_millis(5),
            parallel,
        }
    }

    async fn windows_at(
        backend: &HeadlessBackend,
        layout: &Layout,
        slots: &[usize],
    ) -> Vec<WindowId> {
        let config = NotifyConfig {
            logging: false,
            ..NotifyConfig::default()
        };
        let mut pool = WindowPool::new();
        let mut windows = Vec::new();
        for &slot in slots {
            let window = pool.acquire(backend, &config).await.unwrap();
            backend
                .set_position(window, layout.slot_position(slot))
                .unwrap();
            windows.push(window);
        }
        windows
    }

    #[tokio::test(start_paused = true)]
    async fn test_moves_windows_into_contiguous_slots() {
        let backend = HeadlessBackend::new();
        let layout = Layout::compute(&NotifyConfig::default(), &DisplayInfo::full(1920, 1080));
        // Slot 0 was vacated: the windows still sit at slots 1 and 2.
        let active = windows_at(&backend, &layout, &[1, 2]).await;
        backend.clear_position_history();

        move_one_down(&backend, &layout, &active, 0, settings(true)).await;

        assert_eq!(backend.position(active[0]).unwrap(), layout.slot_position(0));
        assert_eq!(backend.position(active[1]).unwrap(), layout.slot_position(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_steps_truncate_and_snap_to_target() {
        let backend = HeadlessBackend::new();
        let config = NotifyConfig {
            height: 50,
            padding: 3,
            ..NotifyConfig::default()
        };
        let layout = Layout::compute(&config, &DisplayInfo::full(1920, 1080));
        let active = windows_at(&backend, &layout, &[1]).await;
        backend.clear_position_history();

        move_one_down(&backend, &layout, &active, 0, settings(true)).await;

        // 53px over 5 steps: 10.6 per tick, truncated.
        let ys: Vec<i32> = backend
            .window(active[0])
            .unwrap()
            .position_history
            .iter()
            .map(|p| p.y)
            .collect();
        assert_eq!(ys, vec![42, 31, 21, 10, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_animation_takes_longer() {
        let backend = HeadlessBackend::new();
        let layout = Layout::compute(&NotifyConfig::default(), &DisplayInfo::full(1920, 1080));
        let active = windows_at(&backend, &layout, &[1, 2, 3]).await;

        let started = tokio::time::Instant::now();
        move_one_down(&backend, &layout, &active, 0, settings(false)).await;
        assert!(started.elapsed() >= Duration::from_millis(75));
        assert_eq!(backend.position(active[2]).unwrap(), layout.slot_position(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_start_is_noop() {
        let backend = HeadlessBackend::new();
        let layout = Layout::compute(&NotifyConfig::default(), &DisplayInfo::full(1920, 1080));
        let active = windows_at(&backend, &layout, &[0]).await;
        backend.clear_position_history();

        move_one_down(&backend, &layout, &active, 1, settings(true)).await;
        move_one_down(&backend, &layout, &[], 0, settings(true)).await;

        assert!(backend.window(active[0]).unwrap().position_history.is_empty());
    }
}
