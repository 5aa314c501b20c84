//! In-memory window backend.
//!
//! Keeps every surface as plain state (position, visibility, received
//! messages) instead of drawing it. Used by the headless host and by tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::backend::{BackendError, WindowBackend, WindowId, WindowSpec};
use crate::geometry::{DisplayInfo, Point, Rect};
use crate::types::SurfaceMessage;

/// Recorded state of one headless surface.
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    pub spec: WindowSpec,
    pub position: Point,
    pub visible: bool,
    pub messages: Vec<SurfaceMessage>,
    pub position_history: Vec<Point>,
}

#[derive(Debug)]
struct HeadlessState {
    display: DisplayInfo,
    next_id: u32,
    created: usize,
    destroyed: usize,
    failing_loads: usize,
    load_delay: Duration,
    windows: BTreeMap<WindowId, HeadlessWindow>,
}

/// Thread-safe headless window system.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    inner: Arc<Mutex<HeadlessState>>,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::with_display(DisplayInfo::new(
            Rect::new(0, 0, 1920, 1080),
            Rect::new(0, 0, 1920, 1040),
        ))
    }
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display(display: DisplayInfo) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HeadlessState {
                display,
                next_id: 1,
                created: 0,
                destroyed: 0,
                failing_loads: 0,
                load_delay: Duration::ZERO,
                windows: BTreeMap::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, HeadlessState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the primary display, as a monitor reconfiguration would.
    pub fn set_display(&self, display: DisplayInfo) {
        self.state().display = display;
    }

    /// Simulated template load time for new windows.
    pub fn set_load_delay(&self, delay: Duration) {
        self.state().load_delay = delay;
    }

    /// Make the next `count` template loads fail.
    pub fn fail_next_loads(&self, count: usize) {
        self.state().failing_loads = count;
    }

    pub fn window(&self, window: WindowId) -> Option<HeadlessWindow> {
        self.state().windows.get(&window).cloned()
    }

    pub fn visible_windows(&self) -> Vec<WindowId> {
        self.state()
            .windows
            .iter()
            .filter(|(_, w)| w.visible)
            .map(|(&id, _)| id)
            .collect()
    }

    pub fn live_window_count(&self) -> usize {
        self.state().windows.len()
    }

    pub fn created_count(&self) -> usize {
        self.state().created
    }

    pub fn destroyed_count(&self) -> usize {
        self.state().destroyed
    }

    pub fn clear_position_history(&self) {
        for window in self.state().windows.values_mut() {
            window.position_history.clear();
        }
    }

    fn with_window<R>(
        &self,
        window: WindowId,
        f: impl FnOnce(&mut HeadlessWindow) -> R,
    ) -> Result<R, BackendError> {
        let mut state = self.state();
        let entry = state
            .windows
            .get_mut(&window)
            .ok_or(BackendError::UnknownWindow(window))?;
        Ok(f(entry))
    }
}

impl WindowBackend for HeadlessBackend {
    fn primary_display(&self) -> DisplayInfo {
        self.state().display
    }

    async fn create_window(&self, spec: WindowSpec) -> Result<WindowId, BackendError> {
        let delay = self.state().load_delay;
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state();
        if state.failing_loads > 0 {
            state.failing_loads -= 1;
            return Err(BackendError::TemplateLoad {
                url: spec.template_url,
                reason: "simulated load failure".into(),
            });
        }

        let id = WindowId(state.next_id);
        state.next_id += 1;
        state.created += 1;
        state.windows.insert(
            id,
            HeadlessWindow {
                spec,
                position: Point::default(),
                visible: false,
                messages: Vec::new(),
                position_history: Vec::new(),
            },
        );
        tracing::debug!(window = %id, "Headless window loaded");
        Ok(id)
    }

    fn set_position(&self, window: WindowId, position: Point) -> Result<(), BackendError> {
        self.with_window(window, |w| {
            w.position = position;
            w.position_history.push(position);
        })
    }

    fn position(&self, window: WindowId) -> Result<Point, BackendError> {
        self.with_window(window, |w| w.position)
    }

    fn show_inactive(&self, window: WindowId) -> Result<(), BackendError> {
        self.with_window(window, |w| w.visible = true)
    }

    fn hide(&self, window: WindowId) -> Result<(), BackendError> {
        self.with_window(window, |w| w.visible = false)
    }

    fn destroy(&self, window: WindowId) -> Result<(), BackendError> {
        let mut state = self.state();
        state
            .windows
            .remove(&window)
            .ok_or(BackendError::UnknownWindow(window))?;
        state.destroyed += 1;
        Ok(())
    }

    fn send(&self, window: WindowId, message: SurfaceMessage) -> Result<(), BackendError> {
        self.with_window(window, |w| w.messages.push(message))
    }
}
