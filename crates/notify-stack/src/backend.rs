//! Window system capability used by the notification stack.
//!
//! The scheduler never talks to a concrete toolkit: it creates, moves,
//! shows and destroys surfaces through [`WindowBackend`], and pushes content
//! to them as [`SurfaceMessage`]s.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::config::NotifyConfig;
use crate::geometry::{DisplayInfo, Point};
use crate::types::SurfaceMessage;

/// Opaque handle of a notification surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u32);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Properties of a new notification surface.
///
/// Built fresh for every window from the current config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowSpec {
    pub width: u32,
    pub height: u32,
    pub always_on_top: bool,
    pub skip_taskbar: bool,
    pub resizable: bool,
    pub frame: bool,
    pub transparent: bool,
    /// Showing the window must never steal keyboard focus.
    pub focusable: bool,
    pub accept_first_mouse: bool,
    pub visible_on_all_workspaces: bool,
    pub template_url: String,
}

impl WindowSpec {
    pub fn for_notification(config: &NotifyConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            always_on_top: true,
            skip_taskbar: true,
            resizable: false,
            frame: false,
            transparent: true,
            focusable: false,
            accept_first_mouse: true,
            visible_on_all_workspaces: true,
            template_url: config.template_url(),
        }
    }
}

/// Errors reported by a window backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("template failed to load from {url}: {reason}")]
    TemplateLoad { url: String, reason: String },

    #[error("unknown window {0}")]
    UnknownWindow(WindowId),

    #[error("window system unavailable: {0}")]
    Unavailable(String),
}

/// Windowing and display capability.
pub trait WindowBackend: Send + Sync + 'static {
    /// Current geometry of the primary display.
    fn primary_display(&self) -> DisplayInfo;

    /// Create a hidden surface and load the template into it.
    ///
    /// Must resolve only after the template reported that it finished
    /// loading; content sent earlier may be lost.
    fn create_window(
        &self,
        spec: WindowSpec,
    ) -> impl Future<Output = Result<WindowId, BackendError>> + Send;

    fn set_position(&self, window: WindowId, position: Point) -> Result<(), BackendError>;

    fn position(&self, window: WindowId) -> Result<Point, BackendError>;

    /// Make the window visible without activating it.
    fn show_inactive(&self, window: WindowId) -> Result<(), BackendError>;

    fn hide(&self, window: WindowId) -> Result<(), BackendError>;

    fn destroy(&self, window: WindowId) -> Result<(), BackendError>;

    /// Deliver a message to the surface's content.
    fn send(&self, window: WindowId, message: SurfaceMessage) -> Result<(), BackendError>;
}
