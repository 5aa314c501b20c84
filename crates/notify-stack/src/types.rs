//! Notification type definitions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::NotifyError;
use crate::backend::WindowId;
use crate::config::NotifyConfig;
use crate::geometry::Layout;
use crate::scheduler::Inbound;

/// Identifier assigned to every notification at admission, counting from 0.
pub type NotificationId = u64;

/// A notification to be displayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Accent color for the notification body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Ask the surface to blink until the notification is closed.
    #[serde(default)]
    pub flash: bool,
    /// Overrides the configured display time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_time_ms: Option<u64>,
    /// Any other display fields, forwarded verbatim to the surface.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NotificationRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_flash(mut self, flash: bool) -> Self {
        self.flash = flash;
        self
    }

    pub fn with_display_time_ms(mut self, ms: u64) -> Self {
        self.display_time_ms = Some(ms);
        self
    }
}

/// Why a notification was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseReason {
    #[serde(rename = "timeout")]
    Timeout,
    #[serde(rename = "closedByAPI")]
    ClosedByApi,
    /// Close button on the surface.
    #[serde(rename = "close")]
    Close,
    #[serde(rename = "close-all")]
    CloseAll,
}

impl CloseReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::ClosedByApi => "closedByAPI",
            Self::Close => "close",
            Self::CloseAll => "close-all",
        }
    }
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closes one specific notification.
///
/// The close is submitted to the action queue, so it never interrupts an
/// animation that is already running.
#[derive(Debug, Clone)]
pub struct Closer {
    id: NotificationId,
    inbox: mpsc::UnboundedSender<Inbound>,
}

impl Closer {
    pub(crate) fn new(id: NotificationId, inbox: mpsc::UnboundedSender<Inbound>) -> Self {
        Self { id, inbox }
    }

    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Close with reason `closedByAPI`.
    pub fn close(&self) {
        self.close_with(CloseReason::ClosedByApi);
    }

    pub fn close_with(&self, reason: CloseReason) {
        if self
            .inbox
            .send(Inbound::Close {
                id: self.id,
                reason,
            })
            .is_err()
        {
            tracing::debug!(id = self.id, "Close requested after engine stopped");
        }
    }
}

/// Lifecycle event of a single notification.
///
/// Each kind is delivered at most once per notification.
#[derive(Debug)]
pub enum NotificationEvent {
    Shown { id: NotificationId, closer: Closer },
    Clicked { id: NotificationId, closer: Closer },
    Closed { id: NotificationId, reason: CloseReason },
    Failed { id: NotificationId, error: NotifyError },
}

impl NotificationEvent {
    pub fn id(&self) -> NotificationId {
        match self {
            Self::Shown { id, .. }
            | Self::Clicked { id, .. }
            | Self::Closed { id, .. }
            | Self::Failed { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Shown { .. } => "show",
            Self::Clicked { .. } => "click",
            Self::Closed { .. } => "close",
            Self::Failed { .. } => "error",
        }
    }

    fn flag(&self) -> u8 {
        match self {
            Self::Shown { .. } => 1,
            Self::Clicked { .. } => 1 << 1,
            Self::Closed { .. } => 1 << 2,
            Self::Failed { .. } => 1 << 3,
        }
    }
}

/// Per-notification event sender enforcing at-most-once delivery per kind.
#[derive(Debug)]
pub(crate) struct EventSink {
    tx: mpsc::UnboundedSender<NotificationEvent>,
    delivered: u8,
}

impl EventSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<NotificationEvent>) -> Self {
        Self { tx, delivered: 0 }
    }

    /// Returns false when this kind was already delivered or nobody listens.
    pub(crate) fn deliver(&mut self, event: NotificationEvent) -> bool {
        let flag = event.flag();
        if self.delivered & flag != 0 {
            return false;
        }
        self.delivered |= flag;
        self.tx.send(event).is_ok()
    }
}

/// Message pushed from the scheduler to a notification surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum SurfaceMessage {
    SetContents(SurfaceContents),
    ResetContents,
    LoadConfig(NotifyConfig),
}

/// Payload of `set-contents`: the request plus the pairing the surface must
/// echo back in its signals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceContents {
    pub window_id: WindowId,
    pub id: NotificationId,
    #[serde(flatten)]
    pub request: NotificationRequest,
}

/// Signal raised by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Close,
    Click,
}

/// Signal from a surface back to the scheduler, identified by the window and
/// the notification it was displaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceSignal {
    pub kind: SignalKind,
    pub window_id: WindowId,
    pub notification_id: NotificationId,
}

/// Display topology change reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayEvent {
    Added,
    Removed,
    MetricsChanged,
}

/// Point-in-time view of the stack, for status reporting and tests.
#[derive(Debug, Clone, Serialize)]
pub struct StackSnapshot {
    pub layout: Layout,
    /// Visible notifications in slot order.
    pub active: Vec<(WindowId, NotificationId)>,
    pub backlog: usize,
    pub pooled: usize,
    pub pending_actions: usize,
    /// Notifications with a close queued but not yet run.
    pub pending_closes: usize,
}
