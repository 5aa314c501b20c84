//! Corner-anchored notification stack.
//!
//! Queues, positions, animates and recycles small overlay windows stacked
//! from one corner of the primary display. All mutations of the visible
//! stack run through a single ordered action queue owned by the engine task;
//! callers talk to it through the cloneable [`Notifier`] handle.

pub mod action_queue;
pub mod animator;
pub mod backend;
pub mod config;
pub mod geometry;
pub mod headless;
pub mod notifier;
pub mod pool;
mod scheduler;
pub mod types;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use backend::{BackendError, WindowBackend, WindowId, WindowSpec};
pub use config::{Corner, NotifyConfig};
pub use geometry::{DisplayInfo, Layout, Point, Rect};
pub use headless::HeadlessBackend;
pub use notifier::{NotificationHandle, NotificationService, Notifier};
pub use types::{
    CloseReason, Closer, DisplayEvent, NotificationEvent, NotificationId, NotificationRequest,
    SignalKind, StackSnapshot, SurfaceMessage, SurfaceSignal,
};

/// Maximum number of admitted notifications waiting for a free slot.
pub const MAX_QUEUE_SIZE: usize = 30;

/// Hard ceiling on simultaneously visible notifications, whatever the screen size.
pub const MAX_VISIBLE_CEILING: usize = 5;

/// Errors reported by the notification stack.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("max notification queue size reached: {limit}")]
    QueueFull { limit: usize },

    #[error("notification engine is not running")]
    EngineStopped,

    #[error("window backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Result type alias for notification stack operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
