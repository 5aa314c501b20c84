//! Recycling pool of notification windows.

use crate::backend::{BackendError, WindowBackend, WindowId, WindowSpec};
use crate::config::NotifyConfig;
use crate::types::SurfaceMessage;

/// Inactive windows waiting to be reused.
///
/// Windows are created lazily on demand, hidden and returned here on close,
/// and destroyed in bulk by the periodic idle sweep.
#[derive(Debug, Default)]
pub struct WindowPool {
    inactive: Vec<WindowId>,
}

impl WindowPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lend a window, reusing an inactive one when possible.
    ///
    /// A new window is returned only once its template has loaded and the
    /// config has been pushed to it.
    pub async fn acquire<B: WindowBackend>(
        &mut self,
        backend: &B,
        config: &NotifyConfig,
    ) -> Result<WindowId, BackendError> {
        if let Some(window) = self.inactive.pop() {
            tracing::debug!(window = %window, "Reusing pooled notification window");
            return Ok(window);
        }

        let window = backend
            .create_window(WindowSpec::for_notification(config))
            .await?;
        backend.send(window, SurfaceMessage::LoadConfig(config.clone()))?;
        tracing::debug!(window = %window, "Created notification window");
        Ok(window)
    }

    /// Hide a window and keep it for reuse.
    pub fn release<B: WindowBackend>(&mut self, backend: &B, window: WindowId) {
        if let Err(e) = backend.hide(window) {
            tracing::warn!(window = %window, error = %e, "Failed to hide notification window");
        }
        self.inactive.push(window);
    }

    /// Destroy every inactive window. Returns how many were destroyed.
    pub fn sweep_idle<B: WindowBackend>(&mut self, backend: &B) -> usize {
        let count = self.inactive.len();
        for window in self.inactive.drain(..) {
            if let Err(e) = backend.destroy(window) {
                tracing::warn!(window = %window, error = %e, "Failed to destroy idle window");
            }
        }
        if count > 0 {
            tracing::debug!(count, "Idle notification windows destroyed");
        }
        count
    }

    pub fn len(&self) -> usize {
        self.inactive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inactive.is_empty()
    }
}
