use std::sync::Arc;

use notify_stack::{HeadlessBackend, Notifier};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::HostConfig;

/// Host state shared by the command reader and the event forwarders.
#[derive(Clone)]
pub struct HostState {
    inner: Arc<HostStateInner>,
}

struct HostStateInner {
    notifier: Notifier,
    backend: HeadlessBackend,
    /// Serialized JSON lines waiting for the stdout writer
    output: mpsc::UnboundedSender<String>,
    config: HostConfig,
    shutdown: CancellationToken,
}

impl HostState {
    pub fn new(
        notifier: Notifier,
        backend: HeadlessBackend,
        output: mpsc::UnboundedSender<String>,
        config: HostConfig,
    ) -> Self {
        Self {
            inner: Arc::new(HostStateInner {
                notifier,
                backend,
                output,
                config,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    pub fn backend(&self) -> &HeadlessBackend {
        &self.inner.backend
    }

    pub fn config(&self) -> &HostConfig {
        &self.inner.config
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown
    }

    /// Queue one JSON line for stdout.
    pub fn emit<T: Serialize>(&self, event: &T) {
        match serde_json::to_string(event) {
            Ok(line) => {
                if self.inner.output.send(line).is_err() {
                    tracing::debug!("Output closed, event dropped");
                }
            }
            Err(e) => tracing::error!("Failed to serialize host event: {e}"),
        }
    }
}
