//! Public entry points: service lifecycle and the notifier handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::backend::WindowBackend;
use crate::config::NotifyConfig;
use crate::scheduler::{Engine, Inbound, PendingNotification};
use crate::types::{
    DisplayEvent, EventSink, NotificationEvent, NotificationId, NotificationRequest,
    StackSnapshot, SurfaceSignal,
};
use crate::{NotifyError, Result};

/// Running notification engine.
///
/// Owns the engine task; dropping the service without calling
/// [`NotificationService::shutdown`] leaves the task running until every
/// [`Notifier`] is gone and the runtime stops.
pub struct NotificationService {
    notifier: Notifier,
    task: JoinHandle<()>,
}

impl NotificationService {
    /// Compute the initial geometry and start the engine task.
    ///
    /// Call once the host application is ready and the primary display can
    /// be queried. Display changes are reported through
    /// [`Notifier::display_changed`].
    pub fn start<B: WindowBackend>(backend: B, config: NotifyConfig) -> Self {
        let (inbox_tx, inbox) = mpsc::unbounded_channel();
        let waiting = Arc::new(AtomicUsize::new(0));
        let shutdown = CancellationToken::new();

        let notifier = Notifier {
            inbox: inbox_tx.clone(),
            shared: Arc::new(NotifierShared {
                next_id: AtomicU64::new(0),
                waiting: Arc::clone(&waiting),
                max_queue_size: config.max_queue_size,
                shutdown: shutdown.clone(),
            }),
        };

        let engine = Engine::new(backend, config, inbox, inbox_tx, waiting, shutdown);
        let task = tokio::spawn(engine.run());
        tracing::info!("Notification engine started");

        Self { notifier, task }
    }

    pub fn notifier(&self) -> Notifier {
        self.notifier.clone()
    }

    /// Stop the engine, closing every notification with `close-all`.
    pub async fn shutdown(self) {
        self.notifier.shared.shutdown.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Notification engine task failed");
        }
    }
}

struct NotifierShared {
    next_id: AtomicU64,
    waiting: Arc<AtomicUsize>,
    max_queue_size: usize,
    shutdown: CancellationToken,
}

/// Cloneable handle for submitting notifications and host events.
#[derive(Clone)]
pub struct Notifier {
    inbox: mpsc::UnboundedSender<Inbound>,
    shared: Arc<NotifierShared>,
}

impl Notifier {
    /// Admit a notification and return immediately.
    ///
    /// When too many notifications are already waiting for a slot the
    /// request is dropped and its handle yields a single `Failed` event.
    pub fn notify(&self, request: NotificationRequest) -> NotificationHandle {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, events) = mpsc::unbounded_channel();
        let mut sink = EventSink::new(tx);
        let handle = NotificationHandle { id, events };

        if self.shared.shutdown.is_cancelled() {
            sink.deliver(NotificationEvent::Failed {
                id,
                error: NotifyError::EngineStopped,
            });
            return handle;
        }

        let limit = self.shared.max_queue_size;
        let admitted = self
            .shared
            .waiting
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < limit).then_some(n + 1)
            })
            .is_ok();
        if !admitted {
            tracing::warn!(id, limit, "Notification queue full, request rejected");
            sink.deliver(NotificationEvent::Failed {
                id,
                error: NotifyError::QueueFull { limit },
            });
            return handle;
        }

        let pending = PendingNotification { id, request, sink };
        if let Err(mpsc::error::SendError(msg)) = self.inbox.send(Inbound::Show(pending)) {
            self.shared.waiting.fetch_sub(1, Ordering::AcqRel);
            if let Inbound::Show(mut pending) = msg {
                pending.sink.deliver(NotificationEvent::Failed {
                    id,
                    error: NotifyError::EngineStopped,
                });
            }
        }
        handle
    }

    /// Dismiss every visible notification, drop everything still waiting
    /// and destroy all pooled windows.
    pub fn close_all(&self) -> Result<()> {
        self.send(Inbound::CloseAll)
    }

    /// Report a display added, removed or changed. Visible notifications
    /// are closed with `close-all` and the geometry is recomputed.
    pub fn display_changed(&self, event: DisplayEvent) -> Result<()> {
        self.send(Inbound::Display(event))
    }

    /// Forward a click or close raised by a surface.
    pub fn surface_signal(&self, signal: SurfaceSignal) -> Result<()> {
        self.send(Inbound::Signal(signal))
    }

    /// Current state of the stack, taken between two actions.
    pub async fn snapshot(&self) -> Result<StackSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(Inbound::Snapshot(tx))?;
        rx.await.map_err(|_| NotifyError::EngineStopped)
    }

    /// Number of admitted notifications not on screen yet.
    pub fn waiting(&self) -> usize {
        self.shared.waiting.load(Ordering::Acquire)
    }

    fn send(&self, msg: Inbound) -> Result<()> {
        if self.shared.shutdown.is_cancelled() {
            return Err(NotifyError::EngineStopped);
        }
        self.inbox.send(msg).map_err(|_| NotifyError::EngineStopped)
    }
}

/// Id and event stream of one submitted notification.
#[derive(Debug)]
pub struct NotificationHandle {
    id: NotificationId,
    events: mpsc::UnboundedReceiver<NotificationEvent>,
}

impl NotificationHandle {
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Next lifecycle event. `None` once the notification is finished with
    /// and no further events can arrive.
    pub async fn next_event(&mut self) -> Option<NotificationEvent> {
        self.events.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<NotificationEvent> {
        self.events.try_recv().ok()
    }

    pub fn into_receiver(self) -> mpsc::UnboundedReceiver<NotificationEvent> {
        self.events
    }
}
