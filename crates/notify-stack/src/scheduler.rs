//! Notification engine: the single task that owns the visible stack.
//!
//! Inbound messages are drained between actions. Show and close become
//! actions on the [`ActionQueue`]; control messages (close all, display
//! change) run immediately and discard whatever is still pending.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{MissedTickBehavior, sleep};
use tokio_util::sync::CancellationToken;

use crate::action_queue::ActionQueue;
use crate::animator;
use crate::backend::{WindowBackend, WindowId};
use crate::config::NotifyConfig;
use crate::geometry::Layout;
use crate::pool::WindowPool;
use crate::types::{
    CloseReason, Closer, DisplayEvent, EventSink, NotificationEvent, NotificationId,
    NotificationRequest, SignalKind, StackSnapshot, SurfaceContents, SurfaceMessage,
    SurfaceSignal,
};

/// An admitted request that has not reached the screen yet.
#[derive(Debug)]
pub(crate) struct PendingNotification {
    pub(crate) id: NotificationId,
    pub(crate) request: NotificationRequest,
    pub(crate) sink: EventSink,
}

/// Message from a [`crate::Notifier`], a closer or a dismiss timer.
#[derive(Debug)]
pub(crate) enum Inbound {
    Show(PendingNotification),
    Close {
        id: NotificationId,
        reason: CloseReason,
    },
    Signal(SurfaceSignal),
    CloseAll,
    Display(DisplayEvent),
    Snapshot(oneshot::Sender<StackSnapshot>),
}

#[derive(Debug)]
enum Action {
    /// A freshly admitted request.
    Show(PendingNotification),
    /// Display the backlog head if a slot is free.
    ShowNext,
    Close {
        id: NotificationId,
        reason: CloseReason,
    },
}

/// What the scheduler knows about the request a window currently displays.
#[derive(Debug)]
struct Binding {
    id: NotificationId,
    sink: EventSink,
    dismiss: CancellationToken,
}

pub(crate) struct Engine<B> {
    backend: B,
    config: NotifyConfig,
    layout: Layout,
    pool: WindowPool,
    queue: ActionQueue<Action>,
    /// Visible windows in slot order.
    active: Vec<WindowId>,
    bindings: HashMap<WindowId, Binding>,
    backlog: VecDeque<PendingNotification>,
    /// Notifications with a close already queued. Entries leave when the
    /// close runs.
    closing: HashSet<NotificationId>,
    inbox: mpsc::UnboundedReceiver<Inbound>,
    inbox_tx: mpsc::UnboundedSender<Inbound>,
    /// Admitted requests not yet on screen, shared with the notifier.
    waiting: Arc<AtomicUsize>,
    shutdown: CancellationToken,
}

impl<B: WindowBackend> Engine<B> {
    pub(crate) fn new(
        backend: B,
        config: NotifyConfig,
        inbox: mpsc::UnboundedReceiver<Inbound>,
        inbox_tx: mpsc::UnboundedSender<Inbound>,
        waiting: Arc<AtomicUsize>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            backend,
            config,
            layout: Layout::default(),
            pool: WindowPool::new(),
            queue: ActionQueue::default(),
            active: Vec::new(),
            bindings: HashMap::new(),
            backlog: VecDeque::new(),
            closing: HashSet::new(),
            inbox,
            inbox_tx,
            waiting,
            shutdown,
        }
    }

    /// Engine loop. Returns after shutdown, with every window destroyed.
    pub(crate) async fn run(mut self) {
        self.refresh_geometry();

        let mut sweep = tokio::time::interval(self.config.idle_sweep_interval());
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
        sweep.reset();

        loop {
            while let Ok(msg) = self.inbox.try_recv() {
                self.accept(msg);
            }

            if self.shutdown.is_cancelled() {
                break;
            }

            if let Some(action) = self.queue.pop() {
                self.perform(action).await;
                continue;
            }

            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                msg = self.inbox.recv() => match msg {
                    Some(msg) => self.accept(msg),
                    None => break,
                },
                _ = sweep.tick() => {
                    self.pool.sweep_idle(&self.backend);
                }
            }
        }

        self.close_all();
        tracing::info!("Notification engine stopped");
    }

    fn accept(&mut self, msg: Inbound) {
        match msg {
            Inbound::Show(pending) => self.queue.push(Action::Show(pending)),
            Inbound::Close { id, reason } => self.submit_close(id, reason),
            Inbound::Signal(signal) => self.on_signal(signal),
            Inbound::CloseAll => self.close_all(),
            Inbound::Display(event) => self.on_display_changed(event),
            Inbound::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    /// Queue a close unless one is already pending for `id`.
    fn submit_close(&mut self, id: NotificationId, reason: CloseReason) {
        if !self.closing.insert(id) {
            tracing::debug!(id, reason = %reason, "Close already queued");
            return;
        }
        self.queue.push(Action::Close { id, reason });
    }

    async fn perform(&mut self, action: Action) {
        match action {
            Action::Show(pending) => {
                // Behind the backlog, so the oldest waiting request is displayed first.
                self.backlog.push_back(pending);
                self.show_next().await;
            }
            Action::ShowNext => self.show_next().await,
            Action::Close { id, reason } => {
                self.closing.remove(&id);
                self.close(id, reason).await;
            }
        }
    }

    async fn show_next(&mut self) {
        if self.active.len() >= self.layout.max_visible {
            tracing::debug!(backlog = self.backlog.len(), "Stack full, notification backlogged");
            return;
        }
        let Some(pending) = self.backlog.pop_front() else {
            return;
        };

        let window = match self.pool.acquire(&self.backend, &self.config).await {
            Ok(window) => window,
            Err(e) => {
                tracing::error!(id = pending.id, error = %e, "Notification window failed to load");
                self.release_waiting(1);
                self.promote_backlog(1);
                return;
            }
        };

        let PendingNotification {
            id,
            request,
            mut sink,
        } = pending;
        let slot = self.active.len();
        if let Err(e) = self
            .backend
            .set_position(window, self.layout.slot_position(slot))
        {
            tracing::warn!(id, window = %window, error = %e, "Failed to position notification");
        }
        self.active.push(window);
        self.release_waiting(1);

        let display_time = request
            .display_time_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.config.display_time());
        let dismiss = self.spawn_dismiss_timer(id, display_time);

        sink.deliver(NotificationEvent::Shown {
            id,
            closer: Closer::new(id, self.inbox_tx.clone()),
        });

        let contents = SurfaceContents {
            window_id: window,
            id,
            request,
        };
        if let Err(e) = self
            .backend
            .send(window, SurfaceMessage::SetContents(contents))
        {
            tracing::warn!(id, window = %window, error = %e, "Failed to send notification contents");
        }
        self.bindings.insert(window, Binding { id, sink, dismiss });

        if let Err(e) = self.backend.show_inactive(window) {
            tracing::warn!(id, window = %window, error = %e, "Failed to show notification window");
        }
        tracing::info!(id, window = %window, slot, "Notification shown");
    }

    async fn close(&mut self, id: NotificationId, reason: CloseReason) {
        let Some(slot) = self.slot_of(id) else {
            tracing::debug!(id, reason = %reason, "Close for notification not on screen ignored");
            return;
        };

        let window = self.active.remove(slot);
        if let Some(mut binding) = self.bindings.remove(&window) {
            binding
                .sink
                .deliver(NotificationEvent::Closed { id, reason });
            binding.dismiss.cancel();
        }
        if let Err(e) = self.backend.send(window, SurfaceMessage::ResetContents) {
            tracing::warn!(id, window = %window, error = %e, "Failed to reset notification contents");
        }
        self.pool.release(&self.backend, window);
        tracing::info!(id, window = %window, slot, reason = %reason, "Notification closed");

        self.promote_backlog(1);

        animator::move_one_down(
            &self.backend,
            &self.layout,
            &self.active,
            slot,
            self.config.animation(),
        )
        .await;
    }

    fn on_signal(&mut self, signal: SurfaceSignal) {
        let Some(binding) = self.bindings.get_mut(&signal.window_id) else {
            tracing::debug!(window = %signal.window_id, "Signal from unbound window ignored");
            return;
        };
        if binding.id != signal.notification_id {
            tracing::debug!(
                window = %signal.window_id,
                bound = binding.id,
                signalled = signal.notification_id,
                "Stale surface signal ignored"
            );
            return;
        }

        let id = binding.id;
        match signal.kind {
            SignalKind::Click => {
                let closer = Closer::new(id, self.inbox_tx.clone());
                binding
                    .sink
                    .deliver(NotificationEvent::Clicked { id, closer });
            }
            SignalKind::Close => self.submit_close(id, CloseReason::Close),
        }
    }

    /// Dismiss everything, including requests that never reached the screen.
    fn close_all(&mut self) {
        let mut dropped = 0;
        for action in self.queue.drain() {
            if matches!(action, Action::Show(_)) {
                dropped += 1;
            }
        }
        dropped += self.backlog.len();
        self.backlog.clear();
        self.release_waiting(dropped);

        self.close_all_immediate();
        if dropped > 0 {
            tracing::info!(dropped, "Pending notifications discarded");
        }
    }

    /// Tear down every visible and pooled window.
    fn close_all_immediate(&mut self) {
        for window in self.active.drain(..) {
            if let Some(mut binding) = self.bindings.remove(&window) {
                binding.dismiss.cancel();
                binding.sink.deliver(NotificationEvent::Closed {
                    id: binding.id,
                    reason: CloseReason::CloseAll,
                });
            }
            if let Err(e) = self.backend.destroy(window) {
                tracing::warn!(window = %window, error = %e, "Failed to destroy notification window");
            }
        }
        self.bindings.clear();
        self.pool.sweep_idle(&self.backend);
        self.closing.clear();
    }

    fn on_display_changed(&mut self, event: DisplayEvent) {
        // Requests still waiting for a slot survive the teardown.
        let mut salvaged = Vec::new();
        for action in self.queue.drain() {
            if let Action::Show(pending) = action {
                salvaged.push(pending);
            }
        }
        self.backlog.extend(salvaged);

        self.close_all_immediate();
        self.refresh_geometry();
        tracing::info!(?event, backlog = self.backlog.len(), "Display changed, stack rebuilt");

        self.promote_backlog(self.layout.max_visible);
    }

    fn refresh_geometry(&mut self) {
        let display = self.backend.primary_display();
        self.layout = Layout::compute(&self.config, &display);
        tracing::info!(
            corner = self.layout.corner.as_str(),
            x = self.layout.first_pos.x,
            y = self.layout.first_pos.y,
            max_visible = self.layout.max_visible,
            "Notification geometry computed"
        );
    }

    /// Queue up to `count` backlog displays while there is room. The entries
    /// stay in the backlog until their turn, so a request admitted later can
    /// never overtake them.
    fn promote_backlog(&mut self, count: usize) {
        let free = self.layout.max_visible.saturating_sub(self.active.len());
        let promoted = count.min(free).min(self.backlog.len());
        for _ in 0..promoted {
            self.queue.push(Action::ShowNext);
        }
        if promoted > 0 {
            tracing::debug!(promoted, backlog = self.backlog.len(), "Backlog promotion queued");
        }
    }

    fn spawn_dismiss_timer(&self, id: NotificationId, after: Duration) -> CancellationToken {
        let token = self.shutdown.child_token();
        let cancelled = token.clone();
        let inbox = self.inbox_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = sleep(after) => {
                    let _ = inbox.send(Inbound::Close { id, reason: CloseReason::Timeout });
                }
            }
        });
        token
    }

    fn slot_of(&self, id: NotificationId) -> Option<usize> {
        self.active.iter().position(|window| {
            self.bindings
                .get(window)
                .is_some_and(|binding| binding.id == id)
        })
    }

    fn release_waiting(&self, count: usize) {
        if count > 0 {
            self.waiting.fetch_sub(count, Ordering::AcqRel);
        }
    }

    fn snapshot(&self) -> StackSnapshot {
        StackSnapshot {
            layout: self.layout,
            active: self
                .active
                .iter()
                .filter_map(|window| self.bindings.get(window).map(|b| (*window, b.id)))
                .collect(),
            backlog: self.backlog.len(),
            pooled: self.pool.len(),
            pending_actions: self.queue.len(),
            pending_closes: self.closing.len(),
        }
    }
}
