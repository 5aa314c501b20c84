//! Line-oriented JSON command protocol of the host.
//!
//! Every stdin line is one [`Command`]; every stdout line is one
//! [`HostEvent`].

use load_dialog::{LoadFailureChoice, show_load_failure, show_network_connectivity_error};
use notify_stack::{
    CloseReason, DisplayEvent, NotificationEvent, NotificationHandle, NotificationId,
    NotificationRequest, SignalKind, StackSnapshot, SurfaceSignal, WindowId,
};
use serde::{Deserialize, Serialize};

use crate::app::HostState;
use crate::config::host_config::display_for;
use crate::dialog::HeadlessPresenter;

/// Parent window named in load-failure prompts.
const DIALOG_PARENT: &str = "notification";

#[derive(Debug, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    Notify {
        request: NotificationRequest,
    },
    CloseAll,
    /// Simulated click on a surface.
    Click {
        window: WindowId,
        id: NotificationId,
    },
    /// Simulated close button on a surface.
    Close {
        window: WindowId,
        id: NotificationId,
    },
    /// Display topology change, optionally resizing the simulated screen.
    Display {
        event: DisplayEvent,
        width: Option<u32>,
        height: Option<u32>,
        taskbar_height: Option<u32>,
    },
    Status,
    LoadFailure {
        url: Option<String>,
        description: Option<String>,
        #[serde(default)]
        code: i32,
        /// Report a lost network connection instead of `description`.
        #[serde(default)]
        network: bool,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    Show {
        id: NotificationId,
    },
    Click {
        id: NotificationId,
    },
    Close {
        id: NotificationId,
        reason: CloseReason,
    },
    Error {
        id: NotificationId,
        message: String,
    },
    Status {
        snapshot: StackSnapshot,
    },
    Dialog {
        choice: LoadFailureChoice,
    },
    Reload {
        url: Option<String>,
    },
    /// A command line that could not be parsed or executed.
    Invalid {
        message: String,
    },
}

/// Parse and execute one command line. Failures are reported on stdout as
/// `invalid` events.
pub async fn handle_line(state: &HostState, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let command: Command = match serde_json::from_str(line) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Unparseable command: {e}");
            state.emit(&HostEvent::Invalid {
                message: format!("invalid command: {e}"),
            });
            return;
        }
    };

    if let Err(e) = execute(state, command).await {
        tracing::warn!("Command failed: {e}");
        state.emit(&HostEvent::Invalid {
            message: e.to_string(),
        });
    }
}

async fn execute(state: &HostState, command: Command) -> anyhow::Result<()> {
    let notifier = state.notifier();
    match command {
        Command::Notify { request } => {
            let handle = notifier.notify(request);
            tracing::debug!(id = handle.id(), "Notification submitted");
            forward_events(state.clone(), handle);
        }
        Command::CloseAll => notifier.close_all()?,
        Command::Click { window, id } => notifier.surface_signal(SurfaceSignal {
            kind: SignalKind::Click,
            window_id: window,
            notification_id: id,
        })?,
        Command::Close { window, id } => notifier.surface_signal(SurfaceSignal {
            kind: SignalKind::Close,
            window_id: window,
            notification_id: id,
        })?,
        Command::Display {
            event,
            width,
            height,
            taskbar_height,
        } => {
            let config = state.config();
            if width.is_some() || height.is_some() || taskbar_height.is_some() {
                state.backend().set_display(display_for(
                    width.unwrap_or(config.screen_width),
                    height.unwrap_or(config.screen_height),
                    taskbar_height.unwrap_or(config.taskbar_height),
                ));
            }
            notifier.display_changed(event)?;
        }
        Command::Status => {
            let snapshot = notifier.snapshot().await?;
            state.emit(&HostEvent::Status { snapshot });
        }
        Command::LoadFailure {
            url,
            description,
            code,
            network,
        } => {
            let presenter = HeadlessPresenter::new(state.config().dialog_answer);
            let parent = DIALOG_PARENT.to_string();
            let retry = || state.emit(&HostEvent::Reload { url: url.clone() });
            let choice = if network {
                show_network_connectivity_error(&presenter, &parent, url.as_deref(), retry)?
            } else {
                show_load_failure(
                    &presenter,
                    &parent,
                    url.as_deref(),
                    description.as_deref(),
                    code,
                    retry,
                )?
            };
            state.emit(&HostEvent::Dialog { choice });
        }
    }
    Ok(())
}

/// Relay lifecycle events of one notification to stdout until its stream
/// ends. A click dismisses the notification.
fn forward_events(state: HostState, mut handle: NotificationHandle) {
    tokio::spawn(async move {
        while let Some(event) = handle.next_event().await {
            let out = match event {
                NotificationEvent::Shown { id, .. } => HostEvent::Show { id },
                NotificationEvent::Clicked { id, closer } => {
                    closer.close();
                    HostEvent::Click { id }
                }
                NotificationEvent::Closed { id, reason } => HostEvent::Close { id, reason },
                NotificationEvent::Failed { id, error } => HostEvent::Error {
                    id,
                    message: error.to_string(),
                },
            };
            state.emit(&out);
        }
    });
}
