//! Modal prompt reporting that a window failed to load its page.
//!
//! The dialog offers "Reload" and "Ignore"; the retry callback runs only
//! when the user picks Reload. Rendering the prompt is left to a
//! [`DialogPresenter`] supplied by the host.

use serde::Serialize;

pub const LOAD_ERROR_TITLE: &str = "Loading Error";

pub const NETWORK_ERROR_DESCRIPTION: &str =
    "Network connectivity has been lost, check your internet connection.";

const RELOAD_BUTTON: usize = 0;
const IGNORE_BUTTON: usize = 1;

/// Errors raised while presenting a dialog.
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("dialog could not be shown: {0}")]
    Presenter(String),
}

/// Result type alias for dialog operations.
pub type Result<T> = std::result::Result<T, DialogError>;

/// Icon/severity of a message box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

/// Everything a presenter needs to render a blocking message box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBox {
    pub kind: MessageKind,
    pub title: String,
    pub message: String,
    pub buttons: Vec<String>,
    /// Button focused initially.
    pub default_id: usize,
    /// Button reported when the dialog is dismissed with Escape.
    pub cancel_id: usize,
    /// Render buttons as plain buttons, never as command links.
    pub no_link: bool,
}

/// What the user picked in the load-failure prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadFailureChoice {
    Reload,
    Ignore,
}

/// Host capability for showing a message box pinned to a window.
pub trait DialogPresenter {
    type Window;

    /// Show the dialog and block until dismissed. Returns the index of the
    /// chosen button.
    fn show_message_box(&self, parent: &Self::Window, dialog: &MessageBox) -> Result<usize>;
}

/// Text of the load-failure prompt.
pub fn load_failure_message(
    url: Option<&str>,
    error_description: Option<&str>,
    error_code: i32,
) -> String {
    let mut msg = match url.filter(|u| !u.is_empty()) {
        Some(url) => format!("Error loading URL:\n{url}"),
        None => "Error loading window".to_string(),
    };
    if let Some(desc) = error_description.filter(|d| !d.is_empty()) {
        msg.push_str("\n\n");
        msg.push_str(desc);
    }
    if error_code != 0 {
        msg.push_str(&format!("\n\nError Code: {error_code}"));
    }
    msg
}

/// Ask whether to reload a window whose page failed to load.
///
/// Dismissing the dialog counts as Reload.
pub fn show_load_failure<P: DialogPresenter>(
    presenter: &P,
    parent: &P::Window,
    url: Option<&str>,
    error_description: Option<&str>,
    error_code: i32,
    retry: impl FnOnce(),
) -> Result<LoadFailureChoice> {
    let dialog = MessageBox {
        kind: MessageKind::Error,
        title: LOAD_ERROR_TITLE.to_string(),
        message: load_failure_message(url, error_description, error_code),
        buttons: vec!["Reload".to_string(), "Ignore".to_string()],
        default_id: RELOAD_BUTTON,
        cancel_id: RELOAD_BUTTON,
        no_link: true,
    };

    let button = presenter.show_message_box(parent, &dialog)?;
    if button == IGNORE_BUTTON {
        tracing::info!(url = url.unwrap_or_default(), "Load failure ignored");
        return Ok(LoadFailureChoice::Ignore);
    }

    tracing::info!(url = url.unwrap_or_default(), error_code, "Reloading after load failure");
    retry();
    Ok(LoadFailureChoice::Reload)
}

/// Load-failure prompt for a lost network connection.
pub fn show_network_connectivity_error<P: DialogPresenter>(
    presenter: &P,
    parent: &P::Window,
    url: Option<&str>,
    retry: impl FnOnce(),
) -> Result<LoadFailureChoice> {
    show_load_failure(
        presenter,
        parent,
        url,
        Some(NETWORK_ERROR_DESCRIPTION),
        0,
        retry,
    )
}
