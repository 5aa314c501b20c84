//! Dialog presenter for the headless host.
//!
//! There is no screen to draw on, so the prompt is logged and answered with
//! the configured choice.

use load_dialog::{DialogPresenter, MessageBox};

use crate::config::DialogAnswer;

/// Answers every load-failure prompt with a fixed button.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessPresenter {
    answer: DialogAnswer,
}

impl HeadlessPresenter {
    pub fn new(answer: DialogAnswer) -> Self {
        Self { answer }
    }
}

impl DialogPresenter for HeadlessPresenter {
    type Window = String;

    fn show_message_box(&self, parent: &String, dialog: &MessageBox) -> load_dialog::Result<usize> {
        let wanted = match self.answer {
            DialogAnswer::Reload => "Reload",
            DialogAnswer::Ignore => "Ignore",
        };
        let button = dialog
            .buttons
            .iter()
            .position(|b| b == wanted)
            .unwrap_or(dialog.cancel_id);

        tracing::warn!(
            window = %parent,
            title = %dialog.title,
            answer = wanted,
            "{}",
            dialog.message
        );
        Ok(button)
    }
}
