//! Yes/no confirmation through the page's shared overlay.
//!
//! The overlay serves one question at a time: the dialog is either idle or
//! awaiting input, and a second question asked while one is open is refused
//! with [`ConfirmError::Busy`]. Confirm, cancel and Escape are the only ways
//! out; whichever arrives first settles the answer and the others are then
//! ignored.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{oneshot, Mutex};
use tracing::debug;

use crate::view::PageView;

pub const ESCAPE_KEY: &str = "Escape";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfirmError {
    #[error("another confirmation is already awaiting input")]
    Busy,
    #[error("confirmation was abandoned without an answer")]
    Abandoned,
}

enum DialogState {
    Idle,
    AwaitingInput {
        prompt: String,
        reply: oneshot::Sender<bool>,
    },
}

pub struct ConfirmDialog {
    view: Arc<dyn PageView>,
    state: Mutex<DialogState>,
}

impl ConfirmDialog {
    pub fn new(view: Arc<dyn PageView>) -> Self {
        Self {
            view,
            state: Mutex::new(DialogState::Idle),
        }
    }

    /// Shows `prompt` and waits, without a timeout, for the user's answer.
    pub async fn ask(&self, prompt: &str) -> Result<bool, ConfirmError> {
        let answer = {
            let mut state = self.state.lock().await;
            if let DialogState::AwaitingInput { reply, .. } = &*state {
                // A caller that gave up leaves a closed sender behind; the
                // overlay is free again in that case.
                if !reply.is_closed() {
                    return Err(ConfirmError::Busy);
                }
                debug!("reclaiming confirmation overlay from abandoned caller");
            }

            let (reply, answer) = oneshot::channel();
            *state = DialogState::AwaitingInput {
                prompt: prompt.to_string(),
                reply,
            };
            self.view.show_confirm(prompt);
            answer
        };

        answer.await.map_err(|_| ConfirmError::Abandoned)
    }

    /// Returns whether an open question was answered.
    pub async fn confirm(&self) -> bool {
        self.settle(true).await
    }

    pub async fn cancel(&self) -> bool {
        self.settle(false).await
    }

    /// Escape cancels; other keys are ignored.
    pub async fn key_pressed(&self, key: &str) -> bool {
        if key != ESCAPE_KEY {
            return false;
        }
        self.settle(false).await
    }

    pub async fn pending_prompt(&self) -> Option<String> {
        match &*self.state.lock().await {
            DialogState::Idle => None,
            DialogState::AwaitingInput { prompt, .. } => Some(prompt.clone()),
        }
    }

    async fn settle(&self, answer: bool) -> bool {
        let mut state = self.state.lock().await;
        match std::mem::replace(&mut *state, DialogState::Idle) {
            DialogState::Idle => false,
            DialogState::AwaitingInput { prompt, reply } => {
                self.view.hide_confirm();
                debug!(%prompt, answer, "confirmation settled");
                let _ = reply.send(answer);
                true
            }
        }
    }
}
