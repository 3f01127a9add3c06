use std::{sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle};

use crate::view::{MessageKind, PageView};

pub const MESSAGE_DISMISS_AFTER: Duration = Duration::from_millis(5000);

/// Owns the single status message region and its dismiss timer.
///
/// Showing a message aborts the previous timer, so the newest message always
/// stays up for the full delay.
pub struct MessageBoard {
    view: Arc<dyn PageView>,
    dismiss_after: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl MessageBoard {
    pub fn new(view: Arc<dyn PageView>, dismiss_after: Duration) -> Self {
        Self {
            view,
            dismiss_after,
            timer: Mutex::new(None),
        }
    }

    pub fn dismiss_after(&self) -> Duration {
        self.dismiss_after
    }

    pub async fn show(&self, kind: MessageKind, text: &str) {
        let mut timer = self.timer.lock().await;
        if let Some(previous) = timer.take() {
            previous.abort();
        }

        self.view.show_message(kind, text);

        let view = Arc::clone(&self.view);
        let delay = self.dismiss_after;
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            view.hide_message();
        }));
    }

    /// Hides the current message now and drops its pending timer.
    pub async fn dismiss(&self) {
        let mut timer = self.timer.lock().await;
        if let Some(previous) = timer.take() {
            previous.abort();
        }
        self.view.hide_message();
    }

    pub async fn has_pending_dismiss(&self) -> bool {
        self.timer
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for MessageBoard {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.get_mut().take() {
            handle.abort();
        }
    }
}
