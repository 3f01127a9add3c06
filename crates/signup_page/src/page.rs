use std::{sync::Arc, time::Duration};

use client_core::{ActivityApi, ClientError};
use shared::protocol::MutationOutcome;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::{
    confirm::ConfirmDialog,
    escape::decode_component,
    events::UiEvent,
    message::{MessageBoard, MESSAGE_DISMISS_AFTER},
    render::{render_catalog, LOAD_FAILED_HTML},
    view::{Control, MessageKind, PageView, RemoveTarget},
};

pub const MISSING_FIELDS: &str = "Please enter an email and select an activity.";
pub const SIGNUP_REJECTED_FALLBACK: &str = "An error occurred";
pub const SIGNUP_FAILED: &str = "Failed to sign up. Please try again.";
pub const REMOVE_REJECTED_FALLBACK: &str = "Failed to remove participant";
pub const REMOVE_FAILED: &str = "Failed to remove participant. Please try again.";
pub const UNEXPECTED_RESPONSE: &str = "The server sent an unexpected response.";

#[derive(Debug, Clone)]
pub struct PageOptions {
    pub message_dismiss_after: Duration,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            message_dismiss_after: MESSAGE_DISMISS_AFTER,
        }
    }
}

/// How a user-triggered flow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    Succeeded,
    /// The server refused the mutation.
    Rejected,
    /// Transport or protocol failure.
    Failed,
    /// The user answered no, or the overlay was unavailable.
    Declined,
    /// The input was refused before any request went out.
    Invalid,
    /// Nothing was waiting for this input.
    Ignored,
}

/// Keeps a control disabled for as long as it is alive.
struct DisabledControl<'a> {
    view: &'a dyn PageView,
    control: Control,
}

impl<'a> DisabledControl<'a> {
    fn new(view: &'a dyn PageView, control: Control) -> Self {
        view.set_control_enabled(&control, false);
        Self { view, control }
    }
}

impl Drop for DisabledControl<'_> {
    fn drop(&mut self) {
        self.view.set_control_enabled(&self.control, true);
    }
}

pub struct SignupPage {
    api: Arc<dyn ActivityApi>,
    view: Arc<dyn PageView>,
    messages: MessageBoard,
    confirm: ConfirmDialog,
}

impl SignupPage {
    pub fn new(api: Arc<dyn ActivityApi>, view: Arc<dyn PageView>, options: PageOptions) -> Arc<Self> {
        Arc::new(Self {
            messages: MessageBoard::new(Arc::clone(&view), options.message_dismiss_after),
            confirm: ConfirmDialog::new(Arc::clone(&view)),
            api,
            view,
        })
    }

    pub fn messages(&self) -> &MessageBoard {
        &self.messages
    }

    pub fn confirm_dialog(&self) -> &ConfirmDialog {
        &self.confirm
    }

    /// Fetches the catalog and re-renders the list and the selector.
    ///
    /// On failure the list shows a notice and the selector keeps its current
    /// options; the error is returned after it has been rendered.
    pub async fn refresh(&self) -> Result<usize, ClientError> {
        match self.api.list_activities().await {
            Ok(catalog) => {
                let rendered = render_catalog(&catalog);
                self.view.replace_activity_list(&catalog, &rendered.list_html);
                self.view.replace_activity_options(&rendered.options);
                debug!(activities = catalog.len(), "activity list rendered");
                Ok(catalog.len())
            }
            Err(err) => {
                error!(error = %err, "error fetching activities");
                self.view.show_activity_list_failure(LOAD_FAILED_HTML);
                Err(err)
            }
        }
    }

    pub async fn sign_up(&self, email: &str, activity: &str) -> FlowOutcome {
        let email = email.trim();
        if email.is_empty() || activity.is_empty() {
            self.messages.show(MessageKind::Error, MISSING_FIELDS).await;
            return FlowOutcome::Invalid;
        }

        let outcome = {
            let _submit = DisabledControl::new(self.view.as_ref(), Control::Submit);
            let result = self.api.sign_up(activity, email).await;
            let outcome = self
                .report_mutation(result, SIGNUP_REJECTED_FALLBACK, SIGNUP_FAILED)
                .await;
            if outcome == FlowOutcome::Succeeded {
                self.view.reset_form();
            }
            outcome
        };

        if outcome == FlowOutcome::Succeeded {
            info!(%email, %activity, "participant signed up");
            self.refresh_after_mutation().await;
        }
        outcome
    }

    /// Asks for confirmation, then removes `email` from `activity`.
    pub async fn remove_participant(&self, activity: &str, email: &str) -> FlowOutcome {
        let prompt = format!("Remove {email} from {activity}?");
        match self.confirm.ask(&prompt).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(%email, %activity, "removal declined");
                return FlowOutcome::Declined;
            }
            Err(err) => {
                warn!(error = %err, %email, %activity, "removal confirmation unavailable");
                return FlowOutcome::Declined;
            }
        }

        let outcome = {
            let target = RemoveTarget::new(activity, email);
            let _remove = DisabledControl::new(self.view.as_ref(), Control::Remove(target));
            let result = self.api.remove_participant(activity, email).await;
            self.report_mutation(result, REMOVE_REJECTED_FALLBACK, REMOVE_FAILED)
                .await
        };

        if outcome == FlowOutcome::Succeeded {
            info!(%email, %activity, "participant removed");
            self.refresh_after_mutation().await;
        }
        outcome
    }

    pub async fn dispatch(&self, event: UiEvent) -> FlowOutcome {
        match event {
            UiEvent::PageLoaded => match self.refresh().await {
                Ok(_) => FlowOutcome::Succeeded,
                Err(_) => FlowOutcome::Failed,
            },
            UiEvent::SubmitSignup { email, activity } => self.sign_up(&email, &activity).await,
            UiEvent::RemoveClicked {
                activity_enc,
                email_enc,
            } => {
                let decoded = decode_component(&activity_enc)
                    .and_then(|activity| Ok((activity, decode_component(&email_enc)?)));
                match decoded {
                    Ok((activity, email)) => self.remove_participant(&activity, &email).await,
                    Err(err) => {
                        warn!(error = %err, "ignoring removal control with bad attributes");
                        FlowOutcome::Ignored
                    }
                }
            }
            UiEvent::ConfirmClicked => settled(self.confirm.confirm().await),
            UiEvent::CancelClicked => settled(self.confirm.cancel().await),
            UiEvent::KeyPressed { key } => settled(self.confirm.key_pressed(&key).await),
        }
    }

    /// Runs `event` as its own task, the way independent page handlers run.
    pub fn spawn_dispatch(self: &Arc<Self>, event: UiEvent) -> JoinHandle<FlowOutcome> {
        debug!(event = event.name(), "dispatching ui event");
        let page = Arc::clone(self);
        tokio::spawn(async move { page.dispatch(event).await })
    }

    async fn report_mutation(
        &self,
        result: Result<MutationOutcome, ClientError>,
        rejected_fallback: &str,
        failed_text: &str,
    ) -> FlowOutcome {
        match result {
            Ok(MutationOutcome::Accepted { message }) => {
                self.messages.show(MessageKind::Success, &message).await;
                FlowOutcome::Succeeded
            }
            Ok(MutationOutcome::Rejected(err)) => {
                self.messages
                    .show(MessageKind::Error, err.detail_or(rejected_fallback))
                    .await;
                FlowOutcome::Rejected
            }
            Err(err) if err.is_protocol() => {
                error!(error = %err, "malformed response to mutation");
                self.messages
                    .show(MessageKind::Error, UNEXPECTED_RESPONSE)
                    .await;
                FlowOutcome::Failed
            }
            Err(err) => {
                error!(error = %err, "mutation request failed");
                self.messages.show(MessageKind::Error, failed_text).await;
                FlowOutcome::Failed
            }
        }
    }

    async fn refresh_after_mutation(&self) {
        // A failed refresh has already replaced the list with its notice.
        let _ = self.refresh().await;
    }
}

fn settled(answered: bool) -> FlowOutcome {
    if answered {
        FlowOutcome::Succeeded
    } else {
        FlowOutcome::Ignored
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
