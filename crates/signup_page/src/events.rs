//! Inputs the page reacts to.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    PageLoaded,
    SubmitSignup {
        email: String,
        activity: String,
    },
    /// A removal control was clicked; carries its URL-encoded data attributes.
    RemoveClicked {
        activity_enc: String,
        email_enc: String,
    },
    ConfirmClicked,
    CancelClicked,
    KeyPressed {
        key: String,
    },
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PageLoaded => "page_loaded",
            Self::SubmitSignup { .. } => "submit_signup",
            Self::RemoveClicked { .. } => "remove_clicked",
            Self::ConfirmClicked => "confirm_clicked",
            Self::CancelClicked => "cancel_clicked",
            Self::KeyPressed { .. } => "key_pressed",
        }
    }
}
