//! The seam between the controller and whatever draws the page.

use shared::domain::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    /// Class name the message region carries while showing this kind.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Identifies the removal control of one participant row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoveTarget {
    pub activity: String,
    pub email: String,
}

impl RemoveTarget {
    pub fn new(activity: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            activity: activity.into(),
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Submit,
    Remove(RemoveTarget),
}

/// Page regions the controller mutates. Calls arrive from whichever handler
/// runs; implementations use interior mutability and the last writer wins.
pub trait PageView: Send + Sync {
    /// Replaces the activity list wholesale. `markup` is the rendered list.
    fn replace_activity_list(&self, catalog: &Catalog, markup: &str);
    /// Replaces the activity list with a failure notice.
    fn show_activity_list_failure(&self, markup: &str);
    /// Replaces every option of the activity selector, placeholder included.
    fn replace_activity_options(&self, options: &[SelectOption]);
    fn show_message(&self, kind: MessageKind, text: &str);
    fn hide_message(&self);
    fn set_control_enabled(&self, control: &Control, enabled: bool);
    /// Clears the email field and the activity selection.
    fn reset_form(&self);
    fn show_confirm(&self, prompt: &str);
    fn hide_confirm(&self);
}
