//! Headless controller for the activity sign-up page.
//!
//! The page is driven through [`SignupPage`]; everything it shows goes through
//! the [`PageView`] seam, so the same flows back an HTML page, a terminal, or
//! a test recorder.

pub mod confirm;
pub mod escape;
pub mod events;
pub mod message;
pub mod page;
pub mod render;
pub mod view;

pub use confirm::{ConfirmDialog, ConfirmError};
pub use events::UiEvent;
pub use message::{MessageBoard, MESSAGE_DISMISS_AFTER};
pub use page::{FlowOutcome, PageOptions, SignupPage};
pub use view::{Control, MessageKind, PageView, RemoveTarget, SelectOption};
