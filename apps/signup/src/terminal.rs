//! Terminal rendition of the sign-up page.

use std::sync::{Arc, Mutex};

use shared::domain::Catalog;
use signup_page::{
    confirm::ESCAPE_KEY, render::render_options, Control, MessageKind, PageView, SelectOption,
    SignupPage, UiEvent,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::debug;

pub struct TerminalView {
    echo_list: bool,
    list_markup: Mutex<String>,
    options: Mutex<Vec<SelectOption>>,
    prompts: mpsc::UnboundedSender<String>,
}

impl TerminalView {
    pub fn new(echo_list: bool, prompts: mpsc::UnboundedSender<String>) -> Self {
        Self {
            echo_list,
            list_markup: Mutex::new(String::new()),
            options: Mutex::new(Vec::new()),
            prompts,
        }
    }

    /// The list region and the activity selector as they would sit in the page.
    pub fn page_markup(&self) -> String {
        let list = lock(&self.list_markup).clone();
        let options = render_options(&lock(&self.options));
        format!(
            "<div id=\"activities-list\">{list}</div>\n\
             <select id=\"activity\" name=\"activity\" required>{options}</select>\n"
        )
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn describe_catalog(catalog: &Catalog) -> String {
    if catalog.is_empty() {
        return "No activities available.\n".to_string();
    }

    let mut out = String::new();
    for activity in catalog.iter() {
        out.push_str(&format!(
            "{}\n  {}\n  Schedule: {}\n  Availability: {} spots left\n",
            activity.name,
            activity.details.description,
            activity.details.schedule,
            activity.spots_left()
        ));
        if activity.details.participants.is_empty() {
            out.push_str("  No participants yet\n");
        } else {
            for email in &activity.details.participants {
                out.push_str(&format!("  - {email}\n"));
            }
        }
    }
    out
}

/// Drops tags from simple notice markup such as `<p>...</p>`.
fn plain_text(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

impl PageView for TerminalView {
    fn replace_activity_list(&self, catalog: &Catalog, markup: &str) {
        *lock(&self.list_markup) = markup.to_string();
        if self.echo_list {
            print!("{}", describe_catalog(catalog));
        }
    }

    fn show_activity_list_failure(&self, markup: &str) {
        *lock(&self.list_markup) = markup.to_string();
        eprintln!("{}", plain_text(markup));
    }

    fn replace_activity_options(&self, options: &[SelectOption]) {
        *lock(&self.options) = options.to_vec();
    }

    fn show_message(&self, kind: MessageKind, text: &str) {
        match kind {
            MessageKind::Success => println!("[{}] {text}", kind.css_class()),
            MessageKind::Error => eprintln!("[{}] {text}", kind.css_class()),
        }
    }

    fn hide_message(&self) {
        debug!("status message dismissed");
    }

    fn set_control_enabled(&self, control: &Control, enabled: bool) {
        debug!(?control, enabled, "control state changed");
    }

    fn reset_form(&self) {
        debug!("form reset");
    }

    fn show_confirm(&self, prompt: &str) {
        let _ = self.prompts.send(prompt.to_string());
    }

    fn hide_confirm(&self) {}
}

/// Maps one line typed at the confirmation prompt to the page input it stands
/// for. `None` is end of input.
pub fn answer_event(line: Option<&str>) -> UiEvent {
    let Some(line) = line else {
        return UiEvent::CancelClicked;
    };
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => UiEvent::ConfirmClicked,
        "esc" | "escape" | "\u{1b}" => UiEvent::KeyPressed {
            key: ESCAPE_KEY.to_string(),
        },
        _ => UiEvent::CancelClicked,
    }
}

/// Answers every confirmation the page raises, from stdin or automatically.
pub async fn answer_prompts(
    page: Arc<SignupPage>,
    mut prompts: mpsc::UnboundedReceiver<String>,
    auto_confirm: bool,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(prompt) = prompts.recv().await {
        let event = if auto_confirm {
            println!("{prompt} yes");
            UiEvent::ConfirmClicked
        } else {
            eprint!("{prompt} [y/N] ");
            let line = lines.next_line().await.ok().flatten();
            answer_event(line.as_deref())
        };
        page.dispatch(event).await;
    }
}
