//! Markup for the activity list and the activity selector.
//!
//! Every fetch re-renders from scratch; nothing here diffs against the
//! previous render.

use std::fmt::Write as _;

use shared::domain::{Activity, Catalog};

use crate::escape::{encode_component, escape_html};
use crate::view::SelectOption;

pub const SELECT_PLACEHOLDER: &str = "-- Select an activity --";
pub const LOAD_FAILED_HTML: &str = "<p>Failed to load activities. Please try again later.</p>";
pub const NO_PARTICIPANTS_HTML: &str = r#"<p class="no-participants">No participants yet</p>"#;

const TRASH_ICON: &str = r#"<svg viewBox="0 0 24 24" aria-hidden="true" focusable="false"><path fill="currentColor" d="M3 6h18v2H3V6zm2 3h14l-1 11H6L5 9zm5-5h4l1 1h-6l1-1z"/></svg>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCatalog {
    pub list_html: String,
    pub options: Vec<SelectOption>,
}

pub fn render_catalog(catalog: &Catalog) -> RenderedCatalog {
    let mut list_html = String::new();
    let mut options = Vec::with_capacity(catalog.len() + 1);
    options.push(SelectOption::new("", SELECT_PLACEHOLDER));

    for activity in catalog.iter() {
        list_html.push_str(&render_card(activity));
        options.push(SelectOption::new(&activity.name, &activity.name));
    }

    RenderedCatalog { list_html, options }
}

pub fn render_card(activity: &Activity) -> String {
    let details = &activity.details;
    let mut html = String::from(r#"<div class="activity-card">"#);
    // Writing into a String cannot fail.
    let _ = write!(
        html,
        "<h4>{}</h4><p>{}</p><p><strong>Schedule:</strong> {}</p>\
         <p><strong>Availability:</strong> {} spots left</p>",
        escape_html(&activity.name),
        escape_html(&details.description),
        escape_html(&details.schedule),
        activity.spots_left(),
    );
    html.push_str(&render_participants(activity));
    html.push_str("</div>");
    html
}

fn render_participants(activity: &Activity) -> String {
    let participants = &activity.details.participants;
    if participants.is_empty() {
        return NO_PARTICIPANTS_HTML.to_string();
    }

    let activity_enc = encode_component(&activity.name);
    let mut html = String::from(
        r#"<div class="participants"><h5>Participants</h5><ul class="participants-list">"#,
    );
    for email in participants {
        let shown = escape_html(email);
        let _ = write!(
            html,
            r#"<li><span class="participant-email">{shown}</span><button type="button" class="participant-remove" data-activity-enc="{}" data-email-enc="{}" aria-label="Remove {shown}" title="Remove {shown}">{TRASH_ICON}</button></li>"#,
            escape_html(&activity_enc),
            escape_html(&encode_component(email)),
        );
    }
    html.push_str("</ul></div>");
    html
}

pub fn render_options(options: &[SelectOption]) -> String {
    options
        .iter()
        .map(|option| {
            format!(
                r#"<option value="{}">{}</option>"#,
                escape_html(&option.value),
                escape_html(&option.label)
            )
        })
        .collect()
}
