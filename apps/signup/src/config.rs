use std::{fs, io, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use signup_page::PageOptions;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "signup.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub message_dismiss_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            message_dismiss_ms: 5000,
            request_timeout_secs: 10,
        }
    }
}

impl Settings {
    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            message_dismiss_after: Duration::from_millis(self.message_dismiss_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Defaults, then the config file, then the environment.
///
/// An explicitly named file must exist; the default `signup.toml` is optional.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<Settings> {
    let path = explicit.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => parse_settings(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound && explicit.is_none() => {
            Settings::default()
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    Ok(toml::from_str(raw)?)
}

pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SIGNUP_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__MESSAGE_DISMISS_MS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.message_dismiss_ms = parsed,
            Err(_) => warn!(value = %v, "ignoring invalid APP__MESSAGE_DISMISS_MS"),
        }
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) if parsed > 0 => settings.request_timeout_secs = parsed,
            _ => warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
