use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::HttpActivityClient;
use signup_page::{FlowOutcome, SignupPage, UiEvent};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::load_settings;
use terminal::{answer_prompts, TerminalView};

#[derive(Parser, Debug)]
#[command(about = "Browse activities and manage sign-ups")]
struct Args {
    /// Backend base URL; overrides the config file and environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Config file (defaults to ./signup.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every activity with its roster.
    List,
    /// Write the rendered list and selector markup.
    Render {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Sign a participant up for an activity.
    Join {
        #[arg(long)]
        activity: String,
        #[arg(long)]
        email: String,
    },
    /// Remove a participant after confirmation.
    Remove {
        #[arg(long)]
        activity: String,
        #[arg(long)]
        email: String,
        /// Confirm without prompting.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    let client = HttpActivityClient::with_timeout(&settings.server_url, settings.request_timeout())
        .context("failed to set up the activity client")?;
    info!(server_url = client.server_url(), "using activity backend");

    let (prompt_tx, prompt_rx) = mpsc::unbounded_channel();
    let view = Arc::new(TerminalView::new(
        matches!(args.command, Command::List),
        prompt_tx,
    ));
    let page = SignupPage::new(Arc::new(client), view.clone(), settings.page_options());

    let outcome = match args.command {
        Command::List => page.dispatch(UiEvent::PageLoaded).await,
        Command::Render { out } => {
            let outcome = page.dispatch(UiEvent::PageLoaded).await;
            if outcome == FlowOutcome::Succeeded {
                let markup = view.page_markup();
                match out {
                    Some(path) => tokio::fs::write(&path, markup)
                        .await
                        .with_context(|| format!("failed to write '{}'", path.display()))?,
                    None => print!("{markup}"),
                }
            }
            outcome
        }
        Command::Join { activity, email } => {
            page.dispatch(UiEvent::SubmitSignup { email, activity })
                .await
        }
        Command::Remove {
            activity,
            email,
            yes,
        } => {
            let answering = tokio::spawn(answer_prompts(page.clone(), prompt_rx, yes));
            let outcome = page.remove_participant(&activity, &email).await;
            answering.abort();
            outcome
        }
    };

    Ok(match outcome {
        FlowOutcome::Succeeded | FlowOutcome::Declined => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
