//! Bounce CLI - find and manage campus clubs from the terminal.
//!
//! Every subcommand goes through the `bounce-core` API client. The
//! session from `bounce login` is saved so later invocations stay
//! signed in until `bounce logout`.

mod app;
mod commands;
mod messages;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use commands::{ClubCommand, MembershipCommand, UserCommand};

#[derive(Debug, Parser)]
#[command(name = "bounce", version, about = "Find and manage campus clubs on Bounce")]
struct Cli {
    /// Bounce API base URL (overrides config and BOUNCE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and save the session
    Login {
        /// Defaults to the last username that signed in
        username: Option<String>,
        /// Remember the password in the OS keychain
        #[arg(long)]
        remember: bool,
    },
    /// Sign out and drop the saved session
    Logout {
        /// Also forget the remembered password
        #[arg(long)]
        forget: bool,
    },
    /// Show who is signed in
    Whoami,
    /// Manage users
    #[command(subcommand)]
    User(UserCommand),
    /// Browse and manage clubs
    #[command(subcommand)]
    Club(ClubCommand),
    /// View and manage club memberships
    #[command(subcommand)]
    Membership(MembershipCommand),
}

/// Initialize the tracing subscriber for logging.
/// The returned guard must live until exit so file logs are flushed.
fn init_tracing(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Log file path has no file name"))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            Ok(None)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut app = App::new(cli.api_url)?;

    match cli.command {
        Command::Login { username, remember } => app.login(username, remember).await,
        Command::Logout { forget } => app.logout(forget),
        Command::Whoami => app.whoami(),
        Command::User(command) => commands::run_user(&app, command).await,
        Command::Club(command) => commands::run_club(&app, command).await,
        Command::Membership(command) => commands::run_membership(&app, command).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_file.as_deref())?;
    info!("Bounce CLI starting");

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
