mod commands;
mod error;
mod http;
mod intake;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{entries, serve, submit, theme, Context};
use crate::error::{exit_code_for, report_error};
use entourage_config as config;

#[derive(Debug, Parser)]
#[command(name = "entourage", version, about = "Entourage waitlist service")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the waitlist HTTP API
    Serve(serve::ServeArgs),
    /// Apply database migrations
    Migrate,
    /// List waitlist entries, newest first
    List,
    /// Submit a signup to a running server
    Submit(submit::SubmitArgs),
    #[command(subcommand)]
    Theme(theme::ThemeCommand),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose, matches!(cli.command, Command::Serve(_)));
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) if path.exists() => debug!(path = %path.display(), "config resolved"),
            Ok(path) => debug!(path = %path.display(), "config missing, using defaults"),
            Err(err) => debug!(error = %err, "config unavailable"),
        }
    }

    let ctx = Context {
        db_path,
        json,
        config: &app_config,
    };

    match command {
        Command::Serve(args) => serve::serve(&ctx, args),
        Command::Migrate => entries::migrate(&ctx),
        Command::List => entries::list(&ctx),
        Command::Submit(args) => submit::submit(&ctx, args),
        Command::Theme(cmd) => match cmd {
            theme::ThemeCommand::Show(args) => theme::show(&ctx, args),
            theme::ThemeCommand::Toggle(args) => theme::toggle(&ctx, args),
            theme::ThemeCommand::Set(args) => theme::set(&ctx, args),
        },
    }
}

fn init_logging(verbose: bool, serving: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = match (verbose, serving) {
        (true, _) => "debug",
        (false, true) => "info",
        (false, false) => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = fmt().with_env_filter(filter).with_target(false);
    let _ = if serving {
        builder.try_init()
    } else {
        builder.without_time().try_init()
    };
}
