mod api;
mod config;
mod error;
mod models;
mod render;
mod session;
mod ui;
mod validation;
mod view;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::api::HaciendaClient;
use crate::config::{ClientConfig, DEFAULT_ENDPOINT};
use crate::render::{Rgb, Theme};
use crate::session::{run_lines, Session};
use crate::view::{OutputFormat, Presentation, TerminalView};

#[derive(Parser)]
#[command(name = "consulta-hacienda")]
#[command(version, about = "Look up a taxpayer in the Costa Rican Hacienda registry", long_about = None)]
struct Cli {
    /// Less output (errors and results only)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// More detail, including debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Result format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Colour scheme of the HTML result
    #[arg(long, global = true, value_enum, default_value_t = ThemeArg::Auto)]
    theme: ThemeArg,

    /// Host background colour (RRGGBB); picks the theme by its luminance
    #[arg(long, global = true)]
    background: Option<String>,

    /// Registry base URL
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT, hide = true)]
    endpoint: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (default): one identification per line
    Interactive,
    /// Single lookup; exits non-zero when it fails
    Query {
        /// Identification number, 9 to 12 digits
        identificacion: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Auto,
    Light,
    Dark,
}

impl Cli {
    fn theme(&self) -> Result<Theme> {
        if let Some(bg) = &self.background {
            let rgb = Rgb::parse_hex(bg)
                .with_context(|| format!("invalid background colour: {bg} (expected RRGGBB)"))?;
            return Ok(Theme::from_background(rgb));
        }

        Ok(match self.theme {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Auto => std::env::var("COLORFGBG")
                .ok()
                .and_then(|v| Theme::from_colorfgbg(&v))
                .unwrap_or_default(),
        })
    }

    fn client_config(&self) -> ClientConfig {
        ClientConfig::default().with_endpoint(self.endpoint.as_str())
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "consulta_hacienda=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    ui::init(cli.quiet, cli.verbose);
    init_tracing(cli.verbose);

    let presentation = Presentation {
        format: cli.format,
        theme: cli.theme()?,
    };
    let client = HaciendaClient::new(cli.client_config()).context("Failed to create HTTP client")?;
    ui::print_verbose(&format!("Endpoint: {}", client.config().endpoint));

    let mut session = Session::new(TerminalView::new(), Arc::new(client), presentation);

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            run_interactive(&mut session).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Query { identificacion } => Ok(run_query(&mut session, &identificacion).await),
    }
}

async fn run_query(session: &mut Session<TerminalView>, identificacion: &str) -> ExitCode {
    let Some(mut ticket) = session.submit(identificacion) else {
        return ExitCode::FAILURE;
    };

    let completion = ticket.wait().await;
    match session.complete(completion).await {
        Some(Ok(())) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

async fn run_interactive(session: &mut Session<TerminalView>) -> Result<()> {
    ui::print_header("Tax Information Lookup");
    ui::print_info("Enter an identification number (9 to 12 digits).");
    ui::print_verbose("Commands: :clear clears the results, :quit (or Ctrl-D) leaves.");

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };
    run_lines(session, BufReader::new(tokio::io::stdin()), interrupt)
        .await
        .context("Failed to read from stdin")?;

    ui::print_info("Bye.");
    Ok(())
}
