//! typist - runs one compilation round over a declaration manifest
//!
//! Diagnostics go to stderr; generated source goes to `--output` or stdout.
//! Exits non-zero when the round reports an error.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use typist_cli::{emit, report, Format, Manifest};

#[derive(Parser, Debug)]
#[command(name = "typist")]
#[command(about = "Compile command declarations into command tree factories")]
struct Cli {
    /// Path to a JSON declaration manifest
    manifest: PathBuf,

    /// File to write generated source to (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only report diagnostics, generate nothing
    #[arg(long)]
    check: bool,

    /// How diagnostics are reported
    #[arg(long, value_enum, default_value_t = Format::Pretty)]
    format: Format,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "typist=info,typist_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    info!("Loading manifest from: {}", cli.manifest.display());
    let manifest = Manifest::load(&cli.manifest)?;

    match manifest.compile() {
        Ok(output) => {
            report(&output.warnings, cli.format, &mut io::stderr()).context("failed to report diagnostics")?;
            if !cli.check {
                emit(&output.source, cli.output.as_deref())?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(diagnostics) => {
            report(&diagnostics, cli.format, &mut io::stderr()).context("failed to report diagnostics")?;
            let errors = diagnostics.iter().filter(|d| d.is_error()).count();
            error!(errors, "compilation failed");
            Ok(ExitCode::FAILURE)
        }
    }
}
