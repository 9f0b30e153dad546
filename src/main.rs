use clap::Parser;
use colored::*;
use std::process;
use taxannotate::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Initialize logging with TAXANNOTATE_LOG environment variable support.
    // Stays quiet by default so the interactive prompts remain readable.
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let log_level =
        std::env::var("TAXANNOTATE_LOG").unwrap_or_else(|_| default_level.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<taxannotate::TaxAnnotateError>() {
            Some(taxannotate::TaxAnnotateError::Config(_)) => 2,
            Some(taxannotate::TaxAnnotateError::Io(_)) => 3,
            Some(taxannotate::TaxAnnotateError::Parse(_)) => 4,
            Some(taxannotate::TaxAnnotateError::Prompt(_)) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Annotate(args) => taxannotate::cli::commands::annotate::run(args),
        Commands::Identifiers(args) => taxannotate::cli::commands::identifiers::run(args),
    }
}
