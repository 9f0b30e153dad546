pub mod commands;
pub mod interactive;
pub mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "taxannotate",
    version,
    about = "Reconcile mock-community taxonomy names against a reference taxonomy",
    long_about = "taxannotate builds expected-taxonomy tables for mock microbial communities. \
                  Free-text genus/species names are matched against a reference taxonomy at \
                  species, genus or inferred family level; anything left over is resolved \
                  interactively."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate full taxonomy strings for a list of source genus/species names
    Annotate(commands::annotate::AnnotateArgs),

    /// Extract reference sequence identifiers for expected taxonomy strings
    Identifiers(commands::identifiers::IdentifiersArgs),
}
