pub mod bio;
pub mod cli;
pub mod core;
pub mod report;

pub use crate::core::{annotator::Annotator, matcher::TaxonomyMatcher};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaxAnnotateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TaxAnnotateError>;
