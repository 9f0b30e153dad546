use crate::core::aggregator::{DuplicateRecord, MatchStats};
use crate::core::annotator::Annotation;
use crate::core::matcher::MatchTier;
use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod json;
pub mod text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// Match-rate statistics and bookkeeping of one annotation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Distinct source names, before collapsing
    pub source_taxa: usize,
    /// Rows written to the expected taxonomy table
    pub output_rows: usize,
    pub stats: MatchStats,
    pub duplicates: Vec<DuplicateRecord>,
    /// Column sums of the output table
    pub sample_totals: IndexMap<String, f64>,
    /// Lineages with at least one reference sequence id
    pub identified_lineages: usize,
}

impl MatchSummary {
    pub fn from_annotation(annotation: &Annotation) -> Self {
        Self {
            source_taxa: annotation.stats.total(),
            output_rows: annotation.canonical.len(),
            stats: annotation.stats,
            duplicates: annotation.duplicates.clone(),
            sample_totals: annotation
                .samples
                .iter()
                .cloned()
                .zip(annotation.sample_totals())
                .collect(),
            identified_lineages: annotation.identifiers.len(),
        }
    }

    pub fn percent(&self, tier: MatchTier) -> f64 {
        self.stats.percent(tier)
    }
}

pub struct ReportGenerator {
    format: Format,
}

impl ReportGenerator {
    pub fn new(format: Format) -> Self {
        Self { format }
    }

    pub fn generate(&self, summary: &MatchSummary) -> Result<String> {
        match self.format {
            Format::Text => text::generate_text_report(summary),
            Format::Json => json::generate_json_report(summary),
        }
    }
}
