/// Collapses source taxa that resolve to the same lineage
use crate::core::matcher::{MatchResult, MatchTier, SequenceIds};
use crate::TaxAnnotateError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One output row: a resolved lineage and its summed abundances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTaxon {
    /// First source name that resolved to this lineage
    pub source_name: String,
    pub abundances: Vec<f64>,
}

/// A source name folded into a lineage that already had a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRecord {
    pub source_name: String,
    pub taxonomy: String,
}

/// Per-tier counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub species: usize,
    pub genus: usize,
    pub family: usize,
    pub unresolved: usize,
}

impl MatchStats {
    pub fn record(&mut self, tier: MatchTier) {
        match tier {
            MatchTier::Species => self.species += 1,
            MatchTier::Genus => self.genus += 1,
            MatchTier::Family => self.family += 1,
            MatchTier::Unresolved => self.unresolved += 1,
        }
    }

    pub fn count(&self, tier: MatchTier) -> usize {
        match tier {
            MatchTier::Species => self.species,
            MatchTier::Genus => self.genus,
            MatchTier::Family => self.family,
            MatchTier::Unresolved => self.unresolved,
        }
    }

    pub fn total(&self) -> usize {
        self.species + self.genus + self.family + self.unresolved
    }

    /// Share of all source taxa resolved at `tier`, in percent
    pub fn percent(&self, tier: MatchTier) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(tier) as f64 / total as f64 * 100.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    width: Option<usize>,
    canonical: IndexMap<String, CanonicalTaxon>,
    duplicates: Vec<DuplicateRecord>,
    identifiers: SequenceIds,
    stats: MatchStats,
}

impl Aggregator {
    /// Aggregator that rejects abundance vectors of any other length
    pub fn with_sample_count(samples: usize) -> Self {
        Self {
            width: Some(samples),
            ..Self::default()
        }
    }

    /// Fold one resolved source taxon into the output rows
    pub fn fold(
        &mut self,
        source_name: &str,
        abundances: &[f64],
        result: &MatchResult,
    ) -> Result<(), TaxAnnotateError> {
        let width = *self.width.get_or_insert(abundances.len());
        if abundances.len() != width {
            return Err(TaxAnnotateError::Other(format!(
                "'{}' has {} abundance values, expected {}",
                source_name,
                abundances.len(),
                width
            )));
        }

        self.stats.record(result.tier());

        let taxonomy = result.taxonomy();
        match self.canonical.get_mut(taxonomy) {
            Some(existing) => {
                for (total, value) in existing.abundances.iter_mut().zip(abundances) {
                    *total += value;
                }
                tracing::debug!("{} collapsed into existing row {}", source_name, taxonomy);
                self.duplicates.push(DuplicateRecord {
                    source_name: source_name.to_string(),
                    taxonomy: taxonomy.to_string(),
                });
            }
            None => {
                self.canonical.insert(
                    taxonomy.to_string(),
                    CanonicalTaxon {
                        source_name: source_name.to_string(),
                        abundances: abundances.to_vec(),
                    },
                );
            }
        }

        Ok(())
    }

    /// Keep the sequence ids of every species-level hit, keyed by full
    /// reference lineage rather than by output row
    pub fn record_hits(&mut self, hits: &SequenceIds) {
        self.identifiers.merge(hits);
    }

    pub fn canonical(&self) -> &IndexMap<String, CanonicalTaxon> {
        &self.canonical
    }

    pub fn duplicates(&self) -> &[DuplicateRecord] {
        &self.duplicates
    }

    pub fn identifiers(&self) -> &SequenceIds {
        &self.identifiers
    }

    pub fn stats(&self) -> MatchStats {
        self.stats
    }

    pub fn into_parts(
        self,
    ) -> (
        IndexMap<String, CanonicalTaxon>,
        Vec<DuplicateRecord>,
        SequenceIds,
        MatchStats,
    ) {
        (self.canonical, self.duplicates, self.identifiers, self.stats)
    }
}
