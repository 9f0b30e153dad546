/// Drives matching, operator decisions and aggregation for a source table
use crate::bio::abundance::{SourceTable, SourceTaxon};
use crate::bio::reference::ReferenceTable;
use crate::core::aggregator::{Aggregator, CanonicalTaxon, DuplicateRecord, MatchStats};
use crate::core::config::AnnotateConfig;
use crate::core::matcher::{MatchResult, MatchTier, ScanResult, SequenceIds, TaxonomyMatcher};
use crate::core::resolver::{Selection, TaxonomyResolver};
use crate::TaxAnnotateError;
use indexmap::IndexMap;

/// Complete result of annotating one source table
#[derive(Debug, Clone)]
pub struct Annotation {
    pub samples: Vec<String>,
    pub canonical: IndexMap<String, CanonicalTaxon>,
    pub duplicates: Vec<DuplicateRecord>,
    /// Every species-level hit, whichever candidate the operator kept
    pub identifiers: SequenceIds,
    pub stats: MatchStats,
}

impl Annotation {
    /// Output rows as `(lineage, abundances)` pairs
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.canonical
            .iter()
            .map(|(taxonomy, taxon)| (taxonomy.as_str(), taxon.abundances.as_slice()))
    }

    /// Column sums of the output rows
    pub fn sample_totals(&self) -> Vec<f64> {
        crate::bio::abundance::column_totals(
            self.samples.len(),
            self.canonical.values().map(|t| t.abundances.as_slice()),
        )
    }
}

pub struct Annotator<'a, R: TaxonomyResolver> {
    matcher: TaxonomyMatcher<'a>,
    resolver: R,
    reference_label: String,
}

impl<'a, R: TaxonomyResolver> Annotator<'a, R> {
    pub fn new(reference: &'a ReferenceTable, config: &'a AnnotateConfig, resolver: R) -> Self {
        Self {
            matcher: TaxonomyMatcher::new(reference, config),
            resolver,
            reference_label: "the reference taxonomy".to_string(),
        }
    }

    /// Name of the reference shown to the operator, usually its path
    pub fn with_reference_label(mut self, label: impl Into<String>) -> Self {
        self.reference_label = label.into();
        self
    }

    /// Resolve one source taxon to exactly one lineage
    pub fn resolve(&mut self, taxon: &SourceTaxon) -> Result<MatchResult, TaxAnnotateError> {
        let scan = self.matcher.scan(taxon);
        self.resolve_scanned(taxon, &scan)
    }

    /// Annotate every taxon of `table` in file order
    pub fn annotate(&mut self, table: &SourceTable) -> Result<Annotation, TaxAnnotateError> {
        let mut aggregator = Aggregator::with_sample_count(table.samples.len());

        for taxon in table.taxa.values() {
            let scan = self.matcher.scan(taxon);
            // Ids are recorded before the operator narrows the candidates down
            aggregator.record_hits(&scan.species);
            let result = self.resolve_scanned(taxon, &scan)?;
            aggregator.fold(&taxon.name, &taxon.abundances, &result)?;
        }

        let (canonical, duplicates, identifiers, stats) = aggregator.into_parts();
        Ok(Annotation {
            samples: table.samples.clone(),
            canonical,
            duplicates,
            identifiers,
            stats,
        })
    }

    fn resolve_scanned(
        &mut self,
        taxon: &SourceTaxon,
        scan: &ScanResult,
    ) -> Result<MatchResult, TaxAnnotateError> {
        let result = match scan.tier() {
            Some(MatchTier::Species) => {
                let candidates = scan.candidates();
                let taxonomy = self.pick(&taxon.name, &candidates)?;
                MatchResult::Species { taxonomy }
            }
            Some(MatchTier::Genus) => {
                let candidates = scan.candidates();
                let taxonomy = self.pick(&taxon.name, &candidates)?;
                MatchResult::Genus { taxonomy }
            }
            _ => self.resolve_unmatched(taxon)?,
        };

        tracing::info!("{} -> {} ({})", taxon.name, result.taxonomy(), result.tier());
        Ok(result)
    }

    /// Family-level fallback, then manual entry
    fn resolve_unmatched(&mut self, taxon: &SourceTaxon) -> Result<MatchResult, TaxAnnotateError> {
        let family = self.matcher.family_candidates(&taxon.genus_token);

        for lineage in family.lineages {
            if self.resolver.confirm_family(&taxon.name, &lineage)? {
                return Ok(MatchResult::Family { taxonomy: lineage });
            }
            tracing::warn!("{}: family candidate {} declined", taxon.name, lineage);
        }

        let taxonomy = self.resolver.manual_entry(&taxon.name, &self.reference_label)?;
        Ok(MatchResult::Unresolved { taxonomy })
    }

    /// Use a lone candidate directly, otherwise ask the operator
    fn pick(&mut self, source_name: &str, candidates: &[String]) -> Result<String, TaxAnnotateError> {
        if let [only] = candidates {
            return Ok(only.clone());
        }

        match self
            .resolver
            .choose(source_name, candidates, &self.reference_label)?
        {
            Selection::Candidate(idx) if idx < candidates.len() => {
                Ok(candidates[idx].clone())
            }
            Selection::Candidate(idx) => {
                tracing::warn!(
                    "{}: selection {} is out of range (0-{}), switching to manual entry",
                    source_name,
                    idx,
                    candidates.len() - 1
                );
                self.manual(source_name)
            }
            Selection::NoneOfThese => self.manual(source_name),
        }
    }

    fn manual(&mut self, source_name: &str) -> Result<String, TaxAnnotateError> {
        self.resolver.manual_entry(source_name, &self.reference_label)
    }
}
