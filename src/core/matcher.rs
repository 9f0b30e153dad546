/// Tiered lookup of source taxa against a reference taxonomy
use crate::bio::abundance::SourceTaxon;
use crate::bio::reference::ReferenceTable;
use crate::bio::taxonomy::{field_at_rank, truncate_to_rank, TaxonomicRank};
use crate::core::config::AnnotateConfig;
use crate::core::family::infer_family_name;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Match quality, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Species,
    Genus,
    Family,
    Unresolved,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Species => write!(f, "species"),
            Self::Genus => write!(f, "genus"),
            Self::Family => write!(f, "family"),
            Self::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// Final resolution of one source taxon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// Full reference lineage, or the operator's replacement for the candidates
    Species { taxonomy: String },
    /// Reference lineage down to genus, species placeholder appended
    Genus { taxonomy: String },
    /// Reference lineage down to an inferred family, placeholders appended
    Family { taxonomy: String },
    /// Lineage typed in by the operator
    Unresolved { taxonomy: String },
}

impl MatchResult {
    pub fn tier(&self) -> MatchTier {
        match self {
            Self::Species { .. } => MatchTier::Species,
            Self::Genus { .. } => MatchTier::Genus,
            Self::Family { .. } => MatchTier::Family,
            Self::Unresolved { .. } => MatchTier::Unresolved,
        }
    }

    pub fn taxonomy(&self) -> &str {
        match self {
            Self::Species { taxonomy }
            | Self::Genus { taxonomy }
            | Self::Family { taxonomy }
            | Self::Unresolved { taxonomy } => taxonomy,
        }
    }
}

/// Sequence ids per full reference lineage. Lineages and ids keep first-hit
/// order and every id is stored once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceIds {
    by_lineage: IndexMap<String, IndexSet<String>>,
}

impl SequenceIds {
    pub fn insert(&mut self, lineage: &str, sequence_id: &str) {
        match self.by_lineage.get_mut(lineage) {
            Some(ids) => {
                ids.insert(sequence_id.to_string());
            }
            None => {
                self.by_lineage.insert(
                    lineage.to_string(),
                    IndexSet::from([sequence_id.to_string()]),
                );
            }
        }
    }

    /// Add every lineage and id of `other`, keeping existing order
    pub fn merge(&mut self, other: &SequenceIds) {
        for (lineage, ids) in &other.by_lineage {
            self.by_lineage
                .entry(lineage.clone())
                .or_default()
                .extend(ids.iter().cloned());
        }
    }

    pub fn get(&self, lineage: &str) -> Option<&IndexSet<String>> {
        self.by_lineage.get(lineage)
    }

    pub fn contains_lineage(&self, lineage: &str) -> bool {
        self.by_lineage.contains_key(lineage)
    }

    pub fn lineages(&self) -> impl Iterator<Item = &str> {
        self.by_lineage.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.by_lineage.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.by_lineage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_lineage.is_empty()
    }
}

/// Everything one pass over the reference found for a source taxon
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Distinct full lineages matching genus and species, with their sequence ids
    pub species: SequenceIds,
    /// Distinct genus-level lineages matching the genus only
    pub genus: IndexSet<String>,
}

impl ScanResult {
    /// Best tier reached by the scan, `None` when nothing matched
    pub fn tier(&self) -> Option<MatchTier> {
        if !self.species.is_empty() {
            Some(MatchTier::Species)
        } else if !self.genus.is_empty() {
            Some(MatchTier::Genus)
        } else {
            None
        }
    }

    /// Candidate lineages at the winning tier, in reference order
    pub fn candidates(&self) -> Vec<String> {
        match self.tier() {
            Some(MatchTier::Species) => self.species.lineages().map(String::from).collect(),
            Some(MatchTier::Genus) => self.genus.iter().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// Family-level fallback for a genus that matched nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyCandidates {
    /// Family name inferred from the genus token
    pub family_name: String,
    /// Distinct reference lineages cut to that family, in reference order
    pub lineages: Vec<String>,
}

pub struct TaxonomyMatcher<'a> {
    reference: &'a ReferenceTable,
    config: &'a AnnotateConfig,
}

impl<'a> TaxonomyMatcher<'a> {
    pub fn new(reference: &'a ReferenceTable, config: &'a AnnotateConfig) -> Self {
        Self { reference, config }
    }

    /// Scan the whole reference for genus and species hits.
    ///
    /// The scan never stops early: every species-level lineage has to be
    /// collected for disambiguation and for the identifier table.
    pub fn scan(&self, taxon: &SourceTaxon) -> ScanResult {
        let mut result = ScanResult::default();
        if taxon.genus_token.is_empty() {
            return result;
        }

        for entry in self.reference.iter() {
            if !entry.genus_token.contains(taxon.genus_token.as_str()) {
                continue;
            }

            let species_hit = taxon
                .species_token
                .as_deref()
                .is_some_and(|species| entry.species_token.contains(species));

            if species_hit {
                result.species.insert(&entry.taxonomy, &entry.sequence_id);
            } else if let Some(lineage) = truncate_to_rank(
                &entry.taxonomy,
                &self.config.separator,
                TaxonomicRank::Genus,
                &self.config.genus_placeholder,
                &self.config.species_placeholder,
            ) {
                result.genus.insert(lineage);
            }
        }

        tracing::debug!(
            "{}: {} species-level and {} genus-level lineages",
            taxon.name,
            result.species.len(),
            result.genus.len()
        );
        result
    }

    /// Reference lineages whose family field contains the family name
    /// inferred from `genus_token`
    pub fn family_candidates(&self, genus_token: &str) -> FamilyCandidates {
        let family_name = infer_family_name(genus_token);
        let mut lineages: IndexSet<String> = IndexSet::new();

        if !genus_token.is_empty() {
            for entry in self.reference.iter() {
                let Some(family_field) =
                    field_at_rank(&entry.taxonomy, &self.config.separator, TaxonomicRank::Family)
                else {
                    continue;
                };
                if !family_field.contains(family_name.as_str()) {
                    continue;
                }
                if let Some(lineage) = truncate_to_rank(
                    &entry.taxonomy,
                    &self.config.separator,
                    TaxonomicRank::Family,
                    &self.config.genus_placeholder,
                    &self.config.species_placeholder,
                ) {
                    lineages.insert(lineage);
                }
            }
        }

        tracing::debug!(
            "{} -> {} ({} family-level lineages)",
            genus_token,
            family_name,
            lineages.len()
        );
        FamilyCandidates {
            family_name,
            lineages: lineages.into_iter().collect(),
        }
    }
}
