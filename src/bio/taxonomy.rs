/// Lineage helpers for separator-delimited taxonomy strings
use serde::{Deserialize, Serialize};

/// Ranks the annotator reasons about, counted back from the leaf of a lineage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaxonomicRank {
    Family,
    Genus,
    Species,
}

impl TaxonomicRank {
    /// Distance from the last field of a full-length lineage
    pub fn offset_from_leaf(&self) -> usize {
        match self {
            Self::Species => 0,
            Self::Genus => 1,
            Self::Family => 2,
        }
    }
}

/// Split a lineage on the configured separator
pub fn split_lineage<'a>(taxonomy: &'a str, separator: &str) -> Vec<&'a str> {
    taxonomy.split(separator).collect()
}

/// Field of a lineage at the given rank, assuming the lineage ends at species
pub fn field_at_rank<'a>(taxonomy: &'a str, separator: &str, rank: TaxonomicRank) -> Option<&'a str> {
    let fields = split_lineage(taxonomy, separator);
    let offset = rank.offset_from_leaf();
    if fields.len() <= offset {
        return None;
    }
    Some(fields[fields.len() - 1 - offset])
}

/// Keep the lineage up to and including `rank` and fill every lower rank
/// with its placeholder.
///
/// `k;p;c;o;f;g;s` truncated at `Genus` becomes `k;p;c;o;f;g;s__`, at
/// `Family` it becomes `k;p;c;o;f;g__;s__`. Returns `None` when the lineage is
/// too short to carry the requested rank.
pub fn truncate_to_rank(
    taxonomy: &str,
    separator: &str,
    rank: TaxonomicRank,
    genus_placeholder: &str,
    species_placeholder: &str,
) -> Option<String> {
    let fields = split_lineage(taxonomy, separator);
    let offset = rank.offset_from_leaf();
    if fields.len() <= offset {
        return None;
    }

    let mut kept: Vec<&str> = fields[..fields.len() - offset].to_vec();
    if rank < TaxonomicRank::Genus {
        kept.push(genus_placeholder);
    }
    if rank < TaxonomicRank::Species {
        kept.push(species_placeholder);
    }
    Some(kept.join(separator))
}

/// Genus and species tokens of a free-text source name.
///
/// Source names always use `;` between ranks regardless of the reference
/// separator. The leaf is split on spaces and underscores so that rank labels
/// such as `D_11__` do not leak into the tokens; empty pieces are skipped.
pub fn leaf_tokens(name: &str) -> (String, Option<String>) {
    let leaf = name.rsplit(';').next().unwrap_or(name);
    let mut tokens = leaf
        .split(|c: char| c == ' ' || c == '_' || c.is_whitespace())
        .filter(|t| !t.is_empty());

    let genus = tokens.next().unwrap_or_default().to_string();
    let species = tokens.next().map(|s| s.to_string());
    (genus, species)
}
