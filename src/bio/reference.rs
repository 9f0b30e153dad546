/// Reference taxonomy tables: headerless `<sequence id><TAB><taxonomy>` rows
use crate::bio::taxonomy::{field_at_rank, TaxonomicRank};
use crate::TaxAnnotateError;
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// One reference sequence and the lineage it is annotated with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub taxonomy: String,
    pub genus_token: String,
    pub species_token: String,
    pub sequence_id: String,
}

impl ReferenceEntry {
    pub fn new(sequence_id: impl Into<String>, taxonomy: impl Into<String>, separator: &str) -> Self {
        let taxonomy = taxonomy.into();
        let genus_token = field_at_rank(&taxonomy, separator, TaxonomicRank::Genus)
            .unwrap_or_default()
            .to_string();
        let species_token = field_at_rank(&taxonomy, separator, TaxonomicRank::Species)
            .unwrap_or_default()
            .to_string();

        Self {
            taxonomy,
            genus_token,
            species_token,
            sequence_id: sequence_id.into(),
        }
    }
}

/// All reference rows in file order. Several rows may share a lineage.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    pub entries: Vec<ReferenceEntry>,
}

impl ReferenceTable {
    pub fn new(entries: Vec<ReferenceEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceEntry> {
        self.entries.iter()
    }

    /// Sequence ids grouped by exact lineage, in first-seen order
    pub fn ids_by_taxonomy(&self) -> IndexMap<&str, Vec<&str>> {
        let mut grouped: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for entry in &self.entries {
            grouped
                .entry(entry.taxonomy.as_str())
                .or_default()
                .push(entry.sequence_id.as_str());
        }
        grouped
    }
}

/// Parse a reference taxonomy table from any buffered reader
pub fn parse_reference_table<R: BufRead>(
    reader: R,
    separator: &str,
) -> Result<ReferenceTable, TaxAnnotateError> {
    let mut entries = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let row = line.trim();
        if row.is_empty() {
            continue;
        }

        let mut cells = row.split('\t');
        let (Some(sequence_id), Some(taxonomy)) = (cells.next(), cells.next()) else {
            return Err(TaxAnnotateError::Parse(format!(
                "Reference table line {}: expected '<sequence id>\\t<taxonomy>'",
                idx + 1
            )));
        };

        entries.push(ReferenceEntry::new(sequence_id, taxonomy, separator));
    }

    Ok(ReferenceTable { entries })
}

/// Load a reference taxonomy table from disk
pub fn load_reference_table<P: AsRef<Path>>(
    path: P,
    separator: &str,
) -> Result<ReferenceTable, TaxAnnotateError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = parse_reference_table(BufReader::new(file), separator).map_err(|e| match e {
        TaxAnnotateError::Parse(msg) => TaxAnnotateError::Parse(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;

    tracing::info!("Loaded {} reference entries from {}", table.len(), path.display());
    Ok(table)
}

/// Write `<taxonomy><TAB><id><TAB>...` rows
pub fn write_identifier_table<W, I, T, J, S>(writer: &mut W, rows: I) -> Result<(), TaxAnnotateError>
where
    W: Write,
    I: IntoIterator<Item = (T, J)>,
    T: AsRef<str>,
    J: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (taxonomy, ids) in rows {
        write!(writer, "{}", taxonomy.as_ref())?;
        for id in ids {
            write!(writer, "\t{}", id.as_ref())?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write an identifier table to disk
pub fn save_identifier_table<P, I, T, J, S>(path: P, rows: I) -> Result<(), TaxAnnotateError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (T, J)>,
    T: AsRef<str>,
    J: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_identifier_table(&mut writer, rows)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_reference_table() {
        let data = "0001\tk;p;c;o;Lactobacillaceae;Lactobacillus;plantarum\n\
                    0002\tk;p;c;o;Lactobacillaceae;Pediococcus;damnosus\n";
        let table = parse_reference_table(data.as_bytes(), ";").unwrap();

        assert_eq!(table.len(), 2);
        let entry = &table.entries[0];
        assert_eq!(entry.sequence_id, "0001");
        assert_eq!(entry.genus_token, "Lactobacillus");
        assert_eq!(entry.species_token, "plantarum");
    }

    #[test]
    fn test_shared_taxonomy_keeps_every_entry() {
        let data = "a\tk;g;s\nb\tk;g;s\nc\tk;g;t\n";
        let table = parse_reference_table(data.as_bytes(), ";").unwrap();
        assert_eq!(table.len(), 3);

        let grouped = table.ids_by_taxonomy();
        assert_eq!(grouped["k;g;s"], vec!["a", "b"]);
        assert_eq!(grouped["k;g;t"], vec!["c"]);
    }

    #[test]
    fn test_short_lineage_has_empty_genus() {
        let table = parse_reference_table("x\tUnassigned\n".as_bytes(), ";").unwrap();
        assert_eq!(table.entries[0].genus_token, "");
        assert_eq!(table.entries[0].species_token, "Unassigned");
    }

    #[test]
    fn test_missing_taxonomy_column_is_fatal() {
        let err = parse_reference_table("0001\n".as_bytes(), ";").unwrap_err();
        assert!(matches!(err, TaxAnnotateError::Parse(_)));
    }

    #[test]
    fn test_custom_separator() {
        let table = parse_reference_table("1\tk; f; Vibrio; cholerae\n".as_bytes(), "; ").unwrap();
        assert_eq!(table.entries[0].genus_token, "Vibrio");
        assert_eq!(table.entries[0].species_token, "cholerae");
    }

    #[test]
    fn test_write_identifier_table() {
        let ids = vec!["0001".to_string(), "0002".to_string()];
        let mut out = Vec::new();
        write_identifier_table(&mut out, vec![("k;g;s", ids.as_slice())]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "k;g;s\t0001\t0002\n");
    }
}
