/// Source abundance tables: `Taxonomy<TAB>Sample1<TAB>...` followed by one
/// row per free-text taxon name.
use crate::bio::taxonomy::leaf_tokens;
use crate::TaxAnnotateError;
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// A distinct source name with its extracted tokens and summed abundances
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTaxon {
    pub name: String,
    pub genus_token: String,
    pub species_token: Option<String>,
    pub abundances: Vec<f64>,
}

impl SourceTaxon {
    pub fn new(name: impl Into<String>, abundances: Vec<f64>) -> Self {
        let name = name.into();
        let (genus_token, species_token) = leaf_tokens(&name);
        Self {
            name,
            genus_token,
            species_token,
            abundances,
        }
    }
}

/// Parsed source table, rows keyed by full source name in file order
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    pub samples: Vec<String>,
    pub taxa: IndexMap<String, SourceTaxon>,
}

impl SourceTable {
    pub fn len(&self) -> usize {
        self.taxa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taxa.is_empty()
    }
}

/// Sum abundance rows column-wise
pub fn column_totals<'a>(width: usize, rows: impl IntoIterator<Item = &'a [f64]>) -> Vec<f64> {
    let mut totals = vec![0.0; width];
    for row in rows {
        for (total, value) in totals.iter_mut().zip(row) {
            *total += value;
        }
    }
    totals
}

/// Element-wise sum of two abundance vectors of equal length
pub fn add_abundances(left: &[f64], right: &[f64]) -> Vec<f64> {
    left.iter().zip(right).map(|(a, b)| a + b).collect()
}

/// Parse a source abundance table from any buffered reader
pub fn parse_source_table<R: BufRead>(reader: R) -> Result<SourceTable, TaxAnnotateError> {
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => {
                return Err(TaxAnnotateError::Parse(
                    "Source table is empty (missing header row)".to_string(),
                ))
            }
        }
    };

    let samples: Vec<String> = header
        .trim()
        .split('\t')
        .skip(1)
        .map(|s| s.to_string())
        .collect();

    let mut taxa: IndexMap<String, SourceTaxon> = IndexMap::new();

    for (idx, line) in lines {
        let line = line?;
        let line_no = idx + 1;
        let row = line.trim();
        if row.is_empty() {
            continue;
        }

        let cells: Vec<&str> = row.split('\t').collect();
        if cells.len() != samples.len() + 1 {
            return Err(TaxAnnotateError::Parse(format!(
                "Source table line {}: expected {} columns, found {}",
                line_no,
                samples.len() + 1,
                cells.len()
            )));
        }

        let name = cells[0];
        let abundances = cells[1..]
            .iter()
            .map(|cell| {
                cell.trim().parse::<f64>().map_err(|_| {
                    TaxAnnotateError::Parse(format!(
                        "Source table line {}: non-numeric abundance '{}' for '{}'",
                        line_no, cell, name
                    ))
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        match taxa.get_mut(name) {
            Some(existing) => {
                tracing::debug!("Collapsing repeated source row '{}' (line {})", name, line_no);
                existing.abundances = add_abundances(&existing.abundances, &abundances);
            }
            None => {
                taxa.insert(name.to_string(), SourceTaxon::new(name, abundances));
            }
        }
    }

    Ok(SourceTable { samples, taxa })
}

/// Load a source abundance table from disk
pub fn load_source_table<P: AsRef<Path>>(path: P) -> Result<SourceTable, TaxAnnotateError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = parse_source_table(BufReader::new(file)).map_err(|e| match e {
        TaxAnnotateError::Parse(msg) => TaxAnnotateError::Parse(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;

    tracing::info!(
        "Loaded {} source taxa across {} samples from {}",
        table.len(),
        table.samples.len(),
        path.display()
    );
    Ok(table)
}

/// Write an abundance table with ten decimal places per cell
pub fn write_abundance_table<'a, W: Write>(
    writer: &mut W,
    samples: &[String],
    rows: impl IntoIterator<Item = (&'a str, &'a [f64])>,
) -> Result<(), TaxAnnotateError> {
    writeln!(writer, "Taxonomy\t{}", samples.join("\t"))?;
    for (taxonomy, abundances) in rows {
        let cells: Vec<String> = abundances.iter().map(|n| format!("{:.10}", n)).collect();
        writeln!(writer, "{}\t{}", taxonomy, cells.join("\t"))?;
    }
    Ok(())
}

/// Write an abundance table to disk
pub fn save_abundance_table<'a, P: AsRef<Path>>(
    path: P,
    samples: &[String],
    rows: impl IntoIterator<Item = (&'a str, &'a [f64])>,
) -> Result<(), TaxAnnotateError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_abundance_table(&mut writer, samples, rows)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_source_table() {
        let data = "Taxonomy\tSample1\tSample2\n\
                    Lactobacillus plantarum\t0.5\t0.25\n\
                    Pediococcus damnosus\t0.5\t0.75\n";

        let table = parse_source_table(data.as_bytes()).unwrap();
        assert_eq!(table.samples, vec!["Sample1", "Sample2"]);
        assert_eq!(table.len(), 2);

        let first = &table.taxa["Lactobacillus plantarum"];
        assert_eq!(first.genus_token, "Lactobacillus");
        assert_eq!(first.species_token.as_deref(), Some("plantarum"));
        assert_eq!(first.abundances, vec![0.5, 0.25]);
    }

    #[test]
    fn test_repeated_names_are_collapsed() {
        let data = "Taxonomy\tS1\nLactobacillus brevis\t0.25\nPediococcus damnosus\t0.5\nLactobacillus brevis\t0.25\n";

        let table = parse_source_table(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.taxa["Lactobacillus brevis"].abundances, vec![0.5]);
        // First occurrence keeps its position
        assert_eq!(table.taxa.get_index(0).unwrap().0, "Lactobacillus brevis");
    }

    #[test]
    fn test_non_numeric_abundance_is_fatal() {
        let data = "Taxonomy\tS1\nLactobacillus brevis\tabc\n";
        let err = parse_source_table(data.as_bytes()).unwrap_err();
        assert!(matches!(err, TaxAnnotateError::Parse(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_wrong_column_count_is_fatal() {
        let data = "Taxonomy\tS1\tS2\nLactobacillus brevis\t0.1\n";
        assert!(matches!(
            parse_source_table(data.as_bytes()),
            Err(TaxAnnotateError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_input_is_fatal() {
        assert!(parse_source_table("".as_bytes()).is_err());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let data = "Taxonomy\tS1\n\nLactobacillus brevis\t1.0\n\n";
        let table = parse_source_table(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_write_abundance_table() {
        let samples = vec!["S1".to_string(), "S2".to_string()];
        let abundances = vec![0.5, 1.0 / 3.0];
        let mut out = Vec::new();
        write_abundance_table(&mut out, &samples, vec![("k;p;g;s", abundances.as_slice())]).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Taxonomy\tS1\tS2\nk;p;g;s\t0.5000000000\t0.3333333333\n"
        );
    }

    #[test]
    fn test_column_totals() {
        let data = "Taxonomy\tS1\tS2\nA a\t0.25\t1\nB b\t0.75\t2\n";
        let table = parse_source_table(data.as_bytes()).unwrap();
        let totals = column_totals(
            table.samples.len(),
            table.taxa.values().map(|t| t.abundances.as_slice()),
        );
        assert_eq!(totals, vec![1.0, 3.0]);
    }
}
