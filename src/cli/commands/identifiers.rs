use crate::bio::reference::{load_reference_table, write_identifier_table, ReferenceTable};
use crate::cli::output::*;
use crate::TaxAnnotateError;
use anyhow::Context;
use clap::Args;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct IdentifiersArgs {
    /// Taxonomy table whose first column holds the expected taxonomy strings
    #[arg(short = 'i', long = "infile", value_name = "FILE")]
    pub infile: PathBuf,

    /// Where to write `<taxonomy><TAB><ids...>` rows
    #[arg(short = 'o', long = "outfile", value_name = "FILE")]
    pub outfile: PathBuf,

    /// Reference taxonomy: <sequence id><TAB><taxonomy> per line
    #[arg(short = 'r', long = "ref-taxa", value_name = "FILE")]
    pub ref_taxa: PathBuf,

    /// String separating ranks in the reference taxonomy
    #[arg(short = 'p', long, default_value = ";")]
    pub separator: String,
}

/// Outcome of matching expected taxonomy strings to reference ids
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentifierMatches {
    /// Rows found in the reference, in input order
    pub rows: Vec<(String, Vec<String>)>,
    /// Strings with no exact reference entry
    pub missing: Vec<String>,
}

/// First column of every non-blank row after the header
pub fn read_taxonomy_column<R: BufRead>(reader: R) -> Result<Vec<String>, TaxAnnotateError> {
    let mut taxa = Vec::new();
    for line in reader.lines().skip(1) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if let Some(first) = line.split('\t').next() {
            taxa.push(first.trim().to_string());
        }
    }
    Ok(taxa)
}

/// Look up the sequence ids of each taxonomy string by exact match
pub fn match_identifiers(taxa: &[String], reference: &ReferenceTable) -> IdentifierMatches {
    let grouped = reference.ids_by_taxonomy();
    let mut matches = IdentifierMatches::default();

    for taxonomy in taxa {
        match grouped.get(taxonomy.as_str()) {
            Some(ids) => matches.rows.push((
                taxonomy.clone(),
                ids.iter().map(|id| id.to_string()).collect(),
            )),
            None => {
                tracing::debug!("No reference entry for {}", taxonomy);
                matches.missing.push(taxonomy.clone());
            }
        }
    }

    matches
}

pub fn run(args: IdentifiersArgs) -> anyhow::Result<()> {
    if args.separator.is_empty() {
        return Err(TaxAnnotateError::Config("Separator must not be empty".to_string()).into());
    }

    let pb = create_spinner(&format!("Loading {}...", args.ref_taxa.display()));
    let reference = load_reference_table(&args.ref_taxa, &args.separator)?;
    pb.finish_and_clear();

    let file = File::open(&args.infile)
        .with_context(|| format!("Failed to open {}", args.infile.display()))?;
    let taxa = read_taxonomy_column(BufReader::new(file))?;

    let matches = match_identifiers(&taxa, &reference);
    if !matches.missing.is_empty() {
        tracing::warn!(
            "{} of {} taxonomy strings have no reference entry",
            matches.missing.len(),
            taxa.len()
        );
    }

    let out = File::create(&args.outfile)
        .with_context(|| format!("Failed to create {}", args.outfile.display()))?;
    let mut writer = BufWriter::new(out);
    write_identifier_table(
        &mut writer,
        matches
            .rows
            .iter()
            .map(|(taxonomy, ids)| (taxonomy.as_str(), ids.as_slice())),
    )?;
    writer.flush()?;

    success(&format!(
        "Wrote identifiers for {} of {} taxonomy strings",
        format_number(matches.rows.len()),
        format_number(taxa.len())
    ));
    tree_item(
        matches.missing.is_empty(),
        "Output",
        Some(&args.outfile.display().to_string()),
    );
    if !matches.missing.is_empty() {
        tree_item(true, "Not in reference", Some(&format_number(matches.missing.len())));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::reference::parse_reference_table;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_taxonomy_column_skips_header() {
        let data = "Taxonomy\tS1\nk;p;c;o;f;g;s\t0.5\n\nk;p;c;o;f;g__;s__\t0.5\n";
        let taxa = read_taxonomy_column(data.as_bytes()).unwrap();
        assert_eq!(taxa, vec!["k;p;c;o;f;g;s", "k;p;c;o;f;g__;s__"]);
    }

    #[test]
    fn test_match_identifiers_groups_and_skips() {
        let reference = parse_reference_table(
            "id1\tk;p;c;o;f;g;s\nid2\tk;p;c;o;f;g;t\nid3\tk;p;c;o;f;g;s\n".as_bytes(),
            ";",
        )
        .unwrap();
        let taxa = vec!["k;p;c;o;f;g;s".to_string(), "k;p;c;o;f;g__;s__".to_string()];

        let matches = match_identifiers(&taxa, &reference);
        assert_eq!(
            matches.rows,
            vec![(
                "k;p;c;o;f;g;s".to_string(),
                vec!["id1".to_string(), "id3".to_string()]
            )]
        );
        assert_eq!(matches.missing, vec!["k;p;c;o;f;g__;s__".to_string()]);
    }
}
