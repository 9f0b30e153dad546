use crate::bio::abundance::{load_source_table, save_abundance_table};
use crate::bio::reference::{load_reference_table, save_identifier_table};
use crate::cli::interactive::ConsoleResolver;
use crate::cli::output::*;
use crate::core::annotator::{Annotation, Annotator};
use crate::core::config::{load_config, AnnotateConfig};
use crate::core::matcher::MatchTier;
use crate::core::resolver::{AnswerSheet, RecordingResolver, ScriptedResolver, TaxonomyResolver};
use crate::report::{Format, MatchSummary, ReportGenerator};
use anyhow::Context;
use clap::Args;
use comfy_table::Cell;
use std::path::{Path, PathBuf};

pub const EXPECTED_TAXONOMY_FILE: &str = "expected-taxonomy.tsv";
pub const DATABASE_IDENTIFIERS_FILE: &str = "database-identifiers.tsv";

#[derive(Args, Debug, Clone)]
pub struct AnnotateArgs {
    /// Tab-separated source names and abundances (header: Taxonomy<TAB>Sample1...)
    #[arg(short = 'i', long = "infile", value_name = "FILE")]
    pub infile: PathBuf,

    /// Directory in which to write the annotated taxonomy files
    #[arg(short = 'o', long = "outdir", value_name = "DIR")]
    pub outdir: PathBuf,

    /// Reference taxonomy: <sequence id><TAB><taxonomy> per line
    #[arg(short = 'r', long = "ref-taxa", value_name = "FILE")]
    pub ref_taxa: PathBuf,

    /// String separating ranks in the reference taxonomy [default: ";"]
    #[arg(short = 'p', long)]
    pub separator: Option<String>,

    /// Placeholder for ranks with no genus-level match [default: "g__"]
    #[arg(short = 'g', long = "genus")]
    pub genus_placeholder: Option<String>,

    /// Placeholder for ranks with no species-level match [default: "s__"]
    #[arg(short = 's', long = "species")]
    pub species_placeholder: Option<String>,

    /// TOML file with separator and placeholder settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Replay operator answers from a TOML answer sheet instead of prompting
    #[arg(long, value_name = "FILE")]
    pub answers: Option<PathBuf>,

    /// Record every operator answer to a TOML answer sheet
    #[arg(long, value_name = "FILE")]
    pub save_answers: Option<PathBuf>,

    /// Write the match summary to this file
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// Format of the summary file
    #[arg(long, value_enum, default_value_t = Format::Json)]
    pub summary_format: Format,
}

impl AnnotateArgs {
    /// Settings from `--config` (or defaults) with explicit flags applied on top
    pub fn effective_config(&self) -> anyhow::Result<AnnotateConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => AnnotateConfig::default(),
        };

        if let Some(separator) = &self.separator {
            config.separator = separator.clone();
        }
        if let Some(genus) = &self.genus_placeholder {
            config.genus_placeholder = genus.clone();
        }
        if let Some(species) = &self.species_placeholder {
            config.species_placeholder = species.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn run(args: AnnotateArgs) -> anyhow::Result<()> {
    let config = args.effective_config()?;

    let mut resolver: Box<dyn TaxonomyResolver> = match &args.answers {
        Some(path) => {
            let sheet = AnswerSheet::load(path)
                .with_context(|| format!("Failed to load answer sheet {}", path.display()))?;
            Box::new(ScriptedResolver::new(sheet))
        }
        None => Box::new(ConsoleResolver::new()?),
    };

    let annotation = match &args.save_answers {
        Some(path) => {
            let mut recorder = RecordingResolver::new(resolver.as_mut());
            let outcome = execute(&args, &config, &mut recorder);
            // Keep whatever was answered so an aborted run can be replayed
            if !recorder.sheet().is_empty() {
                recorder.sheet().save(path)?;
                info(&format!("Answers saved to {}", path.display()));
            }
            outcome?
        }
        None => execute(&args, &config, resolver.as_mut())?,
    };

    let summary = MatchSummary::from_annotation(&annotation);
    print_summary(&args, &summary);

    if let Some(path) = &args.summary {
        let report = ReportGenerator::new(args.summary_format).generate(&summary)?;
        std::fs::write(path, report)
            .with_context(|| format!("Failed to write summary {}", path.display()))?;
        tree_item(true, "Summary", Some(&path.display().to_string()));
    }

    println!();
    warning("It is your responsibility to ensure the accuracy of all output files.");
    warning(&format!(
        "Manually review {} to ensure that (1) all taxonomy strings are accurately",
        EXPECTED_TAXONOMY_FILE
    ));
    warning("represented and (2) all relative abundances sum to 1.0");

    Ok(())
}

/// Load both tables, resolve every source taxon, then write the outputs.
/// Nothing is written unless every taxon resolved.
pub fn execute<R: TaxonomyResolver>(
    args: &AnnotateArgs,
    config: &AnnotateConfig,
    resolver: R,
) -> anyhow::Result<Annotation> {
    let pb = create_spinner(&format!("Loading {}...", args.infile.display()));
    let source = load_source_table(&args.infile)?;
    pb.set_message(format!("Loading {}...", args.ref_taxa.display()));
    let reference = load_reference_table(&args.ref_taxa, &config.separator)?;
    pb.finish_and_clear();

    if reference.is_empty() {
        warning(&format!(
            "{} contains no entries; every name needs manual entry",
            args.ref_taxa.display()
        ));
    }

    let mut annotator = Annotator::new(&reference, config, resolver)
        .with_reference_label(args.ref_taxa.display().to_string());
    let annotation = annotator.annotate(&source)?;

    write_annotation(&args.outdir, &annotation)?;
    Ok(annotation)
}

/// Write the expected taxonomy and database identifier tables into `outdir`
pub fn write_annotation(outdir: &Path, annotation: &Annotation) -> anyhow::Result<(PathBuf, PathBuf)> {
    if !outdir.exists() {
        std::fs::create_dir_all(outdir)
            .with_context(|| format!("Failed to create output directory {}", outdir.display()))?;
    }

    let expected_path = outdir.join(EXPECTED_TAXONOMY_FILE);
    save_abundance_table(&expected_path, &annotation.samples, annotation.rows())?;
    tracing::info!(
        "Wrote {} rows to {}",
        annotation.canonical.len(),
        expected_path.display()
    );

    let identifiers_path = outdir.join(DATABASE_IDENTIFIERS_FILE);
    save_identifier_table(&identifiers_path, annotation.identifiers.iter())?;
    tracing::info!(
        "Wrote {} lineages to {}",
        annotation.identifiers.len(),
        identifiers_path.display()
    );

    Ok((expected_path, identifiers_path))
}

fn print_summary(args: &AnnotateArgs, summary: &MatchSummary) {
    section_header_with_line("Annotation Summary");

    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("Match level"),
        header_cell("Count"),
        header_cell("Share"),
    ]);
    for (label, tier) in [
        ("Species", MatchTier::Species),
        ("Genus", MatchTier::Genus),
        ("Family", MatchTier::Family),
        ("Failures", MatchTier::Unresolved),
    ] {
        let count = summary.stats.count(tier);
        if count == 0 && matches!(tier, MatchTier::Family | MatchTier::Unresolved) {
            continue;
        }
        table.add_row(vec![
            Cell::new(label),
            Cell::new(format_number(count)),
            Cell::new(format!("{:.1}%", summary.percent(tier))),
        ]);
    }
    println!("{}", table);

    if !summary.duplicates.is_empty() {
        println!("\n{} duplicates:", summary.duplicates.len());
        let mut dup_table = create_standard_table();
        dup_table.set_header(vec![header_cell("Source name"), header_cell("Collapsed into")]);
        for dup in &summary.duplicates {
            dup_table.add_row(vec![Cell::new(&dup.source_name), Cell::new(&dup.taxonomy)]);
        }
        println!("{}", dup_table);
    }

    let totals: Vec<String> = summary
        .sample_totals
        .iter()
        .map(|(sample, total)| format!("{}={:.4}", sample, total))
        .collect();

    success(&format!("Annotated {} source taxa", format_number(summary.source_taxa)));
    tree_item(
        false,
        "Expected taxonomy",
        Some(&args.outdir.join(EXPECTED_TAXONOMY_FILE).display().to_string()),
    );
    tree_item(
        false,
        "Database identifiers",
        Some(&args.outdir.join(DATABASE_IDENTIFIERS_FILE).display().to_string()),
    );
    tree_item(args.summary.is_none(), "Sample totals", Some(&totals.join(", ")));
}
