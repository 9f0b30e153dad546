/// Shared fixtures for the integration tests
use std::path::{Path, PathBuf};
use taxannotate::cli::commands::annotate::AnnotateArgs;
use taxannotate::report::Format;
use tempfile::TempDir;

pub const LACTOBACILLUS_PLANTARUM: &str = "k__Bacteria;p__Firmicutes;c__Bacilli;o__Lactobacillales;f__Lactobacillaceae;g__Lactobacillus;s__plantarum";
pub const LACTOBACILLUS_BREVIS: &str = "k__Bacteria;p__Firmicutes;c__Bacilli;o__Lactobacillales;f__Lactobacillaceae;g__Lactobacillus;s__brevis";
pub const LACTOBACILLUS_A_BREVIS: &str = "k__Bacteria;p__Firmicutes;c__Bacilli;o__Lactobacillales;f__Lactobacillaceae;g__Lactobacillus_A;s__brevis_B";
pub const PEDIOCOCCUS_DAMNOSUS: &str = "k__Bacteria;p__Firmicutes;c__Bacilli;o__Lactobacillales;f__Lactobacillaceae;g__Pediococcus;s__damnosus";
pub const GEOBACILLUS: &str = "k__Bacteria;p__Firmicutes;c__Bacilli;o__Bacillales;f__Bacillaceae;g__Geobacillus;s__stearothermophilus";

pub const PEDIOCOCCUS_GENUS: &str = "k__Bacteria;p__Firmicutes;c__Bacilli;o__Lactobacillales;f__Lactobacillaceae;g__Pediococcus;s__";
pub const BACILLACEAE_FAMILY: &str = "k__Bacteria;p__Firmicutes;c__Bacilli;o__Bacillales;f__Bacillaceae;g__;s__";

/// Reference table used across the pipeline tests
pub fn reference_tsv() -> String {
    [
        ("0001", LACTOBACILLUS_PLANTARUM),
        ("0002", LACTOBACILLUS_PLANTARUM),
        ("0003", LACTOBACILLUS_BREVIS),
        ("0004", PEDIOCOCCUS_DAMNOSUS),
        ("0005", GEOBACILLUS),
        ("0006", LACTOBACILLUS_A_BREVIS),
    ]
    .iter()
    .map(|(id, taxonomy)| format!("{}\t{}\n", id, taxonomy))
    .collect()
}

/// Temporary directory holding one annotation run's inputs
pub struct TestRun {
    pub dir: TempDir,
    pub infile: PathBuf,
    pub ref_taxa: PathBuf,
}

impl TestRun {
    pub fn new(source: &str, reference: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let infile = dir.path().join("source.tsv");
        let ref_taxa = dir.path().join("reference.tsv");
        std::fs::write(&infile, source).unwrap();
        std::fs::write(&ref_taxa, reference).unwrap();
        Self {
            dir,
            infile,
            ref_taxa,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn args(&self, outdir: &str) -> AnnotateArgs {
        AnnotateArgs {
            infile: self.infile.clone(),
            outdir: self.dir.path().join(outdir),
            ref_taxa: self.ref_taxa.clone(),
            separator: None,
            genus_placeholder: None,
            species_placeholder: None,
            config: None,
            answers: None,
            save_answers: None,
            summary: None,
            summary_format: Format::Json,
        }
    }
}

pub fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}
