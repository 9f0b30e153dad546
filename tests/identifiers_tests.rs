mod common;

use common::*;
use pretty_assertions::assert_eq;
use taxannotate::cli::commands::identifiers::{run, IdentifiersArgs};

#[test]
fn test_identifiers_for_expected_taxonomy() {
    let source = format!(
        "Taxonomy\tSample1\n{}\t0.5\n{}\t0.3\n{}\t0.2\n",
        LACTOBACILLUS_PLANTARUM, PEDIOCOCCUS_GENUS, GEOBACILLUS
    );
    let fixture = TestRun::new(&source, &reference_tsv());
    let outfile = fixture.path().join("database-identifiers.tsv");

    run(IdentifiersArgs {
        infile: fixture.infile.clone(),
        outfile: outfile.clone(),
        ref_taxa: fixture.ref_taxa.clone(),
        separator: ";".to_string(),
    })
    .unwrap();

    assert_eq!(
        read(&outfile),
        format!(
            "{}\t0001\t0002\n{}\t0005\n",
            LACTOBACILLUS_PLANTARUM, GEOBACILLUS
        )
    );
}

#[test]
fn test_identifiers_rejects_empty_separator() {
    let fixture = TestRun::new("Taxonomy\tSample1\n", &reference_tsv());

    let result = run(IdentifiersArgs {
        infile: fixture.infile.clone(),
        outfile: fixture.path().join("ids.tsv"),
        ref_taxa: fixture.ref_taxa.clone(),
        separator: String::new(),
    });

    assert!(result.is_err());
}
