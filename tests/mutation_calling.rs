mod common;

use common::{analyzer, builtin_kb, substitute, seq, HBB};
use traitseq::{align, AnalysisOutcome, Base, Classification, MutationCaller, ScoringScheme};

#[test]
fn sickle_cell_substitution_is_called_and_classified() {
    let kb = builtin_kb();
    let record = kb.find_target("Sickle Cell Trait", "HBB").expect("HBB record");
    let variant = substitute(HBB, &[(5, b'A')]);

    let result = align(variant.as_bytes(), HBB.as_bytes(), &ScoringScheme::default());
    assert_eq!(result.mismatch_count, 1);
    assert_eq!(result.gap_count, 0);

    let call = MutationCaller::new(&kb)
        .find_targeted_mutation(&result.aligned_query, &result.aligned_reference, record, 0)
        .expect("sickle cell variant detected");
    assert_eq!(call.gene, "HBB");
    assert_eq!(call.position, 5);
    assert_eq!(call.aligned_position, 5);
    assert_eq!(call.reference_base, Base::G);
    assert_eq!(call.observed_base, Base::A);
    assert_eq!(call.context, "ATGGTGCACCT");
    match &call.matched_record {
        Classification::Targeted(matched) => {
            assert_eq!(matched.rsid, "rs334");
            assert_eq!(matched.reference_base, call.reference_base);
            assert_eq!(matched.variant_base, call.observed_base);
        }
        other => panic!("expected targeted classification, got {other:?}"),
    }
}

#[test]
fn only_the_first_targeted_site_is_reported() {
    // G->A at 60 (target), another G->A at 80 and an unrelated C->T at 83.
    let query = substitute(HBB, &[(60, b'A'), (80, b'A'), (83, b'T')]);
    let outcome = analyzer()
        .analyze(&seq(&query), "Sickle Cell Trait", "HBB")
        .expect("analysis runs");

    let report = outcome.report();
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].position, 60);
    assert_eq!(report.alignment_statistics["HBB"].mismatch_count, 3);
}

#[test]
fn inserted_bases_upstream_shift_query_coordinate_only() {
    let variant = substitute(HBB, &[(60, b'A')]);
    let query = format!("{}TTT{}", &variant[..30], &variant[30..]);

    let outcome = analyzer()
        .analyze(&seq(&query), "Sickle Cell Trait", "HBB")
        .expect("analysis runs");
    let AnalysisOutcome::Matched(report) = outcome else {
        panic!("expected a matched outcome");
    };

    let call = &report.matches[0];
    // Position follows the query as supplied, not the alignment column.
    assert_eq!(call.position, 63);
    assert_eq!(&query[63..64], "A");
    assert_eq!(call.aligned_position, 63);
    // The reference-side coordinate is unaffected by the insertion.
    assert_eq!(call.genomic_position, 5_227_002 + 60);
    assert_eq!(report.alignment_statistics["HBB"].gap_count, 3);
}

#[test]
fn query_deletion_upstream_is_tracked() {
    let variant = substitute(HBB, &[(60, b'A')]);
    let query = format!("{}{}", &variant[..30], &variant[32..]);

    let outcome = analyzer()
        .analyze(&seq(&query), "Sickle Cell Trait", "HBB")
        .expect("analysis runs");
    let call = &outcome.report().matches[0];
    assert_eq!(call.position, 58);
    assert_eq!(&query[58..59], "A");
    assert_eq!(call.aligned_position, 60);
    assert_eq!(call.genomic_position, 5_227_002 + 60);
}

#[test]
fn wild_type_sequence_has_no_call() {
    let outcome = analyzer()
        .analyze(&seq(HBB), "Sickle Cell Trait", "HBB")
        .expect("analysis runs");
    assert!(matches!(outcome, AnalysisOutcome::Matched(_)));
    assert!(outcome.report().matches.is_empty());
    assert_eq!(outcome.report().match_percentage("HBB"), 100.0);
}
