mod common;

use common::{analyzer, assert_snapshot, seq, substitute, HBB};
use traitseq::genomics::render_vcf;
use traitseq::{Base, Classification, MutationCall};

#[test]
fn render_vcf_matches_golden() {
    let outcome = analyzer()
        .analyze(&seq(&substitute(HBB, &[(60, b'A')])), "Sickle Cell Trait", "HBB")
        .expect("analysis runs");
    let mut calls = outcome.into_report().matches;
    calls.push(MutationCall {
        gene: "TST1".to_string(),
        position: 12,
        genomic_position: 1012,
        reference_base: Base::C,
        observed_base: Base::T,
        aligned_position: 12,
        context: "ACGTCAGT".to_string(),
        matched_record: Classification::Unknown,
    });

    let actual = render_vcf(&calls).expect("VCF rendering should succeed");
    assert_snapshot("mutations/simple.vcf", &actual);
}

#[test]
fn pos_is_catalog_coordinate_and_qpos_is_query_offset() {
    let outcome = analyzer()
        .analyze(&seq(&substitute(HBB, &[(60, b'A')])), "Sickle Cell Trait", "HBB")
        .expect("analysis runs");
    let report = outcome.into_report();
    let call = &report.matches[0];
    let rendered = render_vcf(&report.matches).expect("VCF rendering should succeed");
    let line = rendered
        .lines()
        .find(|line| !line.starts_with('#'))
        .expect("one record line");
    let fields: Vec<&str> = line.split('\t').collect();
    assert_eq!(fields[1], call.genomic_position.to_string());
    assert_eq!(fields[1], "5227062");
    assert!(fields[7].contains("QPOS=60;"));
}
