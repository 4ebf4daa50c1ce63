use proptest::prelude::*;
use traitseq::genomics::aligned_index;
use traitseq::{align, ScoringScheme};

fn dna(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(
        prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T')],
        0..max_len,
    )
}

fn strip_gaps(row: &str) -> String {
    row.chars().filter(|&c| c != '-').collect()
}

proptest! {
    #[test]
    fn aligned_rows_have_equal_length(query in dna(48), reference in dna(48)) {
        let result = align(&query, &reference, &ScoringScheme::default());
        prop_assert_eq!(result.aligned_query.len(), result.aligned_reference.len());
        prop_assert_eq!(result.aligned_query.len(), result.alignment_length);
        prop_assert!(result.alignment_length >= query.len().max(reference.len()));
        prop_assert!(result.alignment_length <= query.len() + reference.len());
    }

    #[test]
    fn rows_are_the_inputs_with_gaps(query in dna(48), reference in dna(48)) {
        let result = align(&query, &reference, &ScoringScheme::default());
        let query_row = strip_gaps(&result.aligned_query);
        let reference_row = strip_gaps(&result.aligned_reference);
        prop_assert_eq!(query_row.as_bytes(), &query[..]);
        prop_assert_eq!(reference_row.as_bytes(), &reference[..]);
        prop_assert!(!result
            .aligned_query
            .bytes()
            .zip(result.aligned_reference.bytes())
            .any(|(q, r)| q == b'-' && r == b'-'));
    }

    #[test]
    fn self_alignment_is_perfect(sequence in dna(64)) {
        let result = align(&sequence, &sequence, &ScoringScheme::default());
        prop_assert_eq!(result.score, sequence.len() as i32);
        prop_assert_eq!(result.gap_count, 0);
        prop_assert_eq!(result.mismatch_count, 0);
        if sequence.is_empty() {
            prop_assert_eq!(result.match_percentage, 0.0);
        } else {
            prop_assert_eq!(result.match_percentage, 100.0);
        }
    }

    #[test]
    fn statistics_are_consistent(query in dna(40), reference in dna(40)) {
        let scoring = ScoringScheme::default();
        let result = align(&query, &reference, &scoring);
        let matches = result.match_count();
        let gap_columns = result.gap_count;
        prop_assert_eq!(matches + result.mismatch_count + gap_columns, result.alignment_length);
        let recomputed = matches as i32 * scoring.match_score
            + result.mismatch_count as i32 * scoring.mismatch_penalty
            + gap_columns as i32 * scoring.gap_penalty;
        prop_assert_eq!(recomputed, result.score);
        prop_assert!((0.0..=100.0).contains(&result.match_percentage));
    }

    #[test]
    fn aligned_index_points_at_original_symbol(query in dna(32), reference in dna(32)) {
        let result = align(&query, &reference, &ScoringScheme::default());
        for (offset, &base) in query.iter().enumerate() {
            let column = aligned_index(&result.aligned_query, offset).expect("column exists");
            prop_assert_eq!(result.aligned_query.as_bytes()[column], base);
        }
        prop_assert_eq!(aligned_index(&result.aligned_query, query.len()), None);
    }
}

#[test]
fn repeated_motif_tie_is_resolved_diagonally() {
    // "ACAC" vs "AC": the unpaired "AC" could go on either side; diagonal-first
    // traceback pairs the trailing copy and leaves the leading one gapped.
    let result = align(b"ACAC", b"AC", &ScoringScheme::default());
    assert_eq!(result.aligned_query, "ACAC");
    assert_eq!(result.aligned_reference, "--AC");
    assert_eq!(result.score, -2);
}
