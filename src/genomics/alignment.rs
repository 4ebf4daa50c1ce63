use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::genomics::GAP;

/// Linear scoring used by the global aligner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringScheme {
    /// Score added when two bases are identical.
    pub match_score: i32,
    /// Score added when two bases differ (usually negative).
    pub mismatch_penalty: i32,
    /// Score added per gap symbol (usually negative).
    pub gap_penalty: i32,
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self {
            match_score: 1,
            mismatch_penalty: -1,
            gap_penalty: -2,
        }
    }
}

/// Score of `len` consecutive gaps along the first row or column.
fn border_score(gap: i32, len: usize) -> i32 {
    gap.saturating_mul(i32::try_from(len).unwrap_or(i32::MAX))
}

impl ScoringScheme {
    #[inline]
    fn substitution(&self, a: u8, b: u8) -> i32 {
        if a == b {
            self.match_score
        } else {
            self.mismatch_penalty
        }
    }
}

/// Optimal global alignment of a query against a reference, plus summary
/// statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Score of the optimal path (bottom-right matrix cell).
    pub score: i32,
    /// Query row, with `-` marking gaps.
    pub aligned_query: String,
    /// Reference row, with `-` marking gaps.
    pub aligned_reference: String,
    /// Identical columns over alignment length, in percent.
    pub match_percentage: f64,
    /// Columns where both rows hold differing bases.
    pub mismatch_count: usize,
    /// Gap symbols summed over both rows.
    pub gap_count: usize,
    /// Number of alignment columns.
    pub alignment_length: usize,
}

impl AlignmentResult {
    /// Number of identical columns.
    pub fn match_count(&self) -> usize {
        self.aligned_query
            .bytes()
            .zip(self.aligned_reference.bytes())
            .filter(|(q, r)| q == r)
            .count()
    }

    /// Whether the alignment has no gaps and no mismatches.
    pub fn is_identical(&self) -> bool {
        self.gap_count == 0 && self.mismatch_count == 0
    }
}

/// Per-cell traceback choice. Declaration order is the tie-break priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Diagonal,
    Up,
    Left,
}

/// Needleman–Wunsch global aligner with linear gap costs.
///
/// Runs in O(n·m) time and space; intended for windows of at most a few
/// hundred bases.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalAligner {
    scoring: ScoringScheme,
}

impl GlobalAligner {
    /// Create an aligner with the provided scoring.
    pub fn new(scoring: ScoringScheme) -> Self {
        Self { scoring }
    }

    /// Scoring used by this aligner.
    pub fn scoring(&self) -> &ScoringScheme {
        &self.scoring
    }

    /// Align `query` (rows) against `reference` (columns).
    ///
    /// When candidates tie for the best score the diagonal move wins, then the
    /// vertical move (gap in the reference), then the horizontal move (gap in
    /// the query). This fixes which of several equally scored alignments is
    /// reported.
    pub fn align(&self, query: &[u8], reference: &[u8]) -> AlignmentResult {
        let n = query.len();
        let m = reference.len();
        let cols = m + 1;
        let gap = self.scoring.gap_penalty;

        let mut scores = vec![0i32; (n + 1) * cols];
        let mut moves = vec![Move::Diagonal; (n + 1) * cols];

        for i in 1..=n {
            scores[i * cols] = border_score(gap, i);
            moves[i * cols] = Move::Up;
        }
        for j in 1..=m {
            scores[j] = border_score(gap, j);
            moves[j] = Move::Left;
        }

        for i in 1..=n {
            for j in 1..=m {
                let diagonal = scores[(i - 1) * cols + j - 1]
                    .saturating_add(self.scoring.substitution(query[i - 1], reference[j - 1]));
                let up = scores[(i - 1) * cols + j].saturating_add(gap);
                let left = scores[i * cols + j - 1].saturating_add(gap);

                let (best, choice) = if diagonal >= up && diagonal >= left {
                    (diagonal, Move::Diagonal)
                } else if up >= left {
                    (up, Move::Up)
                } else {
                    (left, Move::Left)
                };
                scores[i * cols + j] = best;
                moves[i * cols + j] = choice;
            }
        }

        let mut aligned_query = Vec::with_capacity(n + m);
        let mut aligned_reference = Vec::with_capacity(n + m);
        let (mut i, mut j) = (n, m);
        while i > 0 || j > 0 {
            match moves[i * cols + j] {
                Move::Diagonal => {
                    aligned_query.push(query[i - 1]);
                    aligned_reference.push(reference[j - 1]);
                    i -= 1;
                    j -= 1;
                }
                Move::Up => {
                    aligned_query.push(query[i - 1]);
                    aligned_reference.push(GAP);
                    i -= 1;
                }
                Move::Left => {
                    aligned_query.push(GAP);
                    aligned_reference.push(reference[j - 1]);
                    j -= 1;
                }
            }
        }
        aligned_query.reverse();
        aligned_reference.reverse();

        let score = scores[n * cols + m];
        let result = summarize(score, &aligned_query, &aligned_reference);
        debug!(
            query_len = n,
            reference_len = m,
            score,
            match_percentage = result.match_percentage,
            "global alignment complete"
        );
        result
    }
}

/// Align with the given scoring; see [`GlobalAligner::align`].
pub fn align(query: &[u8], reference: &[u8], scoring: &ScoringScheme) -> AlignmentResult {
    GlobalAligner::new(*scoring).align(query, reference)
}

fn summarize(score: i32, aligned_query: &[u8], aligned_reference: &[u8]) -> AlignmentResult {
    let alignment_length = aligned_query.len();
    let mut matches = 0usize;
    let mut mismatch_count = 0usize;
    let mut gap_count = 0usize;

    for (&q, &r) in aligned_query.iter().zip(aligned_reference) {
        gap_count += usize::from(q == GAP) + usize::from(r == GAP);
        if q == r {
            matches += 1;
        } else if q != GAP && r != GAP {
            mismatch_count += 1;
        }
    }

    let match_percentage = if alignment_length == 0 {
        0.0
    } else {
        matches as f64 / alignment_length as f64 * 100.0
    };

    AlignmentResult {
        score,
        aligned_query: String::from_utf8_lossy(aligned_query).into_owned(),
        aligned_reference: String::from_utf8_lossy(aligned_reference).into_owned(),
        match_percentage,
        mismatch_count,
        gap_count,
        alignment_length,
    }
}

/// Column of `aligned` holding the `ungapped_index`-th non-gap symbol.
pub fn aligned_index(aligned: &str, ungapped_index: usize) -> Option<usize> {
    aligned
        .bytes()
        .enumerate()
        .filter(|&(_, symbol)| symbol != GAP)
        .nth(ungapped_index)
        .map(|(column, _)| column)
}
