use tracing::debug;

use crate::config::{AnalysisConfig, DEFAULT_ANCHOR_LEN, DEFAULT_FLANK};

/// Window of the query chosen for alignment against a reference region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatedRegion<'q> {
    /// Offset of the window inside the query.
    pub window_start: usize,
    /// Query bases passed on to the aligner.
    pub window: &'q [u8],
    /// `true` when the anchor was found; `false` for the best-effort scan.
    pub located: bool,
    /// Ungapped identity of the best candidate against the reference, in percent.
    pub best_match_percent: f64,
}

impl LocatedRegion<'_> {
    /// Offset one past the last window base inside the query.
    pub fn window_end(&self) -> usize {
        self.window_start + self.window.len()
    }
}

/// Finds the part of a (possibly long) query that corresponds to a short
/// reference window.
///
/// The leading `anchor_len` reference bases are searched for literally; on a
/// hit the region plus `flank` bases either side is returned. Otherwise a
/// reference-sized window is slid across the query with a stride of a tenth
/// of the reference length and the start with the most identical positions
/// wins.
#[derive(Debug, Clone, Copy)]
pub struct RegionLocator {
    anchor_len: usize,
    flank: usize,
}

impl Default for RegionLocator {
    fn default() -> Self {
        Self::new(DEFAULT_ANCHOR_LEN, DEFAULT_FLANK)
    }
}

impl RegionLocator {
    /// Create a locator with explicit anchor length and flank width.
    pub fn new(anchor_len: usize, flank: usize) -> Self {
        Self { anchor_len, flank }
    }

    /// Create a locator from analysis configuration.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.anchor_len, config.flank)
    }

    /// Locate `reference` inside `query`.
    pub fn locate<'q>(&self, query: &'q [u8], reference: &[u8]) -> LocatedRegion<'q> {
        let anchor = &reference[..self.anchor_len.min(reference.len())];

        match find_subsequence(query, anchor) {
            Some(idx) => {
                let start = idx.saturating_sub(self.flank);
                let end = idx
                    .saturating_add(reference.len())
                    .saturating_add(self.flank)
                    .min(query.len());
                let aligned_end = (idx + reference.len()).min(query.len());
                let best_match_percent = identity_percent(&query[idx..aligned_end], reference);
                debug!(anchor_at = idx, start, end, "reference anchor found");
                LocatedRegion {
                    window_start: start,
                    window: &query[start..end],
                    located: true,
                    best_match_percent,
                }
            }
            None => self.scan(query, reference),
        }
    }

    fn scan<'q>(&self, query: &'q [u8], reference: &[u8]) -> LocatedRegion<'q> {
        let window_len = reference.len();
        let stride = (window_len / 10).max(1);
        let mut best_percent = 0.0;
        let mut best_start = 0usize;

        if query.len() >= window_len {
            for start in (0..=query.len() - window_len).step_by(stride) {
                let percent = identity_percent(&query[start..start + window_len], reference);
                if percent > best_percent {
                    best_percent = percent;
                    best_start = start;
                }
            }
        }

        let end = (best_start + window_len).min(query.len());
        debug!(
            best_start,
            best_percent, "anchor not found; using best identity window"
        );
        LocatedRegion {
            window_start: best_start,
            window: &query[best_start..end],
            located: false,
            best_match_percent: best_percent,
        }
    }
}

/// Offset of the first occurrence of `needle` in `haystack`. An empty needle
/// matches at 0.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Position-wise identity of `candidate` against `reference`, as a percentage
/// of the reference length.
pub fn identity_percent(candidate: &[u8], reference: &[u8]) -> f64 {
    if reference.is_empty() {
        return 0.0;
    }
    let matches = candidate
        .iter()
        .zip(reference)
        .filter(|(a, b)| a == b)
        .count();
    matches as f64 / reference.len() as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &[u8] = b"ATGGTGCACCTGACTCCTGAGGAGAAGTCTGCCGTTACTG";

    #[test]
    fn anchor_hit_extracts_flanked_window() {
        let mut query = b"CCCCCCCCCC".to_vec();
        query.extend_from_slice(REFERENCE);
        query.extend_from_slice(b"GGGGGGGGGG");

        let locator = RegionLocator::new(20, 5);
        let region = locator.locate(&query, REFERENCE);
        assert!(region.located);
        assert_eq!(region.window_start, 5);
        assert_eq!(region.window_end(), 10 + REFERENCE.len() + 5);
        assert_eq!(region.best_match_percent, 100.0);
    }

    #[test]
    fn window_is_clipped_to_query_bounds() {
        let region = RegionLocator::default().locate(REFERENCE, REFERENCE);
        assert!(region.located);
        assert_eq!(region.window_start, 0);
        assert_eq!(region.window, REFERENCE);
    }

    #[test]
    fn short_reference_uses_whole_reference_as_anchor() {
        let region = RegionLocator::default().locate(b"TTTTACGTTTTT", b"ACG");
        assert!(region.located);
        assert_eq!(region.window_start, 0);
    }

    #[test]
    fn scan_keeps_first_best_start() {
        // No 4-base anchor "AAAA" exists; two windows tie at 75%.
        let locator = RegionLocator::new(4, 0);
        let region = locator.locate(b"AAACAAAC", b"AAAA");
        assert!(!region.located);
        assert_eq!(region.window_start, 0);
        assert_eq!(region.window, b"AAAC");
        assert_eq!(region.best_match_percent, 75.0);
    }

    #[test]
    fn scan_with_query_shorter_than_reference() {
        let region = RegionLocator::default().locate(b"TTT", REFERENCE);
        assert!(!region.located);
        assert_eq!(region.window_start, 0);
        assert_eq!(region.window, b"TTT");
        assert_eq!(region.best_match_percent, 0.0);
    }

    #[test]
    fn identity_is_relative_to_reference_length() {
        assert_eq!(identity_percent(b"AC", b"ACGT"), 50.0);
        assert_eq!(identity_percent(b"ACGT", b""), 0.0);
        assert_eq!(find_subsequence(b"ACGT", b""), Some(0));
        assert_eq!(find_subsequence(b"AC", b"ACGT"), None);
    }
}
