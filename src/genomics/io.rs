//! Reading sequences from plain-text and FASTA input.

use std::path::Path;

use anyhow::{Context, Result};

use crate::genomics::Sequence;

/// Extract a nucleotide sequence from plain or FASTA text.
///
/// Header lines (`>`) and comment lines (`;`) are skipped, the remaining
/// lines are concatenated, uppercased and stripped of anything that is not
/// A, C, G or T.
pub fn parse_sequence_text(text: &str) -> Sequence {
    let body: String = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('>') && !line.starts_with(';'))
        .collect();
    Sequence::from_text_lossy(&body)
}

/// Read a sequence file (plain text or FASTA).
pub fn read_sequence_file<P: AsRef<Path>>(path: P) -> Result<Sequence> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read sequence from {}", path.display()))?;
    Ok(parse_sequence_text(&contents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fasta_headers_are_skipped() {
        let text = ">HBB exon 1\nATGGTG\ncacctg\n\n>second\nAC";
        assert_eq!(parse_sequence_text(text).as_str(), "ATGGTGCACCTGAC");
    }

    #[test]
    fn plain_text_is_cleaned() {
        assert_eq!(parse_sequence_text("  atg gtn 12\n").as_str(), "ATGGT");
    }
}
