//! # Targeted SNP detection
//!
//! This library checks a user-supplied nucleotide sequence for a specific,
//! catalogued single-nucleotide variant.
//!
//! ## Pipeline
//!
//! 1. **Catalog**: known variants are loaded once into an immutable
//!    [`KnowledgeBase`] and shared across requests.
//! 2. **Region location**: a 20-base anchor from the reference window is
//!    searched in the query; if absent, a coarse identity scan picks the
//!    best-effort window instead.
//! 3. **Global alignment**: the window is aligned against the reference with
//!    Needleman–Wunsch (match 1, mismatch -1, gap -2, diagonal-first ties).
//! 4. **Mutation calling**: the alignment is walked for the first column that
//!    carries the catalogued substitution, which is mapped back to query and
//!    absolute coordinates and classified against the catalog.
//!
//! ## Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use traitseq::{Analyzer, KnowledgeBase, Sequence};
//!
//! let kb = Arc::new(KnowledgeBase::builtin()?);
//! let analyzer = Analyzer::with_defaults(kb);
//! let sequence = Sequence::parse("ATGGTGCACCTGACTCCTGAGGAGAAGTCT")?;
//! let outcome = analyzer.analyze(&sequence, "Sickle Cell Trait", "HBB")?;
//! println!("{}: {} call(s)", outcome.label(), outcome.report().matches.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod config;     // Named thresholds and scoring
pub mod genomics;   // Alignment, region location, mutation calling, catalog
/// Python bindings for exposing the analysis engine to external runtimes.
#[cfg(feature = "python-bindings")]
pub mod python_bindings;

// Re-exports for convenience
pub use config::{AnalysisConfig, ConfigError};
pub use genomics::{
    align, AlignmentResult, AnalysisError, AnalysisOutcome, Analyzer, Base, CatalogError,
    Classification, GlobalAligner, KnowledgeBase, LocatedRegion, MutationCall, MutationCaller,
    RegionLocator, ScoringScheme, Sequence, SequenceError, TargetedReport, VariantRecord,
};
