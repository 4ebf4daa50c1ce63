//! Alignment and targeted variant detection.
//!
//! Components are layered in dependency order: the global aligner is a leaf,
//! the region locator narrows a long query to a window for it, the mutation
//! caller walks the resulting alignment, and the catalog of known variants is
//! consulted by both of the latter. [`analysis`] wires them together.

mod types;
mod alignment;
mod region;
mod mutation;
mod catalog;
pub mod analysis;
pub mod io;
mod vcf;

pub use types::{Base, Sequence, SequenceError, GAP};
pub use alignment::{align, aligned_index, AlignmentResult, GlobalAligner, ScoringScheme};
pub use region::{find_subsequence, identity_percent, LocatedRegion, RegionLocator};
pub use mutation::{Classification, MutationCall, MutationCaller};
pub use catalog::{CatalogError, KnowledgeBase, VariantRecord};
pub use analysis::{
    AnalysisError, AnalysisOutcome, AnalysisRecord, Analyzer, GeneSummary, TargetedReport,
    TraitSummary,
};
pub use vcf::{render_vcf, write_vcf};
