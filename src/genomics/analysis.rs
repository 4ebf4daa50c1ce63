//! Targeted analysis: locate the reference region for a (trait, gene) pair,
//! align it and look for the catalogued variant.
//!
//! Expected outcomes such as a missing catalog entry, an undetected region or
//! a low-similarity match are reported through [`AnalysisOutcome`]; only
//! unusable input is an error.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{AnalysisConfig, ConfigError};
use crate::genomics::{
    AlignmentResult, GlobalAligner, KnowledgeBase, MutationCall, MutationCaller, RegionLocator,
    Sequence,
};

/// Result payload of a targeted analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetedReport {
    /// Mutation calls (at most one per analysis).
    pub matches: Vec<MutationCall>,
    /// Alignment statistics keyed by gene.
    pub alignment_statistics: BTreeMap<String, AlignmentResult>,
    /// Present when the region was not detected or similarity is low.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl TargetedReport {
    /// Match percentage recorded for `gene`, or 0.
    pub fn match_percentage(&self, gene: &str) -> f64 {
        self.alignment_statistics
            .get(gene)
            .map_or(0.0, |stats| stats.match_percentage)
    }
}

/// Outcome of a targeted analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Region anchored and similarity at or above the threshold.
    Matched(TargetedReport),
    /// Catalog has no record for the requested (trait, gene) pair.
    NoEntry(TargetedReport),
    /// Region not anchored, or similarity below the threshold.
    LowConfidence(TargetedReport),
}

impl AnalysisOutcome {
    /// Borrow the report regardless of outcome.
    pub fn report(&self) -> &TargetedReport {
        match self {
            AnalysisOutcome::Matched(report)
            | AnalysisOutcome::NoEntry(report)
            | AnalysisOutcome::LowConfidence(report) => report,
        }
    }

    /// Take the report regardless of outcome.
    pub fn into_report(self) -> TargetedReport {
        match self {
            AnalysisOutcome::Matched(report)
            | AnalysisOutcome::NoEntry(report)
            | AnalysisOutcome::LowConfidence(report) => report,
        }
    }

    /// Short label for logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisOutcome::Matched(_) => "matched",
            AnalysisOutcome::NoEntry(_) => "no-entry",
            AnalysisOutcome::LowConfidence(_) => "low-confidence",
        }
    }
}

/// Errors that fail a single analysis request.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Query sequence held no bases.
    #[error("empty sequence provided")]
    EmptySequence,

    /// Analyzer configuration is unusable.
    #[error("invalid analysis configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Entry point for targeted analyses.
///
/// Holds the shared catalog and configuration; cheap to clone and safe to use
/// from several threads at once.
#[derive(Debug, Clone)]
pub struct Analyzer {
    knowledge_base: Arc<KnowledgeBase>,
    config: AnalysisConfig,
}

impl Analyzer {
    /// Create an analyzer, validating the configuration.
    pub fn new(
        knowledge_base: Arc<KnowledgeBase>,
        config: AnalysisConfig,
    ) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self {
            knowledge_base,
            config,
        })
    }

    /// Create an analyzer with default configuration.
    pub fn with_defaults(knowledge_base: Arc<KnowledgeBase>) -> Self {
        Self {
            knowledge_base,
            config: AnalysisConfig::default(),
        }
    }

    /// Catalog backing this analyzer.
    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    /// Active configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Look for the catalogued variant of `trait_name` on `gene` in `sequence`.
    pub fn analyze(
        &self,
        sequence: &Sequence,
        trait_name: &str,
        gene: &str,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        if sequence.is_empty() {
            return Err(AnalysisError::EmptySequence);
        }
        info!(length = sequence.len(), trait_name, gene, "starting targeted analysis");

        let Some(record) = self.knowledge_base.find_target(trait_name, gene) else {
            let warning = format!("No SNP entry found for trait {trait_name} on gene {gene}");
            warn!("{warning}");
            return Ok(AnalysisOutcome::NoEntry(TargetedReport {
                warning: Some(warning),
                ..TargetedReport::default()
            }));
        };

        let reference = record.reference_sequence.as_bytes();
        let region = RegionLocator::from_config(&self.config).locate(sequence.as_bytes(), reference);
        let aligner = GlobalAligner::new(self.config.scoring);
        let alignment = aligner.align(region.window, reference);

        let mut report = TargetedReport::default();

        if !region.located {
            let warning = format!(
                "Reference region for this trait was not detected in your sequence. \
                 Best match percentage found: {:.1}%. This may indicate your sequence is \
                 from a different region or contains significant variations.",
                region.best_match_percent
            );
            warn!("{warning}");
            report.warning = Some(warning);
        } else {
            info!(
                window_start = region.window_start,
                window_end = region.window_end(),
                "aligned anchored window"
            );
        }

        let low_similarity = alignment.match_percentage < self.config.low_similarity_threshold;
        if low_similarity && region.located {
            let warning = format!(
                "Input sequence has low similarity to the reference region for this trait. \
                 Match percentage: {:.1}%. This may indicate the sequence is from a different \
                 region or contains significant variations.",
                alignment.match_percentage
            );
            warn!("{warning}");
            report.warning = Some(warning);
        }

        let caller =
            MutationCaller::with_context_radius(&self.knowledge_base, self.config.context_radius);
        report.matches.extend(caller.find_targeted_mutation(
            &alignment.aligned_query,
            &alignment.aligned_reference,
            record,
            region.window_start,
        ));
        report
            .alignment_statistics
            .insert(record.gene.clone(), alignment);

        info!(matches = report.matches.len(), "analysis complete");
        if low_similarity || !region.located {
            Ok(AnalysisOutcome::LowConfidence(report))
        } else {
            Ok(AnalysisOutcome::Matched(report))
        }
    }
}

/// Per-gene aggregation inside a [`TraitSummary`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneSummary {
    /// Calls reported for the gene.
    pub total_matches: usize,
    /// Calls that are variants.
    pub variants: usize,
    /// Variant calls linked to a catalogued record.
    pub known_variants: usize,
    /// Alignment statistics for the gene, when an alignment was run.
    pub alignment_stats: Option<AlignmentResult>,
    /// The calls themselves.
    pub matches: Vec<MutationCall>,
}

/// Overview of a report, grouped by gene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitSummary {
    /// Records in the catalog the analysis ran against.
    pub total_analyzed: usize,
    /// Calls in the report.
    pub matches_found: usize,
    /// Calls that are variants.
    pub variants_found: usize,
    /// Variant calls linked to a catalogued record.
    pub known_variants: usize,
    /// Per-gene breakdown.
    pub gene_summaries: BTreeMap<String, GeneSummary>,
}

impl TraitSummary {
    /// Summarize `report` against the catalog it was produced from.
    pub fn from_report(report: &TargetedReport, knowledge_base: &KnowledgeBase) -> Self {
        let mut summary = TraitSummary {
            total_analyzed: knowledge_base.len(),
            matches_found: report.matches.len(),
            ..TraitSummary::default()
        };

        // Every reported call is a substitution, so each one counts as a variant.
        for call in &report.matches {
            let gene = summary
                .gene_summaries
                .entry(call.gene.clone())
                .or_insert_with(|| GeneSummary {
                    alignment_stats: report.alignment_statistics.get(&call.gene).cloned(),
                    ..GeneSummary::default()
                });
            gene.total_matches += 1;
            gene.variants += 1;
            summary.variants_found += 1;
            if call.matched_record.is_known() {
                gene.known_variants += 1;
                summary.known_variants += 1;
            }
            gene.matches.push(call.clone());
        }
        summary
    }
}

/// Flat record of one analysis, shaped for a history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Trait requested.
    pub trait_analyzed: String,
    /// Gene requested.
    pub gene: String,
    /// Length of the analysed sequence.
    pub sequence_length: usize,
    /// GC content of the analysed sequence, in percent.
    pub gc_content: f64,
    /// Number of mutation calls.
    pub mutations_found: usize,
    /// Match percentage for the gene, 0 when no alignment ran.
    pub match_percentage: f64,
    /// Outcome label.
    pub outcome: String,
}

impl AnalysisRecord {
    /// Build a history record from a finished analysis.
    pub fn new(
        trait_name: &str,
        gene: &str,
        sequence: &Sequence,
        outcome: &AnalysisOutcome,
    ) -> Self {
        let report = outcome.report();
        Self {
            trait_analyzed: trait_name.to_string(),
            gene: gene.to_string(),
            sequence_length: sequence.len(),
            gc_content: sequence.gc_content(),
            mutations_found: report.matches.len(),
            match_percentage: report.match_percentage(gene),
            outcome: outcome.label().to_string(),
        }
    }
}
