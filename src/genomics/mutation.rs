use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::DEFAULT_CONTEXT_RADIUS;
use crate::genomics::{Base, KnowledgeBase, VariantRecord, GAP};

/// How a called mutation relates to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "record", rename_all = "snake_case")]
pub enum Classification {
    /// The call is the variant that was asked for.
    Targeted(VariantRecord),
    /// The call matches another catalogued record.
    Catalogued(VariantRecord),
    /// The call matches nothing in the catalog.
    Unknown,
}

impl Classification {
    /// Matched record, if any.
    pub fn record(&self) -> Option<&VariantRecord> {
        match self {
            Classification::Targeted(record) | Classification::Catalogued(record) => Some(record),
            Classification::Unknown => None,
        }
    }

    /// Whether the call was matched to a catalogued record.
    pub fn is_known(&self) -> bool {
        self.record().is_some()
    }

    /// dbSNP identifier, or `"unknown"`.
    pub fn rsid(&self) -> &str {
        self.record().map_or("unknown", |r| r.rsid.as_str())
    }

    /// Associated trait, or `"Unknown"`.
    pub fn trait_name(&self) -> &str {
        self.record().map_or("Unknown", |r| r.trait_name.as_str())
    }

    /// Effect text shown alongside the call.
    pub fn effect(&self) -> &str {
        match self {
            Classification::Targeted(r) if r.effect.is_empty() => "Known variant for this trait",
            Classification::Targeted(r) | Classification::Catalogued(r) => r.effect.as_str(),
            Classification::Unknown => "Unknown mutation, no known trait linked",
        }
    }

    /// Description text shown alongside the call.
    pub fn description(&self) -> String {
        match self {
            Classification::Targeted(r) if r.description.is_empty() => {
                format!("This mutation matches the known variant for {}", r.trait_name)
            }
            Classification::Targeted(r) | Classification::Catalogued(r) => r.description.clone(),
            Classification::Unknown => {
                "This mutation does not match any known SNPs in the catalog.".to_string()
            }
        }
    }
}

/// Single-nucleotide variant observed in a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationCall {
    /// Gene of the targeted record.
    pub gene: String,
    /// Coordinate of the variant base in the original query sequence.
    pub position: usize,
    /// Absolute coordinate implied by the record's reference window.
    pub genomic_position: u64,
    /// Reference base at the site.
    pub reference_base: Base,
    /// Base observed in the query.
    pub observed_base: Base,
    /// Column of the site in the alignment.
    pub aligned_position: usize,
    /// Aligned reference symbols around the site.
    pub context: String,
    /// Catalog classification.
    pub matched_record: Classification,
}

/// Scans an alignment for a targeted variant and classifies the hit.
#[derive(Debug, Clone, Copy)]
pub struct MutationCaller<'kb> {
    knowledge_base: &'kb KnowledgeBase,
    context_radius: usize,
}

impl<'kb> MutationCaller<'kb> {
    /// Create a caller using the default context radius.
    pub fn new(knowledge_base: &'kb KnowledgeBase) -> Self {
        Self::with_context_radius(knowledge_base, DEFAULT_CONTEXT_RADIUS)
    }

    /// Create a caller reporting `context_radius` symbols either side of a hit.
    pub fn with_context_radius(knowledge_base: &'kb KnowledgeBase, context_radius: usize) -> Self {
        Self {
            knowledge_base,
            context_radius,
        }
    }

    /// Walk the alignment and report the first column where the query carries
    /// `record.variant_base` against `record.reference_base`.
    ///
    /// Only the first such column is reported; later mismatches are not
    /// examined. `window_start` is the offset of the aligned query inside the
    /// caller's full sequence.
    pub fn find_targeted_mutation(
        &self,
        aligned_query: &str,
        aligned_reference: &str,
        record: &VariantRecord,
        window_start: usize,
    ) -> Option<MutationCall> {
        let expected_ref = record.reference_base.to_ascii();
        let expected_alt = record.variant_base.to_ascii();
        let reference_row = aligned_reference.as_bytes();

        let mut query_offset = 0usize;
        let mut reference_offset = 0u64;

        for (column, (&q, &r)) in aligned_query.as_bytes().iter().zip(reference_row).enumerate() {
            if q != GAP && r != GAP && q != r {
                debug!(column, reference = %(r as char), observed = %(q as char), "mismatch");
                if r == expected_ref && q == expected_alt {
                    let position = window_start + query_offset;
                    let genomic_position = record.position_start + reference_offset;
                    let context = self.context(reference_row, column);
                    let matched_record = self.classify(
                        record,
                        &record.gene,
                        genomic_position,
                        record.reference_base,
                        record.variant_base,
                    );
                    info!(
                        gene = %record.gene,
                        position,
                        genomic_position,
                        rsid = matched_record.rsid(),
                        "targeted mutation found"
                    );
                    return Some(MutationCall {
                        gene: record.gene.clone(),
                        position,
                        genomic_position,
                        reference_base: record.reference_base,
                        observed_base: record.variant_base,
                        aligned_position: column,
                        context,
                        matched_record,
                    });
                }
            }
            if q != GAP {
                query_offset += 1;
            }
            if r != GAP {
                reference_offset += 1;
            }
        }

        debug!(gene = %record.gene, "no matching mutation found");
        None
    }

    /// Classify an observed `reference -> observed` change at an absolute
    /// coordinate: first against the targeted record, then against the whole
    /// catalog.
    pub fn classify(
        &self,
        target: &VariantRecord,
        gene: &str,
        genomic_position: u64,
        reference: Base,
        observed: Base,
    ) -> Classification {
        if target.gene == gene
            && target.covers(genomic_position)
            && target.reference_base == reference
            && target.variant_base == observed
        {
            return Classification::Targeted(target.clone());
        }
        match self
            .knowledge_base
            .lookup(gene, genomic_position, reference, observed)
        {
            Some(record) => Classification::Catalogued(record.clone()),
            None => Classification::Unknown,
        }
    }

    fn context(&self, reference_row: &[u8], column: usize) -> String {
        let start = column.saturating_sub(self.context_radius);
        let end = column
            .saturating_add(self.context_radius)
            .saturating_add(1)
            .min(reference_row.len());
        String::from_utf8_lossy(&reference_row[start..end]).into_owned()
    }
}
