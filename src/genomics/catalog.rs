//! Known-variant catalog.
//!
//! Loaded once at startup and never mutated afterwards, so a single
//! `Arc<KnowledgeBase>` can be shared by every request without locking.
//! Lookups are linear scans over the record list.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::genomics::{Base, Sequence};

const BUILTIN_CATALOG: &str = include_str!("../../data/snps_db.json");

/// Catalogued single-nucleotide variant associated with a trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    /// Gene symbol.
    pub gene: String,
    /// dbSNP identifier.
    pub rsid: String,
    /// Trait the variant is associated with.
    #[serde(rename = "trait")]
    pub trait_name: String,
    /// Free-text description of the variant.
    #[serde(default)]
    pub description: String,
    /// Biological effect of carrying the variant.
    #[serde(default)]
    pub effect: String,
    /// Reference window surrounding the variant.
    pub reference_sequence: Sequence,
    /// Absolute coordinate of the variant.
    pub position: u64,
    /// Absolute coordinate of the first base of `reference_sequence`.
    pub position_start: u64,
    /// Absolute coordinate of the last base covered by the record (inclusive).
    pub position_end: u64,
    /// Base expected at the site.
    #[serde(rename = "reference", alias = "reference_base")]
    pub reference_base: Base,
    /// Base that indicates the variant.
    #[serde(rename = "variant", alias = "variant_base")]
    pub variant_base: Base,
}

impl VariantRecord {
    /// Whether `position` lies within `[position_start, position_end]`.
    pub fn covers(&self, position: u64) -> bool {
        (self.position_start..=self.position_end).contains(&position)
    }

    /// Whether this record describes `reference -> observed` at `position` on `gene`.
    pub fn matches_site(&self, gene: &str, position: u64, reference: Base, observed: Base) -> bool {
        self.gene == gene
            && self.position == position
            && self.reference_base == reference
            && self.variant_base == observed
    }

    fn check(&self) -> Result<(), String> {
        if self.gene.trim().is_empty() {
            return Err("gene is empty".to_string());
        }
        if self.trait_name.trim().is_empty() {
            return Err("trait is empty".to_string());
        }
        if self.reference_sequence.is_empty() {
            return Err("reference_sequence is empty".to_string());
        }
        if self.position_start > self.position_end {
            return Err(format!(
                "position_start {} is after position_end {}",
                self.position_start, self.position_end
            ));
        }
        if self.reference_base == self.variant_base {
            return Err(format!(
                "reference and variant bases are both {}",
                self.reference_base
            ));
        }
        Ok(())
    }
}

/// Errors raised while loading the catalog. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Catalog is not valid JSON or an entry has the wrong shape.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// An entry parsed but violates a record invariant.
    #[error("invalid catalog record #{index} ({rsid}): {reason}")]
    InvalidRecord {
        /// Zero-based index of the record in the catalog.
        index: usize,
        /// Identifier of the offending record.
        rsid: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Catalog contained no records.
    #[error("catalog contains no records")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    snps: Vec<VariantRecord>,
}

/// Immutable, ordered catalog of known variants.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    records: Vec<VariantRecord>,
}

impl KnowledgeBase {
    /// Build from records, validating each of them.
    pub fn from_records(records: Vec<VariantRecord>) -> Result<Self, CatalogError> {
        if records.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, record) in records.iter().enumerate() {
            record.check().map_err(|reason| CatalogError::InvalidRecord {
                index,
                rsid: record.rsid.clone(),
                reason,
            })?;
        }
        Ok(Self { records })
    }

    /// Parse a catalog document of the form `{"snps": [...]}`.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_records(file.snps)
    }

    /// Load a catalog document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let kb = Self::from_json_str(&json)?;
        info!(path = %path.display(), records = kb.len(), "loaded variant catalog");
        Ok(kb)
    }

    /// Catalog compiled into the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    /// All records in catalog order.
    pub fn records(&self) -> &[VariantRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty (never true for a loaded catalog).
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record for the requested trait on the requested gene.
    pub fn find_target(&self, trait_name: &str, gene: &str) -> Option<&VariantRecord> {
        self.records
            .iter()
            .find(|record| record.trait_name == trait_name && record.gene == gene)
    }

    /// First record describing `reference -> observed` at an absolute position.
    pub fn lookup(
        &self,
        gene: &str,
        position: u64,
        reference: Base,
        observed: Base,
    ) -> Option<&VariantRecord> {
        self.records
            .iter()
            .find(|record| record.matches_site(gene, position, reference, observed))
    }

    /// One record per distinct (trait, gene) pair, in catalog order.
    pub fn available_traits(&self) -> Vec<&VariantRecord> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|record| seen.insert((record.trait_name.as_str(), record.gene.as_str())))
            .collect()
    }
}
