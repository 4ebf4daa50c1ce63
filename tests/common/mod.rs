#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use traitseq::{Analyzer, KnowledgeBase, Sequence};

/// HBB exon 1 reference window from the built-in catalog.
pub const HBB: &str =
    "ATGGTGCACCTGACTCCTGAGGAGAAGTCTGCCGTTACTGCCCTGTGGGGCAAGGTGAACGTGGATGAAGTTGGTGGTGAGGCCCTGGGCAG";

pub fn builtin_kb() -> Arc<KnowledgeBase> {
    Arc::new(KnowledgeBase::builtin().expect("built-in catalog loads"))
}

pub fn analyzer() -> Analyzer {
    Analyzer::with_defaults(builtin_kb())
}

/// Copy of `base` with the listed `(index, new_base)` substitutions applied.
pub fn substitute(base: &str, edits: &[(usize, u8)]) -> String {
    let mut bytes = base.as_bytes().to_vec();
    for &(index, new_base) in edits {
        bytes[index] = new_base;
    }
    String::from_utf8(bytes).expect("ascii")
}

pub fn seq(text: &str) -> Sequence {
    Sequence::parse(text).expect("valid test sequence")
}

/// Deterministic pseudo-random bases (64-bit LCG), for flanks and decoys.
pub fn pseudo_random_bases(len: usize, seed: u64) -> String {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            b"ACGT"[(state >> 62) as usize] as char
        })
        .collect()
}

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("TRAITSEQ_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set TRAITSEQ_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path,
            expected,
            actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n")
}
