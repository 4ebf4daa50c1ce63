use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Symbol used in aligned rows to mark an insertion/deletion.
pub const GAP: u8 = b'-';

/// Canonical nucleotide accepted by the analysis core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Base {
    /// Adenine.
    A,
    /// Cytosine.
    C,
    /// Guanine.
    G,
    /// Thymine.
    T,
}

impl Base {
    /// Attempt to parse an ASCII base (case-insensitive).
    pub fn from_ascii(base: u8) -> Option<Self> {
        match base {
            b'A' | b'a' => Some(Base::A),
            b'C' | b'c' => Some(Base::C),
            b'G' | b'g' => Some(Base::G),
            b'T' | b't' => Some(Base::T),
            _ => None,
        }
    }

    /// Uppercase ASCII representation.
    #[inline]
    pub fn to_ascii(self) -> u8 {
        match self {
            Base::A => b'A',
            Base::C => b'C',
            Base::G => b'G',
            Base::T => b'T',
        }
    }

    /// Character representation, as used in reports.
    pub fn as_char(self) -> char {
        self.to_ascii() as char
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Base {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        match bytes {
            [single] => Base::from_ascii(*single).ok_or(SequenceError::InvalidBase(s.to_string())),
            _ => Err(SequenceError::InvalidBase(s.to_string())),
        }
    }
}

impl Serialize for Base {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.as_char())
    }
}

impl<'de> Deserialize<'de> for Base {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors raised while validating nucleotide input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    /// Sequence contained symbols outside {A, C, G, T}.
    #[error("invalid nucleotide sequence: found {found:?} (only A, T, C, G are allowed)")]
    InvalidSymbols {
        /// Distinct offending characters, in order of first appearance.
        found: Vec<char>,
    },

    /// Sequence was empty after cleaning.
    #[error("empty sequence provided")]
    Empty,

    /// A single-base field did not hold exactly one of A, C, G, T.
    #[error("invalid base '{0}': expected a single A, C, G or T")]
    InvalidBase(String),
}

/// Validated nucleotide sequence (uppercase A/C/G/T, no gaps).
///
/// Immutable once constructed; the alignment core borrows it as bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Sequence {
    bases: Box<[u8]>,
}

impl Sequence {
    /// Validate and uppercase the provided text. Surrounding whitespace is
    /// ignored; any other non-ACGT character is an error.
    pub fn parse(text: &str) -> Result<Self, SequenceError> {
        let trimmed = text.trim();
        let mut found: Vec<char> = Vec::new();
        let mut bases = Vec::with_capacity(trimmed.len());

        for ch in trimmed.chars() {
            match u8::try_from(ch).ok().and_then(Base::from_ascii) {
                Some(base) => bases.push(base.to_ascii()),
                None => {
                    if !found.contains(&ch) {
                        found.push(ch);
                    }
                }
            }
        }

        if !found.is_empty() {
            return Err(SequenceError::InvalidSymbols { found });
        }
        Ok(Self {
            bases: bases.into_boxed_slice(),
        })
    }

    /// Like [`Sequence::parse`] but rejects empty input.
    pub fn parse_non_empty(text: &str) -> Result<Self, SequenceError> {
        let sequence = Self::parse(text)?;
        if sequence.is_empty() {
            return Err(SequenceError::Empty);
        }
        Ok(sequence)
    }

    /// Uppercase the text and silently drop every character that is not a
    /// nucleotide (line breaks, digits, spacing from pasted uploads).
    pub fn from_text_lossy(text: &str) -> Self {
        let bases: Vec<u8> = text
            .bytes()
            .filter_map(Base::from_ascii)
            .map(Base::to_ascii)
            .collect();
        Self {
            bases: bases.into_boxed_slice(),
        }
    }

    /// Number of bases.
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Whether the sequence holds no bases.
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Raw uppercase ASCII bases.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bases
    }

    /// String view of the bases.
    pub fn as_str(&self) -> &str {
        // Only ASCII nucleotides are ever stored.
        std::str::from_utf8(&self.bases).unwrap_or_default()
    }

    /// Percentage of G and C bases; 0 for an empty sequence.
    pub fn gc_content(&self) -> f64 {
        if self.bases.is_empty() {
            return 0.0;
        }
        let gc = self
            .bases
            .iter()
            .filter(|&&b| b == b'G' || b == b'C')
            .count();
        gc as f64 / self.bases.len() as f64 * 100.0
    }
}

impl AsRef<[u8]> for Sequence {
    fn as_ref(&self) -> &[u8] {
        &self.bases
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Sequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Sequence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Sequence::parse(&raw).map_err(serde::de::Error::custom)
    }
}
