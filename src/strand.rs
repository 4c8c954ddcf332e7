//! Strand orientation for genomic features.

use std::fmt;

use crate::error::Error;

/// Strand orientation of a genomic feature.
///
/// Annotation intervals carry no strand, so `Unstranded` is a real variant
/// rather than a missing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strand {
    Plus,
    Minus,
    Unstranded,
}

impl Strand {
    /// Parse a BED strand column. Only `+` and `-` are accepted for transcripts.
    pub fn from_bed(s: &str) -> Result<Self, Error> {
        match s {
            "+" => Ok(Self::Plus),
            "-" => Ok(Self::Minus),
            _ => Err(Error::MalformedFeature(format!(
                "invalid strand '{s}', expected '+' or '-'"
            ))),
        }
    }

    #[must_use]
    pub fn is_minus(self) -> bool {
        self == Self::Minus
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Unstranded => write!(f, "."),
        }
    }
}
