//! Chromosome sequences and the provider interface transcripts slice from.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Error;
use crate::fasta::{self, FastaRecord};

/// Random access to one forward-strand sequence.
///
/// Providers never reverse-complement; transcripts do that themselves.
pub trait SequenceProvider {
    fn name(&self) -> &str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bases in `[start, stop)`, or `None` when the range is out of bounds.
    fn slice(&self, start: usize, stop: usize) -> Option<&[u8]>;
}

/// An owned named sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    name: String,
    bases: Vec<u8>,
}

impl Sequence {
    pub fn new(name: impl Into<String>, bases: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bases,
        }
    }

    #[must_use]
    pub fn bases(&self) -> &[u8] {
        &self.bases
    }
}

impl From<FastaRecord> for Sequence {
    fn from(record: FastaRecord) -> Self {
        Self::new(record.name, record.sequence)
    }
}

impl SequenceProvider for Sequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.bases.len()
    }

    fn slice(&self, start: usize, stop: usize) -> Option<&[u8]> {
        self.bases.get(start..stop)
    }
}

/// Sequences keyed by name.
#[derive(Debug, Default)]
pub struct Genome {
    sequences: HashMap<String, Sequence>,
}

impl Genome {
    /// Build from FASTA records. Duplicate names are rejected.
    pub fn from_records(records: Vec<FastaRecord>) -> Result<Self, Error> {
        let mut sequences = HashMap::with_capacity(records.len());
        for record in records {
            if sequences.contains_key(&record.name) {
                return Err(Error::Parse(format!(
                    "duplicate sequence name in FASTA: {}",
                    record.name
                )));
            }
            sequences.insert(record.name.clone(), Sequence::from(record));
        }
        Ok(Self { sequences })
    }

    pub fn from_fasta_file(path: &Path) -> Result<Self, Error> {
        Self::from_records(fasta::read_fasta_file(path)?)
    }

    pub fn get(&self, name: &str) -> Result<&Sequence, Error> {
        self.sequences
            .get(name)
            .ok_or_else(|| Error::MissingSequence(name.to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

/// Watson-Crick complement of `ACGTN`, preserving case. Other bytes pass through.
#[must_use]
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        b'N' => b'N',
        b'a' => b't',
        b'c' => b'g',
        b'g' => b'c',
        b't' => b'a',
        b'n' => b'n',
        other => other,
    }
}

#[must_use]
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}
