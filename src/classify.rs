//! Per-transcript classifiers producing one integer record per transcript.
//!
//! A classifier never aborts a batch: failures are collected alongside the
//! records so the caller can report them per transcript.

use std::collections::BTreeMap;

use crate::error::Error;
use crate::interval::Interval;
use crate::sequence::{Genome, SequenceProvider, reverse_complement};
use crate::store::TranscriptStore;
use crate::transcript::Transcript;

pub trait Classifier {
    fn name(&self) -> &str;

    fn classify(&self, transcript: &Transcript, sequence: &dyn SequenceProvider)
    -> Result<i64, Error>;
}

/// Records keyed by transcript name, plus the transcripts that failed.
#[derive(Debug, Default)]
pub struct ClassifierOutput {
    pub records: BTreeMap<String, i64>,
    pub failures: Vec<(String, Error)>,
}

/// Run a classifier over every transcript in the store.
pub fn run_classifier(
    classifier: &dyn Classifier,
    store: &TranscriptStore,
    genome: &Genome,
) -> ClassifierOutput {
    let mut output = ClassifierOutput::default();
    for t in store {
        let result = genome
            .get(t.chromosome())
            .and_then(|seq| classifier.classify(t, seq));
        match result {
            Ok(value) => {
                output.records.insert(t.name().to_string(), value);
            }
            Err(e) => {
                log::warn!("{}: {} failed: {e}", classifier.name(), t.name());
                output.failures.push((t.name().to_string(), e));
            }
        }
    }
    log::info!(
        "{}: {} records, {} failures",
        classifier.name(),
        output.records.len(),
        output.failures.len()
    );
    output
}

fn check_chromosome(transcript: &Transcript, sequence: &dyn SequenceProvider) -> Result<(), Error> {
    if sequence.name() != transcript.chromosome() {
        return Err(Error::NameMismatch {
            expected: transcript.chromosome().to_string(),
            found: sequence.name().to_string(),
        });
    }
    Ok(())
}

fn slice<'a>(
    transcript: &Transcript,
    sequence: &'a dyn SequenceProvider,
    start: u64,
    stop: u64,
) -> Result<&'a [u8], Error> {
    sequence
        .slice(start as usize, stop as usize)
        .ok_or_else(|| Error::OutOfBounds {
            name: transcript.name().to_string(),
            stop,
            length: sequence.len() as u64,
        })
}

/// 1 when the CDS ends in a stop codon (or there is no CDS), else 0.
#[derive(Debug, Default)]
pub struct EndStop;

impl Classifier for EndStop {
    fn name(&self) -> &str {
        "EndStop"
    }

    fn classify(
        &self,
        transcript: &Transcript,
        sequence: &dyn SequenceProvider,
    ) -> Result<i64, Error> {
        let protein = transcript.get_protein_sequence(sequence)?;
        Ok(i64::from(protein.last().is_none_or(|aa| aa.is_stop())))
    }
}

/// 1 when a coding intron has a known donor but the wrong acceptor.
///
/// Known pairs are `GT..AG`, `GC..AG` and `AT..AC`, read 5'→3' on the
/// transcript's strand. Introns shorter than `min_intron_size` are skipped.
#[derive(Debug)]
pub struct CdsUnknownSplice {
    pub min_intron_size: u64,
}

impl Default for CdsUnknownSplice {
    fn default() -> Self {
        Self { min_intron_size: 30 }
    }
}

impl CdsUnknownSplice {
    fn overlaps_cds(transcript: &Transcript, exon: &Interval) -> bool {
        exon.start() < transcript.thick_stop() && transcript.thick_start() < exon.stop()
    }

    fn splice_sites(
        transcript: &Transcript,
        intron: &Interval,
        sequence: &dyn SequenceProvider,
    ) -> Result<(Vec<u8>, Vec<u8>), Error> {
        let left = slice(transcript, sequence, intron.start(), intron.start() + 2)?;
        let right = slice(transcript, sequence, intron.stop() - 2, intron.stop())?;
        Ok(if transcript.strand().is_minus() {
            (reverse_complement(right), reverse_complement(left))
        } else {
            (left.to_vec(), right.to_vec())
        })
    }
}

#[must_use]
pub fn is_bad_splice(donor: &[u8], acceptor: &[u8]) -> bool {
    let donor = donor.to_ascii_uppercase();
    let acceptor = acceptor.to_ascii_uppercase();
    match donor.as_slice() {
        b"GT" | b"GC" => acceptor != b"AG",
        b"AT" => acceptor != b"AC",
        _ => false,
    }
}

impl Classifier for CdsUnknownSplice {
    fn name(&self) -> &str {
        "CdsUnknownSplice"
    }

    fn classify(
        &self,
        transcript: &Transcript,
        sequence: &dyn SequenceProvider,
    ) -> Result<i64, Error> {
        check_chromosome(transcript, sequence)?;
        let flanked = transcript
            .exon_intervals()
            .windows(2)
            .zip(transcript.intron_intervals());
        for (pair, intron) in flanked {
            let coding = pair.iter().all(|e| Self::overlaps_cds(transcript, e));
            if !coding || intron.size() < self.min_intron_size {
                continue;
            }
            let (donor, acceptor) = Self::splice_sites(transcript, intron, sequence)?;
            if is_bad_splice(&donor, &acceptor) {
                return Ok(1);
            }
        }
        Ok(0)
    }
}

/// Number of `N` bases inside the exon blocks.
#[derive(Debug, Default)]
pub struct UnknownBases;

impl Classifier for UnknownBases {
    fn name(&self) -> &str {
        "UnknownBases"
    }

    fn classify(
        &self,
        transcript: &Transcript,
        sequence: &dyn SequenceProvider,
    ) -> Result<i64, Error> {
        check_chromosome(transcript, sequence)?;
        let mut count = 0i64;
        for exon in transcript.exon_intervals() {
            let bases = slice(transcript, sequence, exon.start(), exon.stop())?;
            count += bases.iter().filter(|b| b.eq_ignore_ascii_case(&b'N')).count() as i64;
        }
        Ok(count)
    }
}
