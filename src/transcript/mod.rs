//! Spliced transcripts: the four-space coordinate model and sequence extraction.
//!
//! # Coordinate spaces
//!
//! | Space       | Origin                          | Orientation            |
//! |-------------|---------------------------------|------------------------|
//! | chromosome  | chromosome base 0               | forward strand         |
//! | transcript  | first base of the mRNA          | 5'→3', introns removed |
//! | exon-local  | first base of a given exon      | 5'→3'                  |
//! | CDS         | first base of the start codon   | 5'→3'                  |
//!
//! Every conversion returns `None` when the input falls outside the target
//! space (an intronic chromosome position, a UTR position asked for a CDS
//! coordinate, and so on).

pub mod construction;
pub mod exon;

use crate::annotation::Annotation;
use crate::codon::{self, AminoAcid, CodonTable};
use crate::error::Error;
use crate::interval::Interval;
use crate::sequence::{SequenceProvider, reverse_complement};
use crate::strand::Strand;

use exon::Exon;

/// A transcript assembled from a BED12 record.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub(crate) name: String,
    pub(crate) interval: Interval,
    pub(crate) score: i64,
    pub(crate) thick_start: u64,
    pub(crate) thick_stop: u64,
    pub(crate) rgb: String,
    /// Chromosome order, regardless of strand.
    pub(crate) exon_intervals: Vec<Interval>,
    /// Chromosome order, regardless of strand.
    pub(crate) intron_intervals: Vec<Interval>,
    /// Transcript order (5'→3').
    pub(crate) exons: Vec<Exon>,
    pub(crate) annotations: Vec<Annotation>,
}

impl Transcript {
    /// Parse a single BED12 line.
    pub fn from_bed_line(line: &str) -> Result<Self, Error> {
        construction::parse_bed12(line)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    #[must_use]
    pub fn chromosome(&self) -> &str {
        self.interval.sequence_name()
    }

    #[must_use]
    pub fn strand(&self) -> Strand {
        self.interval.strand()
    }

    #[must_use]
    pub fn score(&self) -> i64 {
        self.score
    }

    #[must_use]
    pub fn thick_start(&self) -> u64 {
        self.thick_start
    }

    #[must_use]
    pub fn thick_stop(&self) -> u64 {
        self.thick_stop
    }

    #[must_use]
    pub fn rgb(&self) -> &str {
        &self.rgb
    }

    #[must_use]
    pub fn exon_intervals(&self) -> &[Interval] {
        &self.exon_intervals
    }

    #[must_use]
    pub fn intron_intervals(&self) -> &[Interval] {
        &self.intron_intervals
    }

    #[must_use]
    pub fn exons(&self) -> &[Exon] {
        &self.exons
    }

    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub(crate) fn set_annotations(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
    }

    /// Introns in chromosome-ascending order, whatever the strand.
    ///
    /// Callers wanting 5'→3' order on a minus-strand transcript must reverse.
    #[must_use]
    pub fn get_introns(&self) -> Vec<Interval> {
        self.intron_intervals.clone()
    }

    #[must_use]
    pub fn mrna_length(&self) -> u64 {
        self.exons.iter().map(Exon::len).sum()
    }

    #[must_use]
    pub fn cds_length(&self) -> u64 {
        self.exon_intervals
            .iter()
            .map(|e| {
                let start = e.start().max(self.thick_start);
                let stop = e.stop().min(self.thick_stop);
                stop.saturating_sub(start)
            })
            .sum()
    }

    #[must_use]
    pub fn is_coding(&self) -> bool {
        self.exons.iter().any(Exon::contains_cds)
    }

    // ── Coordinate conversion ────────────────────────────

    fn exon_at_transcript_pos(&self, p: u64) -> Option<&Exon> {
        self.exons.iter().find(|e| e.contains_transcript_pos(p))
    }

    fn exon_at_chrom_pos(&self, p: u64) -> Option<&Exon> {
        self.exons.iter().find(|e| e.contains_chrom_pos(p))
    }

    #[must_use]
    pub fn transcript_coordinate_to_chromosome(&self, p: u64) -> Option<u64> {
        self.exon_at_transcript_pos(p)?.transcript_pos_to_chrom_pos(p)
    }

    #[must_use]
    pub fn transcript_coordinate_to_cds(&self, p: u64) -> Option<u64> {
        self.exon_at_transcript_pos(p)?.transcript_pos_to_cds_pos(p)
    }

    #[must_use]
    pub fn chromosome_coordinate_to_transcript(&self, p: u64) -> Option<u64> {
        self.exon_at_chrom_pos(p)?.chrom_pos_to_transcript_pos(p)
    }

    #[must_use]
    pub fn chromosome_coordinate_to_cds(&self, p: u64) -> Option<u64> {
        self.exon_at_chrom_pos(p)?.chrom_pos_to_cds_pos(p)
    }

    #[must_use]
    pub fn cds_coordinate_to_transcript(&self, p: u64) -> Option<u64> {
        self.exons
            .iter()
            .find_map(|e| e.cds_pos_to_transcript_pos(p))
    }

    #[must_use]
    pub fn cds_coordinate_to_chromosome(&self, p: u64) -> Option<u64> {
        self.exons.iter().find_map(|e| e.cds_pos_to_chrom_pos(p))
    }

    /// Exon index (transcript order) and offset within that exon.
    #[must_use]
    pub fn transcript_coordinate_to_exon(&self, p: u64) -> Option<(usize, u64)> {
        self.exons
            .iter()
            .position(|e| e.contains_transcript_pos(p))
            .map(|i| (i, p - self.exons[i].transcript_start))
    }

    #[must_use]
    pub fn exon_coordinate_to_transcript(&self, index: usize, offset: u64) -> Option<u64> {
        let exon = self.exons.get(index)?;
        (offset < exon.len()).then(|| exon.transcript_start + offset)
    }

    /// CDS position as a `(codon, frame)` pair.
    #[must_use]
    pub fn cds_coordinate_to_codon(&self, p: u64) -> Option<(u64, u64)> {
        (p < self.cds_length()).then_some((p / 3, p % 3))
    }

    #[must_use]
    pub fn codon_coordinate_to_cds(&self, codon: u64, frame: u64) -> Option<u64> {
        if frame > 2 {
            return None;
        }
        let p = codon.checked_mul(3)?.checked_add(frame)?;
        (p < self.cds_length()).then_some(p)
    }

    #[must_use]
    pub fn cds_coordinate_to_amino_acid(&self, p: u64) -> Option<u64> {
        self.cds_coordinate_to_codon(p).map(|(codon, _)| codon)
    }

    #[must_use]
    pub fn transcript_coordinate_to_amino_acid(&self, p: u64) -> Option<u64> {
        self.transcript_coordinate_to_cds(p)
            .and_then(|c| self.cds_coordinate_to_amino_acid(c))
    }

    #[must_use]
    pub fn chromosome_coordinate_to_amino_acid(&self, p: u64) -> Option<u64> {
        self.chromosome_coordinate_to_cds(p)
            .and_then(|c| self.cds_coordinate_to_amino_acid(c))
    }

    // ── Sequence extraction ──────────────────────────────

    fn check_sequence<S: SequenceProvider + ?Sized>(&self, sequence: &S) -> Result<(), Error> {
        if sequence.name() != self.chromosome() {
            return Err(Error::NameMismatch {
                expected: self.chromosome().to_string(),
                found: sequence.name().to_string(),
            });
        }
        if self.interval.stop() > sequence.len() as u64 {
            return Err(Error::OutOfBounds {
                name: self.name.clone(),
                stop: self.interval.stop(),
                length: sequence.len() as u64,
            });
        }
        Ok(())
    }

    /// Concatenate `[start, stop)` slices in chromosome order, reverse-complemented on minus.
    fn spliced_sequence<S: SequenceProvider + ?Sized>(
        &self,
        sequence: &S,
        window: Option<(u64, u64)>,
    ) -> Result<Vec<u8>, Error> {
        self.check_sequence(sequence)?;
        let mut seq = Vec::with_capacity(self.mrna_length() as usize);
        for e in &self.exon_intervals {
            let (start, stop) = match window {
                Some((lo, hi)) => (e.start().max(lo), e.stop().min(hi)),
                None => (e.start(), e.stop()),
            };
            if start >= stop {
                continue;
            }
            let slice =
                sequence
                    .slice(start as usize, stop as usize)
                    .ok_or_else(|| Error::OutOfBounds {
                        name: self.name.clone(),
                        stop,
                        length: sequence.len() as u64,
                    })?;
            seq.extend_from_slice(slice);
        }
        if self.strand().is_minus() {
            seq = reverse_complement(&seq);
        }
        Ok(seq)
    }

    /// The spliced mRNA in 5'→3' orientation.
    pub fn get_mrna<S: SequenceProvider + ?Sized>(&self, sequence: &S) -> Result<Vec<u8>, Error> {
        self.spliced_sequence(sequence, None)
    }

    /// The coding sequence in 5'→3' orientation; empty for non-coding transcripts.
    pub fn get_cds<S: SequenceProvider + ?Sized>(&self, sequence: &S) -> Result<Vec<u8>, Error> {
        if self.thick_start == self.thick_stop {
            self.check_sequence(sequence)?;
            return Ok(Vec::new());
        }
        self.spliced_sequence(sequence, Some((self.thick_start, self.thick_stop)))
    }

    /// Translate the CDS with the standard code; a trailing partial codon is dropped.
    pub fn get_protein_sequence<S: SequenceProvider + ?Sized>(
        &self,
        sequence: &S,
    ) -> Result<Vec<AminoAcid>, Error> {
        let cds = self.get_cds(sequence)?;
        Ok(codon::translate(&cds, &CodonTable::standard()))
    }

    // ── BED output ───────────────────────────────────────

    /// The 12-field BED line (no trailing newline).
    #[must_use]
    pub fn to_bed_string(&self) -> String {
        let sizes: Vec<String> = self
            .exon_intervals
            .iter()
            .map(|e| e.size().to_string())
            .collect();
        let starts: Vec<String> = self
            .exon_intervals
            .iter()
            .map(|e| (e.start() - self.interval.start()).to_string())
            .collect();
        [
            self.chromosome().to_string(),
            self.interval.start().to_string(),
            self.interval.stop().to_string(),
            self.name.clone(),
            self.score.to_string(),
            self.strand().to_string(),
            self.thick_start.to_string(),
            self.thick_stop.to_string(),
            self.rgb.clone(),
            self.exon_intervals.len().to_string(),
            sizes.join(","),
            starts.join(","),
        ]
        .join("\t")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Sequence;

    // exons 100-150, 200-260, 300-340; CDS 120..320
    const PLUS: &str = "chr1\t100\t340\ttx1\t0\t+\t120\t320\t0\t3\t50,60,40\t0,100,200";
    const MINUS: &str = "chr1\t100\t340\ttx1\t0\t-\t120\t320\t0\t3\t50,60,40\t0,100,200";

    fn tx(line: &str) -> Transcript {
        Transcript::from_bed_line(line).unwrap()
    }

    fn pseudo_random_sequence(name: &str, len: usize) -> Sequence {
        let bases = b"ACGT";
        let mut state: u32 = 17;
        let seq = (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                bases[((state >> 16) % 4) as usize]
            })
            .collect();
        Sequence::new(name, seq)
    }

    #[test]
    fn lengths() {
        let t = tx(PLUS);
        assert_eq!(t.mrna_length(), 150);
        assert_eq!(t.cds_length(), 110);
        assert!(t.is_coding());
    }

    #[test]
    fn transcript_chromosome_inverse_law() {
        for line in [PLUS, MINUS] {
            let t = tx(line);
            for p in 0..t.mrna_length() {
                let c = t.transcript_coordinate_to_chromosome(p).unwrap();
                assert_eq!(t.chromosome_coordinate_to_transcript(c), Some(p));
            }
            assert_eq!(t.transcript_coordinate_to_chromosome(t.mrna_length()), None);
        }
    }

    #[test]
    fn transcript_cds_inverse_law() {
        for line in [PLUS, MINUS] {
            let t = tx(line);
            for c in 0..t.cds_length() {
                let p = t.cds_coordinate_to_transcript(c).unwrap();
                assert_eq!(t.transcript_coordinate_to_cds(p), Some(c));
            }
            assert_eq!(t.cds_coordinate_to_transcript(t.cds_length()), None);
        }
    }

    #[test]
    fn cds_chromosome_inverse_law() {
        for line in [PLUS, MINUS] {
            let t = tx(line);
            for c in 0..t.cds_length() {
                let g = t.cds_coordinate_to_chromosome(c).unwrap();
                assert!(g >= t.thick_start() && g < t.thick_stop());
                assert_eq!(t.chromosome_coordinate_to_cds(g), Some(c));
            }
        }
    }

    #[test]
    fn intronic_positions_have_no_transcript_coordinate() {
        let t = tx(PLUS);
        assert_eq!(t.chromosome_coordinate_to_transcript(150), None);
        assert_eq!(t.chromosome_coordinate_to_transcript(199), None);
        assert_eq!(t.chromosome_coordinate_to_transcript(99), None);
        assert_eq!(t.chromosome_coordinate_to_transcript(340), None);
    }

    #[test]
    fn utr_positions_have_no_cds_coordinate() {
        let t = tx(PLUS);
        assert_eq!(t.transcript_coordinate_to_cds(19), None);
        assert_eq!(t.transcript_coordinate_to_cds(20), Some(0));
        assert_eq!(t.chromosome_coordinate_to_cds(119), None);
        assert_eq!(t.chromosome_coordinate_to_cds(320), None);

        let utr_only = tx("chr1\t0\t300\ttx\t0\t+\t110\t190\t0\t3\t50,100,50\t0,100,250");
        for p in 0..50 {
            assert_eq!(utr_only.transcript_coordinate_to_cds(p), None);
        }
    }

    #[test]
    fn minus_strand_coordinates() {
        let t = tx(MINUS);
        // 5' base of the mRNA is the last chromosome base
        assert_eq!(t.transcript_coordinate_to_chromosome(0), Some(339));
        assert_eq!(t.transcript_coordinate_to_chromosome(149), Some(100));
        // first CDS base is thickEnd - 1
        assert_eq!(t.cds_coordinate_to_chromosome(0), Some(319));
        assert_eq!(t.cds_coordinate_to_chromosome(109), Some(120));
    }

    #[test]
    fn exon_local_coordinates() {
        let t = tx(MINUS);
        assert_eq!(t.transcript_coordinate_to_exon(0), Some((0, 0)));
        assert_eq!(t.transcript_coordinate_to_exon(45), Some((1, 5)));
        assert_eq!(t.transcript_coordinate_to_exon(150), None);
        assert_eq!(t.exon_coordinate_to_transcript(1, 5), Some(45));
        assert_eq!(t.exon_coordinate_to_transcript(1, 60), None);
        assert_eq!(t.exon_coordinate_to_transcript(3, 0), None);
    }

    #[test]
    fn amino_acid_coordinates() {
        let t = tx(PLUS);
        assert_eq!(t.transcript_coordinate_to_amino_acid(20), Some(0));
        assert_eq!(t.transcript_coordinate_to_amino_acid(26), Some(2));
        assert_eq!(t.chromosome_coordinate_to_amino_acid(123), Some(1));
        assert_eq!(t.cds_coordinate_to_codon(7), Some((2, 1)));
        assert_eq!(t.codon_coordinate_to_cds(2, 1), Some(7));
        assert_eq!(t.codon_coordinate_to_cds(0, 3), None);
        assert_eq!(t.cds_coordinate_to_amino_acid(110), None);
    }

    #[test]
    fn mrna_extraction_plus_strand() {
        let seq = Sequence::new("chr1", b"AAAACCCCGGGGTTTT".to_vec());
        let t = tx("chr1\t2\t14\ttx\t0\t+\t2\t14\t0\t2\t4,4\t0,8");
        // blocks 2..6 and 10..14
        assert_eq!(t.get_mrna(&seq).unwrap(), b"AACCGGTT");
    }

    #[test]
    fn mrna_extraction_minus_strand() {
        let seq = Sequence::new("chr1", b"AAAACCCCGGGGTTTT".to_vec());
        let t = tx("chr1\t2\t14\ttx\t0\t-\t2\t14\t0\t2\t4,4\t0,8");
        assert_eq!(t.get_mrna(&seq).unwrap(), b"AACCGGTT");
    }

    #[test]
    fn strand_symmetry() {
        let len = 400;
        let plus_seq = pseudo_random_sequence("chr1", len);
        let rc = Sequence::new("chr1", reverse_complement(plus_seq.bases()));
        let plus = tx(PLUS);

        // mirror blocks: [s, e) -> [len - e, len - s)
        let mirrored: Vec<(u64, u64)> = plus
            .exon_intervals()
            .iter()
            .rev()
            .map(|e| (len as u64 - e.stop(), len as u64 - e.start()))
            .collect();
        let start = mirrored[0].0;
        let stop = mirrored[mirrored.len() - 1].1;
        let sizes: Vec<String> = mirrored.iter().map(|(s, e)| (e - s).to_string()).collect();
        let starts: Vec<String> = mirrored.iter().map(|(s, _)| (s - start).to_string()).collect();
        let line = format!(
            "chr1\t{start}\t{stop}\ttx1\t0\t-\t{}\t{}\t0\t{}\t{}\t{}",
            len as u64 - plus.thick_stop(),
            len as u64 - plus.thick_start(),
            mirrored.len(),
            sizes.join(","),
            starts.join(",")
        );
        let minus = tx(&line);

        assert_eq!(plus.get_mrna(&plus_seq).unwrap(), minus.get_mrna(&rc).unwrap());
        assert_eq!(plus.get_cds(&plus_seq).unwrap(), minus.get_cds(&rc).unwrap());
    }

    #[test]
    fn cds_extraction() {
        let seq = pseudo_random_sequence("chr1", 400);
        for line in [PLUS, MINUS] {
            let t = tx(line);
            let cds = t.get_cds(&seq).unwrap();
            assert_eq!(cds.len() as u64, t.cds_length());
            // CDS is the mRNA window between the start and stop codon positions
            let mrna = t.get_mrna(&seq).unwrap();
            let first = t.cds_coordinate_to_transcript(0).unwrap() as usize;
            assert_eq!(&mrna[first..first + cds.len()], cds.as_slice());
        }
    }

    #[test]
    fn non_coding_cds_is_empty() {
        let seq = pseudo_random_sequence("chr1", 400);
        let t = tx("chr1\t100\t300\tnc\t0\t+\t0\t0\t0\t2\t50,50\t0,150");
        assert!(t.get_cds(&seq).unwrap().is_empty());
        assert!(t.get_protein_sequence(&seq).unwrap().is_empty());
    }

    #[test]
    fn protein_translation() {
        // ATG AAA TAA on a single exon
        let seq = Sequence::new("chr1", b"CCATGAAATAACC".to_vec());
        let t = tx("chr1\t0\t13\ttx\t0\t+\t2\t11\t0\t1\t13\t0");
        let protein = t.get_protein_sequence(&seq).unwrap();
        assert_eq!(
            protein,
            vec![AminoAcid::Residue(b'M'), AminoAcid::Residue(b'K'), AminoAcid::Stop]
        );
    }

    #[test]
    fn protein_translation_drops_partial_codon() {
        let seq = Sequence::new("chr1", b"ATGAAAT".to_vec());
        let t = tx("chr1\t0\t7\ttx\t0\t+\t0\t7\t0\t1\t7\t0");
        assert_eq!(t.get_protein_sequence(&seq).unwrap().len(), 2);
    }

    #[test]
    fn sequence_name_mismatch() {
        let seq = pseudo_random_sequence("chr2", 400);
        let err = tx(PLUS).get_mrna(&seq).unwrap_err();
        assert!(matches!(err, Error::NameMismatch { .. }));
    }

    #[test]
    fn sequence_too_short() {
        let seq = pseudo_random_sequence("chr1", 300);
        let t = tx(PLUS);
        assert!(matches!(t.get_mrna(&seq).unwrap_err(), Error::OutOfBounds { .. }));
        // coordinate queries still work
        assert_eq!(t.transcript_coordinate_to_chromosome(0), Some(100));
    }

    #[test]
    fn introns_are_chromosome_ordered() {
        let t = tx(MINUS);
        let introns = t.get_introns();
        assert_eq!(introns.len(), 2);
        assert_eq!((introns[0].start(), introns[0].stop()), (150, 200));
        assert_eq!((introns[1].start(), introns[1].stop()), (260, 300));
    }

    #[test]
    fn bed_string_round_trip() {
        for line in [PLUS, MINUS] {
            let t = tx(line);
            assert_eq!(t.to_bed_string(), line);
        }
        let trailing = tx("chr1\t0\t100\ttx\t5\t+\t10\t40\t128,0,0\t1\t100,\t0,");
        assert_eq!(
            trailing.to_bed_string(),
            "chr1\t0\t100\ttx\t5\t+\t10\t40\t128,0,0\t1\t100\t0"
        );
    }
}
