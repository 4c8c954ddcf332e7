//! A single exonic block of a transcript and its per-exon coordinate conversions.
//!
//! All positions are 0-based and all ranges half-open. Transcript-local
//! positions run 5'→3' along the spliced transcript, so on the minus strand
//! the first transcript-local base of an exon is its last chromosome base.

use crate::strand::Strand;

/// One exon, carrying transcript-local and chromosome coordinates plus the
/// CDS bookkeeping needed to place coding bases.
///
/// Exactly one CDS classification holds per exon:
///
/// | `cds_start` | `cds_stop` | `cds_offset` | meaning                          |
/// |-------------|------------|--------------|----------------------------------|
/// | set         | set        | unset        | start and stop codon (single)    |
/// | set         | unset      | unset        | start codon exon                 |
/// | unset       | set        | set          | stop codon exon                  |
/// | unset       | unset      | set          | fully coding exon                |
/// | unset       | unset      | unset        | non-coding exon                  |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exon {
    pub transcript_start: u64,
    pub transcript_stop: u64,
    pub strand: Strand,
    pub chrom_start: u64,
    pub chrom_stop: u64,
    /// Transcript-local position of the first CDS base, if the start codon is in this exon.
    pub cds_start: Option<u64>,
    /// Transcript-local position one past the last CDS base, if the stop codon is in this exon.
    pub cds_stop: Option<u64>,
    /// CDS coordinate of this exon's first base (fully coding and stop codon exons).
    pub cds_offset: Option<u64>,
}

impl Exon {
    #[must_use]
    pub fn len(&self) -> u64 {
        self.transcript_stop - self.transcript_start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains_transcript_pos(&self, p: u64) -> bool {
        self.transcript_start <= p && p < self.transcript_stop
    }

    #[must_use]
    pub fn contains_chrom_pos(&self, p: u64) -> bool {
        self.chrom_start <= p && p < self.chrom_stop
    }

    /// True unless the exon is purely non-coding.
    #[must_use]
    pub fn contains_cds(&self) -> bool {
        self.cds_start.is_some() || self.cds_stop.is_some() || self.cds_offset.is_some()
    }

    #[must_use]
    pub fn transcript_pos_to_chrom_pos(&self, p: u64) -> Option<u64> {
        if !self.contains_transcript_pos(p) {
            return None;
        }
        let offset = p - self.transcript_start;
        Some(if self.strand.is_minus() {
            self.chrom_stop - 1 - offset
        } else {
            self.chrom_start + offset
        })
    }

    #[must_use]
    pub fn chrom_pos_to_transcript_pos(&self, p: u64) -> Option<u64> {
        if !self.contains_chrom_pos(p) {
            return None;
        }
        Some(if self.strand.is_minus() {
            self.transcript_start + (self.chrom_stop - 1 - p)
        } else {
            self.transcript_start + (p - self.chrom_start)
        })
    }

    #[must_use]
    pub fn transcript_pos_to_cds_pos(&self, p: u64) -> Option<u64> {
        if !self.contains_transcript_pos(p) || !self.contains_cds() {
            return None;
        }
        match (self.cds_start, self.cds_stop, self.cds_offset) {
            (Some(start), Some(stop), _) => (start <= p && p < stop).then(|| p - start),
            (Some(start), None, _) => (p >= start).then(|| p - start),
            (None, Some(stop), Some(offset)) => {
                (p < stop).then(|| offset + p - self.transcript_start)
            }
            (None, None, Some(offset)) => Some(offset + p - self.transcript_start),
            _ => None,
        }
    }

    /// Inverse of [`Exon::transcript_pos_to_cds_pos`].
    ///
    /// The candidate position is re-checked against this exon's coding range,
    /// so a CDS position belonging to another exon yields `None`.
    #[must_use]
    pub fn cds_pos_to_transcript_pos(&self, p: u64) -> Option<u64> {
        let t = match (self.cds_start, self.cds_offset) {
            (Some(start), _) => start.checked_add(p)?,
            (None, Some(offset)) => p.checked_sub(offset)? + self.transcript_start,
            (None, None) => return None,
        };
        let after_start = self.cds_start.is_none_or(|start| t >= start);
        let before_stop = self.cds_stop.is_none_or(|stop| t < stop);
        (self.contains_transcript_pos(t) && after_start && before_stop).then_some(t)
    }

    #[must_use]
    pub fn chrom_pos_to_cds_pos(&self, p: u64) -> Option<u64> {
        self.chrom_pos_to_transcript_pos(p)
            .and_then(|t| self.transcript_pos_to_cds_pos(t))
    }

    #[must_use]
    pub fn cds_pos_to_chrom_pos(&self, p: u64) -> Option<u64> {
        self.cds_pos_to_transcript_pos(p)
            .and_then(|t| self.transcript_pos_to_chrom_pos(t))
    }
}
