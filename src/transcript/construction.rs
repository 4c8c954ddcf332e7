//! Transcript construction: BED12 parsing, intron derivation and CDS placement.

use std::str::FromStr;

use crate::error::Error;
use crate::interval::Interval;
use crate::strand::Strand;

use super::Transcript;
use super::exon::Exon;

const BED12_FIELDS: usize = 12;

/// Parse one whitespace-delimited BED12 line into a transcript.
pub fn parse_bed12(line: &str) -> Result<Transcript, Error> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != BED12_FIELDS {
        return Err(Error::MalformedFeature(format!(
            "expected {BED12_FIELDS} BED fields, found {}",
            fields.len()
        )));
    }

    let chromosome = fields[0];
    let chrom_start: u64 = parse_field(fields[1], "chromStart")?;
    let chrom_stop: u64 = parse_field(fields[2], "chromEnd")?;
    let name = fields[3];
    let score: i64 = parse_field(fields[4], "score")?;
    let strand = Strand::from_bed(fields[5])?;
    let thick_start: u64 = parse_field(fields[6], "thickStart")?;
    let thick_stop: u64 = parse_field(fields[7], "thickEnd")?;
    let rgb = fields[8];
    let block_count: usize = parse_field(fields[9], "blockCount")?;
    let block_sizes = parse_list(fields[10], "blockSizes")?;
    let block_starts = parse_list(fields[11], "blockStarts")?;

    if thick_start > thick_stop {
        return Err(Error::MalformedFeature(format!(
            "{name}: thickStart {thick_start} is after thickEnd {thick_stop}"
        )));
    }
    if block_sizes.len() != block_count || block_starts.len() != block_count {
        return Err(Error::MalformedFeature(format!(
            "{name}: blockCount {block_count} but {} sizes and {} starts",
            block_sizes.len(),
            block_starts.len()
        )));
    }

    let interval = Interval::new(chromosome, chrom_start, chrom_stop, strand)?;
    let exon_intervals = build_exon_intervals(&interval, &block_sizes, &block_starts)?;
    let intron_intervals = build_intron_intervals(&exon_intervals)?;
    let exons = build_exons(&exon_intervals, strand, thick_start, thick_stop);

    Ok(Transcript {
        name: name.to_string(),
        interval,
        score,
        thick_start,
        thick_stop,
        rgb: rgb.to_string(),
        exon_intervals,
        intron_intervals,
        exons,
        annotations: Vec::new(),
    })
}

fn parse_field<T: FromStr>(value: &str, what: &str) -> Result<T, Error>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| Error::MalformedFeature(format!("invalid {what} '{value}': {e}")))
}

/// Comma-separated integers; a trailing comma is allowed.
fn parse_list(value: &str, what: &str) -> Result<Vec<u64>, Error> {
    value
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| parse_field(s, what))
        .collect()
}

/// Exon intervals in chromosome order, straight from the block offsets.
pub fn build_exon_intervals(
    transcript: &Interval,
    block_sizes: &[u64],
    block_starts: &[u64],
) -> Result<Vec<Interval>, Error> {
    let span = transcript.size();
    block_sizes
        .iter()
        .zip(block_starts)
        .map(|(&size, &offset)| {
            let end = offset
                .checked_add(size)
                .filter(|&end| end <= span)
                .ok_or_else(|| {
                    Error::MalformedFeature(format!(
                        "block at offset {offset} of size {size} extends past {transcript}"
                    ))
                })?;
            // end <= span, so these stay within the transcript's own stop
            Interval::new(
                transcript.sequence_name(),
                transcript.start() + offset,
                transcript.start() + end,
                transcript.strand(),
            )
        })
        .collect()
}

/// The gaps between consecutive exon intervals, in chromosome order.
pub fn build_intron_intervals(exon_intervals: &[Interval]) -> Result<Vec<Interval>, Error> {
    exon_intervals
        .windows(2)
        .map(|pair| {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.start() < prev.stop() {
                return Err(Error::MalformedFeature(format!(
                    "blocks are not increasing: {prev} followed by {next}"
                )));
            }
            if next.start() == prev.stop() {
                return Err(Error::MalformedFeature(format!(
                    "zero-length intron between {prev} and {next}"
                )));
            }
            Interval::new(
                prev.sequence_name(),
                prev.stop(),
                next.start(),
                prev.strand(),
            )
        })
        .collect()
}

/// Build transcript-ordered exons from chromosome-ordered blocks.
///
/// A single fold over the blocks in 5'→3' order carries the transcript-local
/// cursor and the CDS cursor; the CDS cursor starts on the first coding block.
pub fn build_exons(
    exon_intervals: &[Interval],
    strand: Strand,
    thick_start: u64,
    thick_stop: u64,
) -> Vec<Exon> {
    let thick = (thick_start < thick_stop).then_some((thick_start, thick_stop));
    let ordered: Vec<&Interval> = if strand.is_minus() {
        exon_intervals.iter().rev().collect()
    } else {
        exon_intervals.iter().collect()
    };

    let (exons, _, _) = ordered.into_iter().fold(
        (Vec::with_capacity(exon_intervals.len()), 0u64, None),
        |(mut exons, t_pos, cds_cursor), block| {
            let (next_cursor, exon) = place_exon(cds_cursor, t_pos, block, strand, thick);
            let next_pos = exon.transcript_stop;
            exons.push(exon);
            (exons, next_pos, next_cursor)
        },
    );
    exons
}

/// One step of the exon fold: `(cursor, block) -> (next cursor, exon)`.
fn place_exon(
    cds_cursor: Option<u64>,
    t_pos: u64,
    block: &Interval,
    strand: Strand,
    thick: Option<(u64, u64)>,
) -> (Option<u64>, Exon) {
    let t_stop = t_pos + block.size();
    let mut exon = Exon {
        transcript_start: t_pos,
        transcript_stop: t_stop,
        strand,
        chrom_start: block.start(),
        chrom_stop: block.stop(),
        cds_start: None,
        cds_stop: None,
        cds_offset: None,
    };

    let Some((thick_start, thick_stop)) = thick else {
        return (cds_cursor, exon);
    };
    if thick_start >= block.stop() || thick_stop <= block.start() {
        return (cds_cursor, exon);
    }

    // On the minus strand the start codon sits at thickEnd and transcript
    // positions grow towards lower chromosome coordinates.
    let (start_codon, stop_codon) = if strand.is_minus() {
        (
            (thick_stop <= block.stop()).then(|| t_pos + (block.stop() - thick_stop)),
            (thick_start >= block.start()).then(|| t_pos + (block.stop() - thick_start)),
        )
    } else {
        (
            (thick_start >= block.start()).then(|| t_pos + (thick_start - block.start())),
            (thick_stop <= block.stop()).then(|| t_pos + (thick_stop - block.start())),
        )
    };

    let next_cursor = match (start_codon, stop_codon) {
        (Some(start), Some(stop)) => {
            exon.cds_start = Some(start);
            exon.cds_stop = Some(stop);
            stop - start
        }
        (Some(start), None) => {
            exon.cds_start = Some(start);
            t_stop - start
        }
        (None, Some(stop)) => {
            let offset = cds_cursor.unwrap_or(0);
            exon.cds_stop = Some(stop);
            exon.cds_offset = Some(offset);
            offset + (stop - t_pos)
        }
        (None, None) => {
            let offset = cds_cursor.unwrap_or(0);
            exon.cds_offset = Some(offset);
            offset + block.size()
        }
    };

    (Some(next_cursor), exon)
}
