//! Parser for FASTA sequence files.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::Error;

/// One FASTA entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub name: String,
    /// Header words after the name.
    pub comment: Vec<String>,
    /// Uppercased bases.
    pub sequence: Vec<u8>,
}

/// Reads gzip-compressed FASTA.
pub fn parse_fasta_gz<R: Read>(reader: R) -> Result<Vec<FastaRecord>, Error> {
    let decoder = GzDecoder::new(reader);
    parse_fasta(BufReader::new(decoder))
}

/// Reads FASTA from a buffered reader.
///
/// Lines before the first header are ignored.
pub fn parse_fasta<R: BufRead>(reader: R) -> Result<Vec<FastaRecord>, Error> {
    let mut results = Vec::new();
    let mut current: Option<FastaRecord> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                results.push(record);
            }
            current = Some(parse_header(header).map_err(|e| e.at_line(idx + 1, &line))?);
        } else if let Some(record) = current.as_mut() {
            let start = record.sequence.len();
            record.sequence.extend_from_slice(line.trim().as_bytes());
            record.sequence[start..].make_ascii_uppercase();
        }
    }

    if let Some(record) = current {
        results.push(record);
    }
    Ok(results)
}

/// Reads a FASTA file, decompressing when the path ends in `.gz`.
pub fn read_fasta_file(path: &Path) -> Result<Vec<FastaRecord>, Error> {
    let file = File::open(path)?;
    let records = if path.extension().is_some_and(|ext| ext == "gz") {
        parse_fasta_gz(file)?
    } else {
        parse_fasta(BufReader::new(file))?
    };
    log::debug!("read {} FASTA records from {}", records.len(), path.display());
    Ok(records)
}

fn parse_header(header: &str) -> Result<FastaRecord, Error> {
    let mut tokens = header.split_whitespace();
    let name = tokens
        .next()
        .ok_or_else(|| Error::Parse("empty FASTA header".to_string()))?;
    Ok(FastaRecord {
        name: name.to_string(),
        comment: tokens.map(str::to_string).collect(),
        sequence: Vec::new(),
    })
}
