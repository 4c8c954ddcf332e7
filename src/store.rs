//! Loading transcripts and their annotations from a BED12 / details BED pair.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::annotation::Annotation;
use crate::error::Error;
use crate::strand::Strand;
use crate::transcript::Transcript;

/// Lookup key joining transcripts to annotations: `(transcript name, chromosome)`.
pub type TranscriptKey = (String, String);

/// Transcripts sorted by `(interval, name)`, each carrying its annotations.
#[derive(Debug, Default)]
pub struct TranscriptStore {
    transcripts: Vec<Transcript>,
}

impl TranscriptStore {
    /// Parse a transcript BED12 stream and a details BED stream, then join them.
    pub fn from_readers<B: BufRead, D: BufRead>(bed: B, details: D) -> Result<Self, Error> {
        let mut annotations = read_annotations(details)?;
        let mut transcripts = read_transcripts(bed)?;

        let mut strands: HashMap<TranscriptKey, Strand> = HashMap::new();
        for t in &transcripts {
            let key = (t.name().to_string(), t.chromosome().to_string());
            match strands.get(&key) {
                Some(&strand) if strand != t.strand() => {
                    return Err(Error::DuplicateStrandMismatch {
                        name: key.0,
                        chromosome: key.1,
                    });
                }
                Some(_) => log::warn!(
                    "transcript {} on {} appears more than once",
                    key.0,
                    key.1
                ),
                None => {
                    strands.insert(key, t.strand());
                }
            }
        }

        for t in &mut transcripts {
            let key = (t.name().to_string(), t.chromosome().to_string());
            if let Some(list) = annotations.get(&key) {
                t.set_annotations(list.clone());
            }
        }
        annotations.retain(|key, _| !strands.contains_key(key));
        for (name, chromosome) in annotations.keys() {
            log::warn!("annotations for {name} on {chromosome} match no transcript");
        }

        Ok(Self::from_transcripts(transcripts))
    }

    /// Open both files; `.gz` paths are decompressed.
    pub fn from_paths(bed: &Path, details: &Path) -> Result<Self, Error> {
        let store = Self::from_readers(open_text(bed)?, open_text(details)?)?;
        log::info!(
            "loaded {} transcripts from {}",
            store.len(),
            bed.display()
        );
        Ok(store)
    }

    #[must_use]
    pub fn from_transcripts(mut transcripts: Vec<Transcript>) -> Self {
        transcripts.sort_by(|a, b| {
            a.interval()
                .cmp(b.interval())
                .then_with(|| a.name().cmp(b.name()))
        });
        Self { transcripts }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transcript> {
        self.transcripts.iter()
    }

    #[must_use]
    pub fn transcripts(&self) -> &[Transcript] {
        &self.transcripts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    /// First transcript with this name on this chromosome.
    #[must_use]
    pub fn get(&self, name: &str, chromosome: &str) -> Option<&Transcript> {
        self.transcripts
            .iter()
            .find(|t| t.name() == name && t.chromosome() == chromosome)
    }

    pub fn write_transcript_bed<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        for t in &self.transcripts {
            writeln!(writer, "{}", t.to_bed_string())?;
        }
        Ok(())
    }

    /// Write every annotation, sorted by interval.
    ///
    /// Duplicate transcript keys share one annotation list, which is written once.
    pub fn write_details_bed<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut all: Vec<&Annotation> = self
            .transcripts
            .iter()
            .filter(|t| seen.insert((t.name(), t.chromosome())))
            .flat_map(|t| t.annotations().iter())
            .collect();
        all.sort_by(|a, b| {
            a.interval()
                .cmp(b.interval())
                .then_with(|| a.transcript_name().cmp(b.transcript_name()))
        });
        for a in all {
            writeln!(writer, "{}", a.to_details_string())?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TranscriptStore {
    type Item = &'a Transcript;
    type IntoIter = std::slice::Iter<'a, Transcript>;

    fn into_iter(self) -> Self::IntoIter {
        self.transcripts.iter()
    }
}

fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse a BED12 stream. Blank lines and `#` comments are skipped.
pub fn read_transcripts<R: BufRead>(reader: R) -> Result<Vec<Transcript>, Error> {
    let mut transcripts = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if is_skippable(&line) {
            continue;
        }
        let t = Transcript::from_bed_line(&line).map_err(|e| e.at_line(line_num + 1, &line))?;
        transcripts.push(t);
    }
    log::debug!("parsed {} transcript records", transcripts.len());
    Ok(transcripts)
}

/// Parse a details BED stream into annotation lists keyed by `(name, chromosome)`.
pub fn read_annotations<R: BufRead>(
    reader: R,
) -> Result<HashMap<TranscriptKey, Vec<Annotation>>, Error> {
    let mut map: HashMap<TranscriptKey, Vec<Annotation>> = HashMap::new();
    let mut count = 0usize;
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if is_skippable(&line) {
            continue;
        }
        let a =
            Annotation::from_details_line(&line).map_err(|e| e.at_line(line_num + 1, &line))?;
        let key = (a.transcript_name().to_string(), a.chromosome().to_string());
        map.entry(key).or_default().push(a);
        count += 1;
    }
    log::debug!("parsed {count} annotation records for {} transcripts", map.len());
    Ok(map)
}

fn open_text(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let file = File::open(path)?;
    Ok(if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    })
}
