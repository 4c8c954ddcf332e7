//! Per-transcript quality annotations read from details BED files.
//!
//! A details record is `chrom start stop label1/label2/.../transcriptName`.
//! The labels form a path through the stat tree; the transcript name is
//! always the last slash token.

use crate::error::Error;
use crate::interval::Interval;
use crate::strand::Strand;

/// Labels that take a dinucleotide code as their next label.
const SPLICE_LABELS: [&str; 8] = [
    "nonCanonCdsSplice",
    "nonCanonUtrSplice",
    "unknownCdsSplice",
    "unknownUtrSplice",
    "cdsUnknownSplice",
    "utrUnknownSplice",
    "cdsNonCanonSplice",
    "utrNonCanonSplice",
];

const STOP_CODONS: [&str; 3] = ["TAA", "TAG", "TGA"];

/// Labels that describe copy number rather than a defect.
const INFORMATIONAL_LABELS: [&str; 2] = ["hasOkCopies", "hasBadCopies"];

/// One annotation row: a strand-less interval, the transcript it belongs to,
/// and an ordered, duplicate-free label path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    interval: Interval,
    transcript_name: String,
    labels: Vec<String>,
}

impl Annotation {
    /// Create an annotation. Labels are de-duplicated in order and a leading
    /// two-token idiom (splice label plus dinucleotide, `orfStop` plus codon)
    /// is joined into a single label.
    pub fn new(
        interval: Interval,
        transcript_name: impl Into<String>,
        labels: Vec<String>,
    ) -> Result<Self, Error> {
        let transcript_name = transcript_name.into();
        let mut deduped: Vec<String> = Vec::with_capacity(labels.len());
        for label in labels {
            if !deduped.contains(&label) {
                deduped.push(label);
            }
        }
        if deduped.is_empty() {
            return Err(Error::MalformedFeature(format!(
                "annotation for {transcript_name} has no labels"
            )));
        }
        merge_leading_idiom(&mut deduped);
        Ok(Self {
            interval,
            transcript_name,
            labels: deduped,
        })
    }

    /// Parse one details BED line.
    pub fn from_details_line(line: &str) -> Result<Self, Error> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(Error::MalformedFeature(format!(
                "expected 4 details fields, found {}",
                fields.len()
            )));
        }
        let parse = |value: &str, what: &str| -> Result<u64, Error> {
            value
                .parse()
                .map_err(|e| Error::MalformedFeature(format!("invalid {what} '{value}': {e}")))
        };
        let start = parse(fields[1], "start")?;
        let stop = parse(fields[2], "stop")?;
        let interval = Interval::new(fields[0], start, stop, Strand::Unstranded)?;

        let mut tokens: Vec<String> = fields[3].split('/').map(str::to_string).collect();
        let transcript_name = tokens.pop().unwrap_or_default();
        if transcript_name.is_empty() {
            return Err(Error::MalformedFeature(format!(
                "missing transcript name in '{}'",
                fields[3]
            )));
        }
        tokens.retain(|t| !t.is_empty());
        Self::new(interval, transcript_name, tokens)
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
    pub fn transcript_name(&self) -> &str {
        &self.transcript_name
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Append a label unless it is already present.
    pub fn push_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.labels.contains(&label) {
            self.labels.push(label);
        }
    }

    /// The details BED line (no trailing newline).
    #[must_use]
    pub fn to_details_string(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}/{}",
            self.chromosome(),
            self.interval.start(),
            self.interval.stop(),
            self.labels.join("/"),
            self.transcript_name
        )
    }
}

fn merge_leading_idiom(labels: &mut Vec<String>) {
    if labels.len() < 2 {
        return;
    }
    let (first, second) = (labels[0].as_str(), labels[1].as_str());
    let splice_code = SPLICE_LABELS.contains(&first) && second.len() == 2;
    let orf_stop = first == "orfStop" && STOP_CODONS.contains(&second);
    if splice_code || orf_stop {
        let joined = format!("{first}_{second}");
        labels[0] = joined;
        labels.remove(1);
    }
}

/// Rewrite a label into a valid XML element name.
///
/// A leading `^` becomes a `_preexisting` suffix and `?` becomes `Q`.
#[must_use]
pub fn clean_label(label: &str) -> String {
    let label = match label.strip_prefix('^') {
        Some(rest) => format!("{rest}_preexisting"),
        None => label.to_string(),
    };
    label.replace('?', "Q")
}

/// `hasOkCopies`, `hasBadCopies`, or `count_<integer>`.
#[must_use]
pub fn is_informational_label(label: &str) -> bool {
    INFORMATIONAL_LABELS.contains(&label)
        || label
            .strip_prefix("count_")
            .is_some_and(|n| !n.is_empty() && n.parse::<u64>().is_ok())
}

/// True when a transcript carries no defect labels.
#[must_use]
pub fn is_ok(annotations: &[Annotation]) -> bool {
    annotations
        .iter()
        .flat_map(|a| a.labels.iter())
        .all(|label| is_informational_label(label))
}
