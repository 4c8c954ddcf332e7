//! Flat label category counts over a transcript store.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use crate::annotation::{Annotation, is_ok};
use crate::error::Error;
use crate::store::TranscriptStore;
use crate::transcript::Transcript;

/// The label categories one transcript falls into.
///
/// With `split`, a path `a/b/c` yields `a*`, `a_b*` and `a_b_c`; without it,
/// only `a_b_c`.
#[must_use]
pub fn annotation_label_set(annotations: &[Annotation], split: bool) -> BTreeSet<String> {
    let mut set = BTreeSet::new();
    for a in annotations {
        let labels = a.labels();
        if split {
            for i in 1..labels.len() {
                set.insert(format!("{}*", labels[..i].join("_")));
            }
        }
        set.insert(labels.join("_"));
    }
    set
}

/// Transcript totals plus the number of transcripts in each label category.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LabelCounts {
    pub total: u64,
    pub ok: u64,
    pub not_ok: u64,
    pub labels: BTreeMap<String, u64>,
}

impl LabelCounts {
    fn fraction(&self, count: u64) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64
        }
    }

    /// Categories by descending count, ties in name order.
    #[must_use]
    pub fn ordered_labels(&self) -> Vec<(&str, u64)> {
        let mut ordered: Vec<(&str, u64)> =
            self.labels.iter().map(|(k, &v)| (k.as_str(), v)).collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1));
        ordered
    }

    pub fn write_report<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let header = [("total", self.total), ("ok", self.ok), ("not ok", self.not_ok)];
        let rows: Vec<(&str, u64)> = header.into_iter().chain(self.ordered_labels()).collect();
        let name_width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0) + 1;
        let count_width = rows
            .iter()
            .map(|(_, count)| count.to_string().len())
            .max()
            .unwrap_or(1);
        for (name, count) in rows {
            writeln!(
                writer,
                "{name:>name_width$} {count:>count_width$} ({:.3})",
                self.fraction(count)
            )?;
        }
        Ok(())
    }
}

/// Count transcripts per label category. Transcripts that are ok contribute
/// only to `total` and `ok`.
#[must_use]
pub fn count_labels(store: &TranscriptStore, split: bool) -> LabelCounts {
    let mut counts = LabelCounts::default();
    for t in store {
        counts.total += 1;
        if is_ok(t.annotations()) {
            counts.ok += 1;
            continue;
        }
        counts.not_ok += 1;
        for label in annotation_label_set(t.annotations(), split) {
            *counts.labels.entry(label).or_insert(0) += 1;
        }
    }
    counts
}

/// Annotated transcripts whose label set contains any of `labels`.
#[must_use]
pub fn transcripts_with_labels<'a>(
    store: &'a TranscriptStore,
    labels: &[String],
    split: bool,
) -> Vec<&'a Transcript> {
    store
        .iter()
        .filter(|t| !t.annotations().is_empty())
        .filter(|t| {
            let set = annotation_label_set(t.annotations(), split);
            labels.iter().any(|l| set.contains(l))
        })
        .collect()
}

/// One line per transcript: name, chromosome, span, strand and label paths.
pub fn write_transcript_list<W: Write>(
    mut writer: W,
    transcripts: &[&Transcript],
) -> Result<(), Error> {
    for t in transcripts {
        let paths: Vec<String> = t
            .annotations()
            .iter()
            .map(|a| format!("[{}]", a.labels().join(", ")))
            .collect();
        writeln!(
            writer,
            "{} {} {} {} {} {}",
            t.name(),
            t.chromosome(),
            t.interval().start(),
            t.interval().stop(),
            t.strand(),
            paths.join(", ")
        )?;
    }
    Ok(())
}
