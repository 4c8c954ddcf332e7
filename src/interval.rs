//! Half-open genomic intervals.

use std::fmt;

use crate::error::Error;
use crate::strand::Strand;

/// An immutable half-open range `[start, stop)` on a named sequence.
///
/// Field order matches the ordering used to sort transcripts and annotations:
/// sequence name, start, stop, strand.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    sequence_name: String,
    start: u64,
    stop: u64,
    strand: Strand,
}

impl Interval {
    /// Create an interval. Fails unless `start < stop`.
    pub fn new(
        sequence_name: impl Into<String>,
        start: u64,
        stop: u64,
        strand: Strand,
    ) -> Result<Self, Error> {
        let sequence_name = sequence_name.into();
        if start >= stop {
            return Err(Error::MalformedFeature(format!(
                "empty or inverted interval {sequence_name}:{start}-{stop}"
            )));
        }
        Ok(Self {
            sequence_name,
            start,
            stop,
            strand,
        })
    }

    #[must_use]
    pub fn sequence_name(&self) -> &str {
        &self.sequence_name
    }

    #[must_use]
    pub fn start(&self) -> u64 {
        self.start
    }

    #[must_use]
    pub fn stop(&self) -> u64 {
        self.stop
    }

    #[must_use]
    pub fn strand(&self) -> Strand {
        self.strand
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.stop - self.start
    }

    /// True when `other` is on the same sequence and fully nested in `self`.
    /// Partial overlap is not containment.
    #[must_use]
    pub fn contains(&self, other: &Interval) -> bool {
        self.sequence_name == other.sequence_name
            && self.start <= other.start
            && self.stop >= other.stop
    }

    /// True when the two intervals share at least one base on the same sequence.
    #[must_use]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.sequence_name == other.sequence_name
            && self.start < other.stop
            && other.start < self.stop
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}({})",
            self.sequence_name, self.start, self.stop, self.strand
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(name: &str, start: u64, stop: u64) -> Interval {
        Interval::new(name, start, stop, Strand::Plus).unwrap()
    }

    #[test]
    fn rejects_empty_interval() {
        assert!(Interval::new("chr1", 10, 10, Strand::Plus).is_err());
        assert!(Interval::new("chr1", 11, 10, Strand::Plus).is_err());
    }

    #[test]
    fn size() {
        assert_eq!(iv("chr1", 100, 150).size(), 50);
    }

    #[test]
    fn containment() {
        let outer = iv("chr1", 100, 200);
        assert!(outer.contains(&iv("chr1", 100, 200)));
        assert!(outer.contains(&iv("chr1", 120, 180)));
        // partial overlaps
        assert!(!outer.contains(&iv("chr1", 50, 150)));
        assert!(!outer.contains(&iv("chr1", 150, 250)));
        // disjoint and other sequence
        assert!(!outer.contains(&iv("chr1", 200, 300)));
        assert!(!outer.contains(&iv("chr2", 120, 180)));
    }

    #[test]
    fn overlap() {
        let a = iv("chr1", 100, 200);
        assert!(a.overlaps(&iv("chr1", 199, 300)));
        assert!(!a.overlaps(&iv("chr1", 200, 300)));
        assert!(!a.overlaps(&iv("chr2", 150, 160)));
    }

    #[test]
    fn ordering_is_name_start_stop_strand() {
        let mut v = vec![
            iv("chr2", 0, 10),
            iv("chr1", 5, 10),
            Interval::new("chr1", 5, 10, Strand::Minus).unwrap(),
            iv("chr1", 5, 8),
            iv("chr1", 0, 50),
        ];
        v.sort();
        let rendered: Vec<String> = v.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            [
                "chr1:0-50(+)",
                "chr1:5-8(+)",
                "chr1:5-10(+)",
                "chr1:5-10(-)",
                "chr2:0-10(+)"
            ]
        );
    }
}
