//! Error types for the genecheck library.

use thiserror::Error;

/// Errors that can occur during genecheck operations.
///
/// A coordinate falling outside a conversion's domain is not an error; those
/// functions return `None`.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A parse error occurred while reading input data.
    #[error("{0}")]
    Parse(String),

    /// A file format error was detected.
    #[error("{0}")]
    Format(String),

    /// A structurally invalid BED record (field count, block layout, intron length).
    #[error("malformed feature: {0}")]
    MalformedFeature(String),

    /// A feature extends past the end of the sequence it was sliced from.
    #[error("feature on {name} ends at {stop} but the sequence is only {length} bases long")]
    OutOfBounds {
        name: String,
        stop: u64,
        length: u64,
    },

    /// The sequence handed to a transcript is not its chromosome.
    #[error("sequence name mismatch: expected {expected}, found {found}")]
    NameMismatch { expected: String, found: String },

    /// No sequence with this name was loaded.
    #[error("no sequence named {0}")]
    MissingSequence(String),

    /// The stat tree walk reached a label that flattening never created.
    #[error("unanticipated label discovered {parent}:{label}")]
    UnanticipatedLabel { parent: String, label: String },

    /// The same transcript key was seen on both strands.
    #[error("transcript {name} on {chromosome} appears with conflicting strands")]
    DuplicateStrandMismatch { name: String, chromosome: String },

    /// The stat tree XML could not be read.
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
}

impl Error {
    /// Attach a 1-based line number and the offending line to message-bearing errors.
    #[must_use]
    pub fn at_line(self, line_num: usize, line: &str) -> Self {
        match self {
            Self::MalformedFeature(msg) => {
                Self::MalformedFeature(format!("{msg} (line {line_num}: {line})"))
            }
            Self::Parse(msg) => Self::Parse(format!("{msg} (line {line_num}: {line})")),
            other => other,
        }
    }
}
