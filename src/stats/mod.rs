//! Annotation statistics: a hierarchical count tree over label paths.
//!
//! Each transcript contributes once per distinct label path it exhibits
//! (`transcripts`) and once per raw annotation row (`transcript_annotations`).

pub mod query;
pub mod report;
pub mod tree;
pub mod xml;

pub use query::{StatCount, TagQuery, get_tag_stats};
pub use report::write_tag_report;
pub use tree::{StatNode, StatTree};
