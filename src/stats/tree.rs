//! The canonical stat tree and its two-pass build.

use crate::annotation::{Annotation, clean_label, is_ok};
use crate::error::Error;
use crate::store::TranscriptStore;

pub const ROOT: &str = "stats";
pub const OK: &str = "ok";
pub const NOT_OK: &str = "not_ok";

/// One label-path segment with its two counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatNode {
    name: String,
    /// Distinct transcripts that reached this node.
    transcripts: u64,
    /// Raw annotation rows that passed through this node.
    transcript_annotations: u64,
    children: Vec<StatNode>,
}

impl StatNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_counts(name, 0, 0)
    }

    pub fn with_counts(name: impl Into<String>, transcripts: u64, transcript_annotations: u64) -> Self {
        Self {
            name: name.into(),
            transcripts,
            transcript_annotations,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn transcripts(&self) -> u64 {
        self.transcripts
    }

    #[must_use]
    pub fn transcript_annotations(&self) -> u64 {
        self.transcript_annotations
    }

    #[must_use]
    pub fn children(&self) -> &[StatNode] {
        &self.children
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&StatNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut StatNode> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    pub(crate) fn push_child(&mut self, child: StatNode) {
        self.children.push(child);
    }

    /// Children are appended in first-seen order.
    fn child_or_insert(&mut self, name: &str) -> &mut StatNode {
        let idx = match self.children.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.children.push(StatNode::new(name));
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }

    fn merge(&mut self, other: &StatNode) {
        self.transcripts += other.transcripts;
        self.transcript_annotations += other.transcript_annotations;
        for child in &other.children {
            self.child_or_insert(&child.name).merge(child);
        }
    }
}

/// Unique cleaned label paths for one transcript, in first-seen order.
#[derive(Debug, Default)]
struct LabelTrie {
    children: Vec<(String, LabelTrie)>,
}

impl LabelTrie {
    fn from_annotations(annotations: &[Annotation]) -> Self {
        let mut root = Self::default();
        for a in annotations {
            let mut pos = &mut root;
            for label in a.labels() {
                pos = pos.child_or_insert(clean_label(label));
            }
        }
        root
    }

    fn child_or_insert(&mut self, label: String) -> &mut LabelTrie {
        let idx = match self.children.iter().position(|(l, _)| *l == label) {
            Some(idx) => idx,
            None => {
                self.children.push((label, Self::default()));
                self.children.len() - 1
            }
        };
        &mut self.children[idx].1
    }

    /// Add one transcript to every node on every unique path.
    fn add_transcript(&self, node: &mut StatNode) {
        for (label, sub) in &self.children {
            let child = node.child_or_insert(label);
            child.transcripts += 1;
            sub.add_transcript(child);
        }
    }
}

/// The canonical tree: a `stats` root with `ok` and `not_ok` beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatTree {
    root: StatNode,
}

impl Default for StatTree {
    fn default() -> Self {
        Self::new()
    }
}

impl StatTree {
    #[must_use]
    pub fn new() -> Self {
        let mut root = StatNode::new(ROOT);
        root.push_child(StatNode::new(OK));
        root.push_child(StatNode::new(NOT_OK));
        Self { root }
    }

    /// Wrap a root read from storage.
    ///
    /// The root must be `stats` and hold `ok` and `not_ok`; they are moved to
    /// the front in that order. Other top-level nodes are kept after them.
    pub(crate) fn from_root(mut root: StatNode) -> Result<Self, Error> {
        if root.name != ROOT {
            return Err(Error::Format(format!(
                "stat tree root is <{}>, expected <{ROOT}>",
                root.name
            )));
        }
        let mut ordered = Vec::with_capacity(root.children.len());
        for top in [OK, NOT_OK] {
            let idx = root
                .children
                .iter()
                .position(|c| c.name == top)
                .ok_or_else(|| Error::Format(format!("stat tree has no <{top}> node")))?;
            ordered.push(root.children.remove(idx));
        }
        ordered.append(&mut root.children);
        root.children = ordered;
        Ok(Self { root })
    }

    /// Build a tree over every transcript in the store.
    pub fn build(store: &TranscriptStore) -> Result<Self, Error> {
        let mut tree = Self::new();
        for t in store {
            tree.record(t.annotations())?;
        }
        log::debug!(
            "stat tree built from {} transcripts ({} ok, {} not ok)",
            store.len(),
            tree.ok().transcripts(),
            tree.not_ok().transcripts()
        );
        Ok(tree)
    }

    #[must_use]
    pub fn root(&self) -> &StatNode {
        &self.root
    }

    #[must_use]
    pub fn ok(&self) -> &StatNode {
        &self.root.children[0]
    }

    #[must_use]
    pub fn not_ok(&self) -> &StatNode {
        &self.root.children[1]
    }

    /// Count one transcript given its annotations.
    pub fn record(&mut self, annotations: &[Annotation]) -> Result<(), Error> {
        let top_name = if is_ok(annotations) { OK } else { NOT_OK };
        let top = self
            .root
            .child_mut(top_name)
            .ok_or_else(|| Error::UnanticipatedLabel {
                parent: ROOT.to_string(),
                label: top_name.to_string(),
            })?;
        top.transcripts += 1;

        LabelTrie::from_annotations(annotations).add_transcript(top);

        for a in annotations {
            top.transcript_annotations += 1;
            let mut node = &mut *top;
            for label in a.labels() {
                let label = clean_label(label);
                let parent = node.name.clone();
                node = match node.child_mut(&label) {
                    Some(child) => child,
                    None => return Err(Error::UnanticipatedLabel { parent, label }),
                };
                node.transcript_annotations += 1;
            }
        }
        Ok(())
    }

    /// Add another tree's counters into this one, node by node.
    pub fn merge(&mut self, other: &StatTree) {
        self.root.merge(&other.root);
    }

    /// The node at a label path below the root, e.g. `["not_ok", "noStop"]`.
    #[must_use]
    pub fn find(&self, path: &[&str]) -> Option<&StatNode> {
        path.iter()
            .try_fold(&self.root, |node, segment| node.child(segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;
    use crate::strand::Strand;

    fn annotation(labels: &[&str]) -> Annotation {
        let interval = Interval::new("chr1", 10, 20, Strand::Unstranded).unwrap();
        Annotation::new(
            interval,
            "tx1",
            labels.iter().map(ToString::to_string).collect(),
        )
        .unwrap()
    }

    #[test]
    fn new_tree_has_ok_and_not_ok() {
        let tree = StatTree::new();
        assert_eq!(tree.root().name(), "stats");
        let names: Vec<&str> = tree.root().children().iter().map(StatNode::name).collect();
        assert_eq!(names, ["ok", "not_ok"]);
    }

    #[test]
    fn duplicate_annotations_count_one_transcript() {
        let mut tree = StatTree::new();
        let a = annotation(&["noStop", "alignmentPartialMap"]);
        tree.record(&[a.clone(), a.clone(), a]).unwrap();

        let leaf = tree.find(&["not_ok", "noStop", "alignmentPartialMap"]).unwrap();
        assert_eq!(leaf.transcripts(), 1);
        assert_eq!(leaf.transcript_annotations(), 3);

        let no_stop = tree.find(&["not_ok", "noStop"]).unwrap();
        assert_eq!(no_stop.transcripts(), 1);
        assert_eq!(no_stop.transcript_annotations(), 3);

        assert_eq!(tree.not_ok().transcripts(), 1);
        assert_eq!(tree.not_ok().transcript_annotations(), 3);
        assert_eq!(tree.ok().transcripts(), 0);
    }

    #[test]
    fn shared_prefix_counts_once() {
        let mut tree = StatTree::new();
        tree.record(&[
            annotation(&["cdsGap", "frameshift"]),
            annotation(&["cdsGap", "inFrame"]),
        ])
        .unwrap();
        let gap = tree.find(&["not_ok", "cdsGap"]).unwrap();
        assert_eq!(gap.transcripts(), 1);
        assert_eq!(gap.transcript_annotations(), 2);
        assert_eq!(gap.children().len(), 2);
    }

    #[test]
    fn ok_transcripts() {
        let mut tree = StatTree::new();
        tree.record(&[]).unwrap();
        tree.record(&[annotation(&["hasOkCopies", "count_2"])]).unwrap();
        assert_eq!(tree.ok().transcripts(), 2);
        assert_eq!(tree.ok().transcript_annotations(), 1);
        let count = tree.find(&["ok", "hasOkCopies", "count_2"]).unwrap();
        assert_eq!(count.transcripts(), 1);
        assert_eq!(tree.not_ok().transcripts(), 0);
    }

    #[test]
    fn children_keep_first_seen_order() {
        let mut tree = StatTree::new();
        tree.record(&[
            annotation(&["noStop", "alignmentPartialMap"]),
            annotation(&["cdsGap"]),
            annotation(&["badFrame"]),
        ])
        .unwrap();
        tree.record(&[annotation(&["alignmentGap"])]).unwrap();
        let names: Vec<&str> = tree.not_ok().children().iter().map(StatNode::name).collect();
        assert_eq!(names, ["noStop", "cdsGap", "badFrame", "alignmentGap"]);
    }

    #[test]
    fn labels_are_cleaned() {
        let mut tree = StatTree::new();
        tree.record(&[annotation(&["^cdsGap", "what?"])]).unwrap();
        assert!(tree.find(&["not_ok", "cdsGap_preexisting", "whatQ"]).is_some());
    }

    #[test]
    fn merge_adds_counters() {
        let mut a = StatTree::new();
        a.record(&[annotation(&["noStop"])]).unwrap();
        let mut b = StatTree::new();
        b.record(&[annotation(&["noStop"])]).unwrap();
        b.record(&[annotation(&["cdsGap"])]).unwrap();
        b.record(&[]).unwrap();

        a.merge(&b);
        assert_eq!(a.find(&["not_ok", "noStop"]).unwrap().transcripts(), 2);
        assert_eq!(a.find(&["not_ok", "cdsGap"]).unwrap().transcripts(), 1);
        assert_eq!(a.not_ok().transcripts(), 3);
        assert_eq!(a.ok().transcripts(), 1);
    }

    #[test]
    fn find_missing_path() {
        let tree = StatTree::new();
        assert!(tree.find(&["not_ok", "noStop"]).is_none());
        assert_eq!(tree.find(&[]).unwrap().name(), "stats");
    }
}
