//! Tag queries over a stat tree.
//!
//! A query is converted into a parallel count tree, pruned, and its tag
//! counters rolled up from the leaves. The canonical tree is never touched.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

use super::tree::{ROOT, StatNode, StatTree};

/// What a query selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagQuery {
    /// A node name matched at any depth.
    Label(String),
    /// An exact colon path below the root; a final `*` keeps the whole subtree.
    Path(Vec<String>),
}

impl TagQuery {
    /// Parse `label`, `a:b:c`, `stats:a:b` or `a:*`.
    pub fn parse(query: &str) -> Result<Self, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::Parse("empty tag query".to_string()));
        }
        if !query.contains(':') && query != "*" {
            return Ok(Self::Label(query.to_string()));
        }
        let mut segments: Vec<String> = query.split(':').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(Error::Parse(format!("empty segment in tag query '{query}'")));
        }
        if segments.len() > 1 && segments[0] == ROOT {
            segments.remove(0);
        }
        Ok(Self::Path(segments))
    }

    /// The node name whose counters are collected.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Label(label) => label,
            Self::Path(segments) => segments.last().map_or("*", String::as_str),
        }
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.target() == "*"
    }

    fn matches(&self, name: &str) -> bool {
        let target = self.target();
        target == "*" || target == name
    }
}

impl FromStr for TagQuery {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TagQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => write!(f, "{label}"),
            Self::Path(segments) => write!(f, "{}", segments.join(":")),
        }
    }
}

/// A node of the query-time copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCount {
    pub node_name: String,
    pub node_transcripts: u64,
    pub node_transcript_annotations: u64,
    pub tag_transcripts: u64,
    pub tag_transcript_annotations: u64,
    /// The node's own name matched the query.
    pub is_tag: bool,
    pub children: Vec<StatCount>,
}

impl StatCount {
    fn from_node(node: &StatNode, query: &TagQuery, is_root: bool) -> Self {
        let children: Vec<StatCount> = node
            .children()
            .iter()
            .map(|c| Self::from_node(c, query, false))
            .collect();
        let (node_transcripts, node_transcript_annotations) = if is_root {
            children.iter().fold((0, 0), |(t, ta), c| {
                (t + c.node_transcripts, ta + c.node_transcript_annotations)
            })
        } else {
            (node.transcripts(), node.transcript_annotations())
        };
        // The root only matches when asked for by name, never through `*`.
        let is_tag = if is_root {
            matches!(query, TagQuery::Label(label) if label == ROOT)
        } else {
            query.matches(node.name())
        };
        let (tag_transcripts, tag_transcript_annotations) = if is_tag {
            (node_transcripts, node_transcript_annotations)
        } else {
            (0, 0)
        };
        Self {
            node_name: node.name().to_string(),
            node_transcripts,
            node_transcript_annotations,
            tag_transcripts,
            tag_transcript_annotations,
            is_tag,
            children,
        }
    }

    /// True when this node or any descendant is named `tag`.
    #[must_use]
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.node_name == tag || self.children.iter().any(|c| c.contains_tag(tag))
    }

    /// Keep only the branches leading to `tag`; nothing below a match survives.
    fn prune_to_tag(&mut self, tag: &str) {
        if self.node_name == tag {
            self.children.clear();
            return;
        }
        self.children.retain(|c| c.contains_tag(tag));
        for c in &mut self.children {
            c.prune_to_tag(tag);
        }
    }

    fn select_path(&mut self, segments: &[String]) {
        let Some((first, rest)) = segments.split_first() else {
            return;
        };
        let wildcard = first == "*";
        self.children.retain(|c| wildcard || c.node_name == *first);
        for c in &mut self.children {
            if rest.is_empty() {
                if !wildcard {
                    c.children.clear();
                }
            } else {
                c.select_path(rest);
            }
        }
    }

    /// Post-order roll-up of tag counters.
    ///
    /// A matching node keeps its own counters, which already cover its
    /// descendants.
    fn roll_up(&mut self) -> (u64, u64) {
        let (t, ta) = self
            .children
            .iter_mut()
            .map(StatCount::roll_up)
            .fold((0, 0), |(t, ta), (ct, cta)| (t + ct, ta + cta));
        if !self.is_tag {
            self.tag_transcripts += t;
            self.tag_transcript_annotations += ta;
        }
        (self.tag_transcripts, self.tag_transcript_annotations)
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&StatCount> {
        self.children.iter().find(|c| c.node_name == name)
    }
}

/// Run a query against a tree, returning the pruned and rolled-up copy.
#[must_use]
pub fn get_tag_stats(tree: &StatTree, query: &TagQuery) -> StatCount {
    let mut stats = StatCount::from_node(tree.root(), query, true);
    match query {
        TagQuery::Label(tag) => stats.prune_to_tag(tag),
        TagQuery::Path(segments) => stats.select_path(segments),
    }
    stats.roll_up();
    stats
}
