//! JSON configuration for building a stat tree.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::stats::TagQuery;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsConfig {
    /// Transcript BED12 file.
    pub transcripts: PathBuf,
    /// Details BED file with the annotation rows.
    pub details: PathBuf,
    /// Where to write the stat tree XML.
    pub out: Option<PathBuf>,
    /// Query to report after building.
    pub tag_stats: Option<String>,
    #[serde(default)]
    pub tag_lower_bound: u64,
}

impl StatsConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, path) in [("transcripts", &self.transcripts), ("details", &self.details)] {
            if path.as_os_str().is_empty() {
                bail!("'{name}' must name a file");
            }
        }
        if let Some(query) = &self.tag_stats {
            TagQuery::parse(query).with_context(|| format!("invalid tagStats query: '{query}'"))?;
        }
        Ok(())
    }

    /// The parsed query, if one was configured.
    pub fn tag_query(&self) -> Result<Option<TagQuery>> {
        self.tag_stats
            .as_deref()
            .map(TagQuery::parse)
            .transpose()
            .context("invalid tagStats query")
    }
}
