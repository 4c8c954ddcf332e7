//! Indented text report of a tag query.

use std::io::Write;

use crate::error::Error;

use super::query::{StatCount, TagQuery};

/// Tags counted per transcript rather than per annotation row.
const TRANSCRIPT_LEVEL_TAGS: [&str; 5] = ["stats", "hasOkCopies", "hasBadCopies", "ok", "not_ok"];

const TITLE_WIDTH: usize = 40;

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// Write the report for `stats`, showing nodes whose tag annotation count is
/// at least `lower_bound`. Children are listed by descending transcript count.
pub fn write_tag_report<W: Write>(
    mut writer: W,
    stats: &StatCount,
    query: &TagQuery,
    lower_bound: u64,
) -> Result<(), Error> {
    let tag = query.to_string();
    let transcript_level = TRANSCRIPT_LEVEL_TAGS.contains(&tag.as_str());
    let tag_header = if transcript_level {
        "Trans. Tags"
    } else {
        "Annot. Tags"
    };
    writeln!(
        writer,
        "{:>40} {:>7}  {:>7}  {:>15}",
        "tree", "Tran.s", "Annot.s", tag_header
    )?;

    let style = if transcript_level {
        CountStyle::Transcripts
    } else if query.is_wildcard() {
        CountStyle::RawAnnotations
    } else {
        CountStyle::Annotations
    };
    write_node(&mut writer, stats, 0, style, lower_bound)
}

#[derive(Clone, Copy)]
enum CountStyle {
    Transcripts,
    RawAnnotations,
    Annotations,
}

fn write_node<W: Write>(
    writer: &mut W,
    node: &StatCount,
    level: usize,
    style: CountStyle,
    lower_bound: u64,
) -> Result<(), Error> {
    if node.tag_transcript_annotations >= lower_bound {
        let count = match style {
            CountStyle::Transcripts => format!(
                "{:6} ({:6.2}%)",
                node.tag_transcripts,
                percent(node.tag_transcripts, node.node_transcripts)
            ),
            CountStyle::RawAnnotations => format!("{:16}", node.tag_transcript_annotations),
            CountStyle::Annotations => format!(
                "{:6} ({:6.2}%)",
                node.tag_transcript_annotations,
                percent(
                    node.tag_transcript_annotations,
                    node.node_transcript_annotations
                )
            ),
        };
        let title = format!("{}{}", "| ".repeat(level), node.node_name);
        let dots = ".".repeat(TITLE_WIDTH.saturating_sub(title.len()));
        writeln!(
            writer,
            "{title}{dots}{:7}, {:7}, {count}",
            node.node_transcripts, node.node_transcript_annotations
        )?;
    }

    let mut children: Vec<&StatCount> = node.children.iter().collect();
    children.sort_by(|a, b| b.node_transcripts.cmp(&a.node_transcripts));
    for child in children {
        write_node(writer, child, level + 1, style, lower_bound)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Annotation;
    use crate::interval::Interval;
    use crate::stats::query::get_tag_stats;
    use crate::stats::tree::StatTree;
    use crate::strand::Strand;

    fn annotation(labels: &[&str]) -> Annotation {
        let interval = Interval::new("chr1", 10, 20, Strand::Unstranded).unwrap();
        Annotation::new(
            interval,
            "tx",
            labels.iter().map(ToString::to_string).collect(),
        )
        .unwrap()
    }

    fn report(tree: &StatTree, query: &str, lower_bound: u64) -> String {
        let query = TagQuery::parse(query).unwrap();
        let stats = get_tag_stats(tree, &query);
        let mut out = Vec::new();
        write_tag_report(&mut out, &stats, &query, lower_bound).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample_tree() -> StatTree {
        let mut tree = StatTree::new();
        tree.record(&[annotation(&["noStop"])]).unwrap();
        for _ in 0..3 {
            tree.record(&[annotation(&["cdsGap"]), annotation(&["cdsGap"])])
                .unwrap();
        }
        tree.record(&[]).unwrap();
        tree
    }

    #[test]
    fn annotation_tag_report() {
        let text = report(&sample_tree(), "cdsGap", 0);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].trim_start().starts_with("tree"));
        assert!(lines[0].ends_with("Annot. Tags"));
        assert_eq!(
            lines[1],
            format!("stats{}      5,       7,      6 ( 85.71%)", ".".repeat(35))
        );
        assert!(lines[2].starts_with("| not_ok...."));
        assert!(lines[3].starts_with("| | cdsGap...."));
        assert!(lines[3].ends_with("3,       6,      6 (100.00%)"));
    }

    #[test]
    fn transcript_level_report_uses_transcript_counts() {
        let text = report(&sample_tree(), "not_ok", 0);
        assert!(text.lines().next().unwrap().ends_with("Trans. Tags"));
        let not_ok = text.lines().find(|l| l.starts_with("| not_ok")).unwrap();
        assert!(not_ok.ends_with("4,       7,      4 (100.00%)"));
    }

    #[test]
    fn lower_bound_hides_small_counts() {
        let tree = sample_tree();
        let text = report(&tree, "not_ok:*", 2);
        assert!(text.contains("cdsGap"));
        assert!(!text.contains("noStop"));
    }

    #[test]
    fn children_sorted_by_transcripts() {
        let text = report(&sample_tree(), "not_ok:*", 0);
        let gap = text.find("cdsGap").unwrap();
        let stop = text.find("noStop").unwrap();
        assert!(gap < stop);
    }
}
