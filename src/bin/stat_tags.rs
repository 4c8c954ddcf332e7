use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use genecheck::cli;
use genecheck::stats::{TagQuery, get_tag_stats, write_tag_report, xml};

#[derive(Parser)]
#[command(name = "stat_tags", about = "Report tag statistics from a saved stat tree")]
struct Cli {
    /// Stat tree XML written by create_stat_tree
    #[arg(short = 'x', long = "xml")]
    xml: PathBuf,

    /// Label, colon path (not_ok:noStop) or path ending in '*'
    #[arg(short = 't', long = "tag")]
    tag: String,

    /// Hide nodes whose tag annotation count is below this value
    #[arg(short = 'l', long = "tag-lower-bound", default_value_t = 0)]
    tag_lower_bound: u64,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let start = Instant::now();
    let cli_args = Cli::parse();

    cli::banner("Stat Tags");

    cli::section("Query");
    let query = TagQuery::parse(&cli_args.tag)
        .with_context(|| format!("invalid tag query: '{}'", cli_args.tag))?;
    cli::kv("Stat tree", cli_args.xml.display());
    cli::kv("Tag", &query);
    cli::kv("Lower bound", cli_args.tag_lower_bound);
    eprintln!();

    let tree = xml::read_stat_tree_file(&cli_args.xml)
        .with_context(|| format!("failed to read stat tree: {}", cli_args.xml.display()))?;
    let stats = get_tag_stats(&tree, &query);
    if stats.tag_transcript_annotations == 0 && stats.tag_transcripts == 0 {
        cli::warning(format!("no nodes match '{query}'"));
    }
    write_tag_report(io::stdout().lock(), &stats, &query, cli_args.tag_lower_bound)?;

    cli::print_summary(start);
    Ok(())
}
