use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use genecheck::cli;
use genecheck::config::StatsConfig;
use genecheck::stats::{StatTree, get_tag_stats, write_tag_report, xml};
use genecheck::store::TranscriptStore;

#[derive(Parser)]
#[command(
    name = "create_stat_tree",
    about = "Build an annotation stat tree from genecheck BED files"
)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: PathBuf,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let start = Instant::now();
    let cli_args = Cli::parse();

    cli::banner("Create Stat Tree");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let config = StatsConfig::from_file(&cli_args.config)?;
    let query = config.tag_query()?;

    cli::kv("Config", cli_args.config.display());
    cli::kv("Transcripts", config.transcripts.display());
    cli::kv("Details", config.details.display());
    if let Some(out) = &config.out {
        cli::kv("Output", out.display());
    }
    if let Some(query) = &query {
        cli::kv("Tag", query);
        cli::kv("Lower bound", config.tag_lower_bound);
    }

    eprintln!();

    // ── Load ─────────────────────────────────────────────
    cli::section("Load");

    let store = TranscriptStore::from_paths(&config.transcripts, &config.details)
        .with_context(|| {
            format!(
                "failed to load {} and {}",
                config.transcripts.display(),
                config.details.display()
            )
        })?;
    let annotated = store.iter().filter(|t| !t.annotations().is_empty()).count();
    cli::kv("Transcripts", store.len());
    cli::kv("Annotated", annotated);

    eprintln!();

    // ── Build ────────────────────────────────────────────
    cli::section("Stat Tree");

    let tree = StatTree::build(&store)?;
    cli::kv("ok", tree.ok().transcripts());
    cli::kv("not_ok", tree.not_ok().transcripts());

    match &config.out {
        Some(out) => {
            xml::write_stat_tree_file(out, &tree)
                .with_context(|| format!("failed to write stat tree: {}", out.display()))?;
            cli::success(format!("wrote {}", out.display()));
        }
        None => cli::warning("no output path configured, stat tree not saved"),
    }

    if let Some(query) = &query {
        let stats = get_tag_stats(&tree, query);
        write_tag_report(io::stdout().lock(), &stats, query, config.tag_lower_bound)?;
    }

    cli::print_summary(start);
    Ok(())
}
