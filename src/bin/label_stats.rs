use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use genecheck::cli;
use genecheck::store::TranscriptStore;
use genecheck::summary;

#[derive(Parser)]
#[command(
    name = "label_stats",
    about = "Count transcripts per annotation label, or list those carrying given labels"
)]
struct Cli {
    /// Transcript BED12 file
    #[arg(long = "gene-check")]
    gene_check: PathBuf,

    /// Details BED file with annotation rows
    #[arg(long = "gene-check-details")]
    gene_check_details: PathBuf,

    /// Treat each label path as a single category instead of itemizing prefixes
    #[arg(long = "dont-split")]
    dont_split: bool,

    /// Comma-separated categories; list matching transcripts instead of counting
    #[arg(long = "labels", value_delimiter = ',')]
    labels: Vec<String>,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let start = Instant::now();
    let cli_args = Cli::parse();
    let split = !cli_args.dont_split;

    cli::banner("Label Stats");

    cli::section("Load");
    let store = TranscriptStore::from_paths(&cli_args.gene_check, &cli_args.gene_check_details)
        .with_context(|| {
            format!(
                "failed to load {} and {}",
                cli_args.gene_check.display(),
                cli_args.gene_check_details.display()
            )
        })?;
    cli::kv("Transcripts", store.len());
    cli::kv("Split labels", split);
    eprintln!();

    if cli_args.labels.is_empty() {
        let counts = summary::count_labels(&store, split);
        cli::kv("Categories", counts.labels.len());
        counts.write_report(io::stdout().lock())?;
    } else {
        cli::kv("Labels", cli_args.labels.join(", "));
        let matches = summary::transcripts_with_labels(&store, &cli_args.labels, split);
        cli::kv("Matches", matches.len());
        summary::write_transcript_list(io::stdout().lock(), &matches)?;
    }

    cli::print_summary(start);
    Ok(())
}
