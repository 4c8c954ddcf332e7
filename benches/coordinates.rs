use std::fmt::Write;

use criterion::{Criterion, criterion_group, criterion_main};

use genecheck::annotation::Annotation;
use genecheck::interval::Interval;
use genecheck::stats::StatTree;
use genecheck::strand::Strand;
use genecheck::transcript::Transcript;

/// A 20-exon transcript with 100-base exons and 400-base introns.
fn many_exon_bed(strand: char) -> String {
    let exons = 20u64;
    let mut sizes = String::new();
    let mut starts = String::new();
    for i in 0..exons {
        write!(sizes, "100,").unwrap();
        write!(starts, "{},", i * 500).unwrap();
    }
    let stop = (exons - 1) * 500 + 100;
    format!(
        "chr1\t1000\t{}\ttx\t0\t{strand}\t1050\t{}\t0\t{exons}\t{sizes}\t{starts}",
        1000 + stop,
        1000 + stop - 50
    )
}

fn bench_coordinates(c: &mut Criterion) {
    for strand in ['+', '-'] {
        let t = Transcript::from_bed_line(&many_exon_bed(strand)).unwrap();
        let len = t.mrna_length();
        c.bench_function(&format!("transcript_to_chromosome ({strand})"), |b| {
            b.iter(|| {
                let mut sum = 0u64;
                for p in 0..len {
                    sum += t.transcript_coordinate_to_chromosome(p).unwrap_or(0);
                }
                sum
            });
        });
        let cds_len = t.cds_length();
        c.bench_function(&format!("cds_to_chromosome ({strand})"), |b| {
            b.iter(|| {
                let mut sum = 0u64;
                for p in 0..cds_len {
                    sum += t.cds_coordinate_to_chromosome(p).unwrap_or(0);
                }
                sum
            });
        });
    }
}

fn bench_parse(c: &mut Criterion) {
    let line = many_exon_bed('-');
    c.bench_function("parse_bed12 (20 exons)", |b| {
        b.iter(|| Transcript::from_bed_line(&line).unwrap());
    });
}

fn bench_stat_tree(c: &mut Criterion) {
    let interval = Interval::new("chr1", 0, 10, Strand::Unstranded).unwrap();
    let paths: [&[&str]; 4] = [
        &["noStop", "alignmentPartialMap"],
        &["cdsGap", "frameshift"],
        &["cdsGap", "inFrame"],
        &["hasOkCopies", "count_2"],
    ];
    let annotations: Vec<Annotation> = paths
        .iter()
        .cycle()
        .take(40)
        .map(|p| {
            Annotation::new(
                interval.clone(),
                "tx",
                p.iter().map(ToString::to_string).collect(),
            )
            .unwrap()
        })
        .collect();

    c.bench_function("stat_tree record (1000 transcripts x 40 annotations)", |b| {
        b.iter(|| {
            let mut tree = StatTree::new();
            for _ in 0..1000 {
                tree.record(&annotations).unwrap();
            }
            tree
        });
    });
}

criterion_group!(benches, bench_coordinates, bench_parse, bench_stat_tree);
criterion_main!(benches);
