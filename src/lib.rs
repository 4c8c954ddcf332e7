//! genecheck: coordinate model and annotation statistics for spliced gene models.

pub mod error;

pub mod annotation;
pub mod classify;
pub mod cli;
pub mod codon;
pub mod config;
pub mod fasta;
pub mod interval;
pub mod sequence;
pub mod stats;
pub mod store;
pub mod strand;
pub mod summary;
pub mod transcript;
