//! Knowledge base inspector
//!
//! Dumps every stored observation and checks the monotonicity invariant
//! along with the one-record-per-configuration rule.
//! Exits non-zero if the stored file contradicts itself.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cktrain::knowledge::{FileStore, KnowledgeBase, Observation, RecordStore};

#[derive(Parser, Debug)]
#[command(name = "kb_stats")]
#[command(about = "Inspect a cktrain knowledge base file")]
struct Args {
    /// Knowledge base file
    #[arg(default_value = "knowledge.bin")]
    path: PathBuf,

    /// Only print the summary
    #[arg(long, short = 's')]
    summary: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cktrain=warn")))
        .init();

    let args = Args::parse();
    let records = FileStore::new(&args.path).load_all();

    let mut sorted: Vec<&Observation> = records.iter().collect();
    sorted.sort_by(|a, b| {
        a.cmp_ratio(b)
            .then_with(|| a.permutation.total().cmp(&b.permutation.total()))
    });

    if !args.summary {
        for record in &sorted {
            println!(
                "{:>3}/{:<3} ({:.3})  {}",
                record.numerator,
                record.denominator,
                record.ratio(),
                record.permutation
            );
        }
        println!();
    }

    let violations = count_violations(&records);
    let kb = KnowledgeBase::from_records(records.clone());

    println!("=== {} ===", args.path.display());
    println!("Records:    {}", records.len());
    println!("Mastery:    {:.1}%", kb.mastery() * 100.0);
    println!("Mastered:   {}", kb.mastered());
    println!("Violations: {}", violations);

    if violations > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn count_violations(records: &[Observation]) -> usize {
    let mut count = 0;
    for (i, a) in records.iter().enumerate() {
        for b in &records[i + 1..] {
            if a.permutation == b.permutation || !a.is_consistent_with(b) {
                count += 1;
            }
        }
    }
    count
}
