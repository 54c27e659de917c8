//! cktrain - Entry Point
//!
//! Interactive terminal front end. Generates a round, shows its level code
//! and obstacle list, then waits for a difficulty rating before moving on.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use rand::RngCore;
use tracing_subscriber::EnvFilter;

use cktrain::core::config::TrainerConfig;
use cktrain::core::error::Result;
use cktrain::engine::Trainer;
use cktrain::knowledge::{Feedback, FileStore, RecordStore};
use cktrain::rng::SecureRng;

/// Adaptive obstacle-course trainer
#[derive(Parser, Debug)]
#[command(name = "cktrain")]
#[command(about = "Generate obstacle courses at a randomly targeted difficulty and learn from your ratings")]
struct Args {
    /// TOML config file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the knowledge base path from the config
    #[arg(long)]
    knowledge: Option<PathBuf>,

    /// Replay a deterministic random stream instead of OS entropy
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cktrain=info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TrainerConfig::load(path)?,
        None => TrainerConfig::default(),
    };
    if let Some(path) = args.knowledge {
        config.knowledge_path = path;
    }
    let json = args.format == "json";

    match args.seed {
        Some(seed) => {
            tracing::warn!(seed, "using deterministic replay stream");
            config.validate()?;
            let store = FileStore::new(&config.knowledge_path);
            let trainer = Trainer::new(store, SecureRng::seeded(seed), config.load_prefix(), &config);
            run(trainer, json)
        }
        None => run(Trainer::open(&config)?, json),
    }
}

fn run<S: RecordStore, R: RngCore>(mut trainer: Trainer<S, R>, json: bool) -> Result<()> {
    println!("\n=== CKTRAIN ===");
    println!("Rate each course after playing it:");
    println!("  0 / easy        - No trouble at all");
    println!("  1 / fair        - Some attempts needed");
    println!("  2 / hard        - Barely managed");
    println!("  3 / brutal      - Could not clear it");
    println!("  n / next        - Skip without rating");
    println!("  m / mastery     - Show mastery");
    println!("  q / quit        - Exit");

    trainer.generate();

    loop {
        if let Some(report) = trainer.report() {
            println!();
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(out) => println!("{}", out),
                    Err(e) => println!("Could not serialize report: {}", e),
                }
            } else {
                println!("{}", report);
            }
        }

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "next" || input == "n" {
            trainer.skip();
            continue;
        }

        if input == "mastery" || input == "m" {
            println!("Mastery: {:.1}%", trainer.mastery() * 100.0);
            println!("Mastered: {}", trainer.knowledge().mastered());
            continue;
        }

        match input.parse::<Feedback>() {
            Ok(feedback) => match trainer.submit(feedback) {
                Ok(evicted) => {
                    if evicted > 0 {
                        println!("Rated {} ({} outdated record(s) dropped)", feedback, evicted);
                    } else {
                        println!("Rated {}", feedback);
                    }
                    trainer.generate();
                }
                Err(e) => println!("Could not save rating, try again: {}", e),
            },
            Err(_) => println!("Unknown command. Available: 0-3, next, mastery, quit"),
        }
    }

    println!(
        "\nGoodbye! {} records, mastery {:.1}%.",
        trainer.knowledge().len(),
        trainer.mastery() * 100.0
    );
    Ok(())
}
