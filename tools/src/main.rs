mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inflexion_core::{Inflexion, MorphologyTable, TagFilter};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "inflexion", about = "Generate and parse word forms from a morphology table")]
struct Args {
    /// TOML morphology table (config, lexicons and rule sets)
    #[arg(long, short = 't')]
    table: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate every form of a lemma for a key
    Generate {
        lemma: String,
        key: String,
        /// Feature name for the tag filter (repeatable). Defaults to the table's default_tags.
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Analyse a word form into (lemma, key) pairs
    Parse {
        form: String,
        /// Feature name for the tag filter (repeatable). Without it tags are ignored.
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// List the raw (key, stem) candidates every rule set finds for a form
    Stems { form: String },
    /// Build the table and report what it contains
    Check,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let table = MorphologyTable::load_toml(&args.table).context("loading morphology table")?;
    let engine = table
        .build()
        .with_context(|| format!("building table {}", args.table.display()))?;
    info!(
        lexicons = engine.lexicons().len(),
        rule_sets = engine.stemming_rule_sets().len(),
        "table loaded"
    );

    match args.command {
        Command::Generate { lemma, key, tags, json } => {
            let generated = if tags.is_empty() {
                engine.generate(&lemma, &key)
            } else {
                let filter: TagFilter = tags.into_iter().collect();
                engine.generate_tagged(&lemma, &key, &filter)
            };
            let rows = report::forms(&generated);
            if rows.is_empty() {
                eprintln!("no forms for {} {}", lemma, key);
            }
            emit(&rows, json)?;
        }
        Command::Parse { form, tags, json } => {
            let parsed = if tags.is_empty() {
                engine.parse(&form)
            } else {
                let filter: TagFilter = tags.into_iter().collect();
                engine.parse_tagged(&form, &filter)
            };
            let rows = report::analyses(&parsed);
            if rows.is_empty() {
                eprintln!("no analyses for {}", form);
            }
            emit(&rows, json)?;
        }
        Command::Stems { form } => print_stems(&engine, &form),
        Command::Check => {
            for (i, lexicon) in engine.lexicons().iter().enumerate() {
                println!(
                    "lexicon {}: {} lemmas, {} entries",
                    i,
                    lexicon.len(),
                    lexicon.entry_count()
                );
            }
            for (i, rules) in engine.stemming_rule_sets().iter().enumerate() {
                println!(
                    "rule set {}: {} keys, {} rules",
                    i,
                    rules.keys().count(),
                    rules.len()
                );
            }
        }
    }

    Ok(())
}

fn print_stems(engine: &Inflexion, form: &str) {
    let form = engine.prepare(form);
    for (i, rules) in engine.stemming_rule_sets().iter().enumerate() {
        for candidate in rules.candidates(&form) {
            println!("{}\t{}\t{}\t[{}]", i, candidate.key, candidate.stem, candidate.rule);
        }
    }
}

fn emit<T: Serialize + std::fmt::Display>(rows: &[T], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
    } else {
        for row in rows {
            println!("{}", row);
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
