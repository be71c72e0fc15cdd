// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use anyhow::{Context, Result};
use chordtree::config::CompositionFile;
use chordtree::piece::PieceStore;
use chordtree::render::render_sequence;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use std::io::{self, BufWriter, Write};
use tracing::{info, Level};

fn print_usage() {
    println!("CHORDTREE - Stochastic chord and melody generator");
    println!();
    println!("Usage: chordtree <COMPOSITION> [OPTIONS]");
    println!();
    println!("Writes one line per note to stdout: <pitch> <start secs> <duration secs>");
    println!();
    println!("Options:");
    println!("  --seed <N>        Seed the random generator (default: from entropy)");
    println!("  --order <I,J,..>  Piece indices to render, in order (default: file order)");
    println!("  --verbose         Log generation details to stderr");
    println!("  --help            Show this help message");
}

/// Parsed command line
struct Options {
    composition: String,
    seed: Option<u64>,
    order: Option<Vec<usize>>,
    verbose: bool,
}

fn parse_order(text: &str) -> Result<Vec<usize>> {
    text.split(',')
        .map(|index| {
            index
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid piece index: {}", index))
        })
        .collect()
}

fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut composition = None;
    let mut seed = None;
    let mut order = None;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => return Ok(None),
            "--seed" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                seed = Some(
                    value
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Invalid seed: {}", value))?,
                );
                i += 1;
            }
            "--order" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow::anyhow!("--order requires a list of indices"))?;
                order = Some(parse_order(value)?);
                i += 1;
            }
            "--verbose" | "-v" => verbose = true,
            other if other.starts_with('-') => {
                anyhow::bail!("Unknown option: {}", other);
            }
            path => {
                if composition.is_some() {
                    anyhow::bail!("Unexpected argument: {}", path);
                }
                composition = Some(path.to_string());
            }
        }
        i += 1;
    }

    let composition =
        composition.ok_or_else(|| anyhow::anyhow!("No composition file given"))?;
    Ok(Some(Options {
        composition,
        seed,
        order,
        verbose,
    }))
}

fn run(options: Options) -> Result<()> {
    let file = CompositionFile::load(&options.composition)?;
    let settings = file
        .validate()
        .with_context(|| format!("Invalid composition: {}", options.composition))?;

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut store = PieceStore::new();
    if let Err(err) = store.generate_all(&settings, &mut rng) {
        store.release_all();
        return Err(err).context("Piece generation failed");
    }

    let order = options.order.unwrap_or_else(|| file.render_order());
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = render_sequence(&mut out, &store, &order).context("Failed to write notes")?;
    out.flush().context("Failed to write notes")?;

    info!(
        pieces = summary.rendered,
        notes = summary.events,
        skipped = summary.skipped.len(),
        "render complete"
    );
    store.release_all();
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("CHORDTREE - Stochastic chord and melody generator");
        println!("Run with --help for usage information");
        return Ok(());
    }

    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            print_usage();
            std::process::exit(1);
        }
    };

    let level = if options.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    run(options)
}
