//! locality-cli: command-line shell for locality-core
//!
//! Searches a snapshot of localities by substring or by sound, and runs the
//! batch indexing pass that precomputes phonetic codes.
//!
//! Usage examples
//! --------------
//!
//! - Load a source dataset and index it
//!   $ locality-cli import localities.json.gz
//!   $ locality-cli rebuild
//!
//! - Code only rows added since the last pass
//!   $ locality-cli rebuild --missing-only
//!
//! - Substring search (name or display name, case-insensitive)
//!   $ locality-cli search ottawa
//!
//! - Phonetic search with a similarity threshold
//!   $ locality-cli search "Smith Falls" --phonetic --threshold 0.5
//!
//! Data source
//! -----------
//!
//! The table lives in a single snapshot file, `localities.bin` in the
//! current directory unless `--db` or `LOCALITY_DB` point elsewhere. Set
//! `LOCALITY_LOG` (e.g. `debug`) to override the log filter.
mod args;

use crate::args::{CliArgs, Commands, SearchArgs};
use anyhow::{bail, Context};
use clap::Parser;
use locality_core::phonetic::encode;
use locality_core::{
    FileStorage, FoldMode, LocalityIndex, RebuildMode, SearchEngine, SearchMode, SearchOptions,
};
use locality_cli::render;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("LOCALITY_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn open_index(args: &CliArgs) -> anyhow::Result<LocalityIndex<FileStorage>> {
    LocalityIndex::open(FileStorage::new(&args.db))
        .with_context(|| format!("failed to open locality table at {}", args.db.display()))
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose, args.quiet);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &args.command {
        Commands::Search(search) => run_search(&args, search, &mut out)?,

        Commands::Rebuild { missing_only } => {
            let mode = if *missing_only {
                RebuildMode::MissingOnly
            } else {
                RebuildMode::Full
            };
            let mut index = open_index(&args)?;
            let report = index
                .rebuild_phonetic_index(mode)
                .context("phonetic index rebuild failed")?;
            writeln!(
                out,
                "Phonetic codes computed for {} rows ({} changed).",
                report.recomputed, report.changed
            )?;
        }

        Commands::Import { source } => {
            #[cfg(feature = "json")]
            {
                let records = locality_core::storage::import::read_source(source)
                    .with_context(|| format!("failed to read {}", source.display()))?;
                let mut index = open_index(&args)?;
                let added = index.import(records).context("import failed")?;
                writeln!(
                    out,
                    "Imported {added} localities ({} total). Run `rebuild --missing-only` to index them.",
                    index.len()
                )?;
            }
            #[cfg(not(feature = "json"))]
            {
                bail!(
                    "cannot import {}: built without the 'json' feature",
                    source.display()
                );
            }
        }

        Commands::Encode { names } => {
            for name in names {
                writeln!(out, "{name}\t{}", encode(name))?;
            }
        }

        Commands::Stats => {
            let index = open_index(&args)?;
            let stats = index.stats();
            writeln!(out, "Locality table: {}", args.db.display())?;
            writeln!(out, "  Records: {}", stats.records)?;
            writeln!(out, "  Coded: {}", stats.coded)?;
            writeln!(out, "  Uncoded: {}", stats.uncoded)?;
            writeln!(
                out,
                "  Code buckets: {}",
                if stats.accelerated {
                    stats.buckets.to_string()
                } else {
                    "none (run `rebuild`)".to_owned()
                }
            )?;
        }
    }

    Ok(())
}

fn run_search(args: &CliArgs, search: &SearchArgs, out: &mut impl Write) -> anyhow::Result<()> {
    if search.query.trim().is_empty() {
        bail!("query must not be empty");
    }

    let mode = if search.phonetic {
        SearchMode::Phonetic
    } else {
        SearchMode::Substring
    };
    let fold = if search.fold_accents {
        FoldMode::Accents
    } else {
        FoldMode::Case
    };
    let options = SearchOptions {
        mode,
        threshold: search.threshold,
        fold,
    };

    tracing::debug!(query = %search.query, ?options, "running search");
    let index = open_index(args)?;
    let engine = SearchEngine::new(&index);
    let mut hits = engine.search(&search.query, &options);
    if let Some(limit) = search.limit {
        hits.truncate(limit);
    }

    let rows = render::rows(&hits);
    if search.json {
        render::write_json(out, &rows)?;
    } else {
        render::write_table(out, &rows, mode)?;
    }
    Ok(())
}
