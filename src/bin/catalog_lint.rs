//! Validate every catalog under a directory.
//!
//! Prints one line per problem (load failures, duplicate catalog keys,
//! community records naming unknown components) and exits non-zero when any
//! problem was found.

use anyhow::Result;
use catalog_query::{default_catalog_dir, find_repo_root, lint_catalog_dir};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "catalog-lint", version, about = "Check catalog files for authoring mistakes")]
struct Cli {
    /// Directory of catalog files; defaults to the repository's catalogs/
    dir: Option<PathBuf>,
}

fn main() {
    match run() {
        Ok(0) => {}
        Ok(_) => std::process::exit(1),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<usize> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let dir = match cli.dir {
        Some(dir) => dir,
        None => default_catalog_dir(&find_repo_root()?),
    };
    let problems = lint_catalog_dir(&dir)?;
    for problem in &problems {
        eprintln!("{problem}");
    }
    if problems.is_empty() {
        println!("catalogs OK: {}", dir.display());
    }
    Ok(problems.len())
}
