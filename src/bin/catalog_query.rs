//! Query a design-system catalog from the command line.
//!
//! Loads one catalog (bundled name or file path) or reads ad-hoc records from
//! stdin, applies a search term, facet selections, and a sort key, and prints
//! the ordered result. `--options FACET` prints the values a facet can take
//! instead of records.

use anyhow::{Context, Result, bail};
use catalog_query::{
    CatalogIndex, CatalogRecord, Facet, FilterState, QuerySummary, SearchFields, SortKey,
    facet_options, find_repo_root, parse_record_stream, query, resolve_catalog_path, summarize,
};
use clap::{Parser, ValueEnum};
use std::fmt::Write as _;
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "catalog-query", version, about = "Search and filter a design-system catalog")]
struct Cli {
    /// Bundled catalog name (components, patterns, community, primitives) or a file path
    #[arg(long, env = "CATALOG_PATH")]
    catalog: Option<String>,

    /// Case-insensitive substring matched against the catalog's searchable fields
    #[arg(long, default_value = "")]
    search: String,

    /// Facet selection as NAME=VALUE; repeatable, all selections must hold
    #[arg(long = "facet", value_name = "NAME=VALUE", value_parser = parse_facet_selection)]
    facets: Vec<(Facet, String)>,

    /// Sort key; unknown keys fall back to name-asc
    #[arg(long, default_value = "name-asc")]
    sort: String,

    /// Print the option list for FACET instead of records
    #[arg(long, value_name = "FACET")]
    options: Option<String>,

    /// Emit NDJSON (or a JSON array for --options)
    #[arg(long)]
    json: bool,

    /// Read records from stdin (JSON array, object, or NDJSON) instead of a catalog
    #[arg(long)]
    stdin: bool,

    /// Log level; RUST_LOG is used when omitted
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

fn parse_facet_selection(raw: &str) -> Result<(Facet, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    if name.trim().is_empty() {
        return Err(format!("facet name missing in '{raw}'"));
    }
    Ok((Facet::from_token(name), value.to_string()))
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(cli.log_level);

    let source = load_source(&cli)?;
    if let Some(facet) = cli.options.as_deref() {
        let options = facet_options(&source.records, &Facet::from_token(facet));
        if cli.json {
            println!("{}", serde_json::to_string(&options)?);
        } else {
            for option in options {
                println!("{option}");
            }
        }
        return Ok(());
    }

    let state = build_state(&cli);
    warn_unoffered_facets(&state, source.facets.as_deref());
    let results = query(&source.records, &state, &source.search_fields);

    if cli.json {
        let mut out = String::new();
        for record in &results {
            writeln!(out, "{}", serde_json::to_string(record)?)?;
        }
        print!("{out}");
    } else {
        print!(
            "{}",
            render_text(&source.title, source.records.len(), &results)?
        );
    }
    Ok(())
}

fn initialize_tracing(level: Option<LogLevel>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level.to_filter_directive()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

struct RecordSource {
    title: String,
    search_fields: SearchFields,
    /// Facets the catalog declares; `None` for ad-hoc records.
    facets: Option<Vec<Facet>>,
    records: Vec<CatalogRecord>,
}

fn load_source(cli: &Cli) -> Result<RecordSource> {
    if cli.stdin {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            bail!("--stdin expects catalog records piped on stdin");
        }
        let mut input = String::new();
        stdin
            .lock()
            .read_to_string(&mut input)
            .context("reading records from stdin")?;
        return Ok(RecordSource {
            title: "stdin".to_string(),
            search_fields: SearchFields::default(),
            facets: None,
            records: parse_record_stream(&input)?,
        });
    }

    let repo_root = find_repo_root()?;
    let path = resolve_catalog_path(&repo_root, cli.catalog.as_deref());
    let index = CatalogIndex::load(&path)?;
    Ok(RecordSource {
        title: index.title().to_string(),
        search_fields: index.search_fields().clone(),
        facets: Some(index.facets().to_vec()),
        records: index.records().to_vec(),
    })
}

fn build_state(cli: &Cli) -> FilterState {
    cli.facets.iter().fold(
        FilterState::new()
            .with_search(cli.search.as_str())
            .with_sort(SortKey::parse(&cli.sort)),
        |state, (facet, value)| state.with_facet(facet.clone(), value),
    )
}

/// A facet outside the catalog's list is usually a typo; an unknown name never
/// applies to any record, so its selection would silently match everything.
fn warn_unoffered_facets(state: &FilterState, offered: Option<&[Facet]>) {
    let Some(offered) = offered else {
        return;
    };
    for (facet, value) in state.active_facets() {
        if !offered.contains(facet) {
            tracing::warn!(
                facet = facet.as_str(),
                value,
                offered = ?offered.iter().map(Facet::as_str).collect::<Vec<_>>(),
                "facet is not offered by this catalog"
            );
        }
    }
}

fn render_text(title: &str, total: usize, results: &[CatalogRecord]) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "{title}: {} of {total} records{}",
        results.len(),
        describe_counts(&summarize(results))
    )?;
    for record in results {
        let mut details = vec![record.record_type().as_str().to_string(), record.category.clone()];
        if let Some(lifecycle) = record.lifecycle() {
            details.push(lifecycle.as_str().to_string());
        }
        if let Some(health) = record.health() {
            details.push(health.as_str().to_string());
        }
        if let Some(usage) = &record.usage {
            details.push(format!("usage {}", usage.as_str()));
        }
        writeln!(
            out,
            "  {:<24} {} | {} | updated {}",
            record.name,
            details.join(", "),
            record.owner,
            record.last_updated
        )?;
    }
    Ok(out)
}

fn describe_counts(summary: &QuerySummary) -> String {
    if summary.by_type.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = summary
        .by_type
        .iter()
        .map(|(kind, count)| format!("{kind}: {count}"))
        .collect();
    format!(" ({})", parts.join(", "))
}
