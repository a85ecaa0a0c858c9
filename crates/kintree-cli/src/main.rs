//! Kintree CLI
//!
//! Thin display collaborator around the generator: builds the family graph
//! and either prints a summary, dumps it as JSON, or writes the JSON to a
//! file. The graph itself (and all of its invariants) lives in
//! `kintree-graph`; nothing here mutates it.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use kintree_graph::{build_data, FamilyGraph, DEFAULT_MAX_LEVELS};

#[derive(Parser)]
#[command(name = "kintree")]
#[command(
    author,
    version,
    about = "Deterministic genealogical test-graph generator"
)]
struct Cli {
    /// Generations below the root couple. Negative values behave like 0:
    /// the root union is still created, it just has no children.
    #[arg(long, default_value_t = DEFAULT_MAX_LEVELS)]
    max_levels: i32,

    /// Print the full graph as pretty JSON on stdout instead of a summary.
    #[arg(long, conflicts_with = "output")]
    json: bool,

    /// Write the graph JSON to this file (a summary is still printed).
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let graph = build_data(cli.max_levels).context("graph construction failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&graph).context("serialize graph")?;
        println!("{json}");
        return Ok(());
    }

    if let Some(path) = &cli.output {
        let json = serde_json::to_string_pretty(&graph).context("serialize graph")?;
        fs::write(path, json).with_context(|| format!("write `{}`", path.display()))?;
        println!("{} {}", "wrote".green().bold(), path.display());
    }

    print_summary(&graph, cli.max_levels);
    Ok(())
}

fn print_summary(graph: &FamilyGraph, max_levels: i32) {
    println!(
        "{} (max_levels = {})",
        "family graph".bold(),
        max_levels.to_string().cyan()
    );
    println!("  start:   {}", graph.start.as_str().yellow());
    println!("  persons: {}", graph.persons.len().to_string().green());
    println!("  unions:  {}", graph.unions.len().to_string().green());
    println!("  links:   {}", graph.links.len().to_string().green());
}
