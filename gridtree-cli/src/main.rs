mod error;
mod input;
mod render;

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gridtree_lib::DefaultExpansion;
use gridtree_lib::HierarchyEngine;
use gridtree_lib::hierarchy::ExpandOptions;
use log::info;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};

use crate::error::CliError;
use crate::input::GridPage;
use crate::render::render_rows;

/// Group a parent page and a child page into an expandable grid and print
/// the visible rows.
///
/// Actions are applied in a fixed order: expand-all, collapse-all, expand,
/// collapse, toggle.
#[derive(Debug, Parser)]
#[command(name = "gridtree", version)]
struct Args {
    /// JSON file with `parents`, `children` and an optional `config` object.
    input: PathBuf,

    /// Expand a node (repeatable).
    #[arg(long, value_name = "ID")]
    expand: Vec<String>,

    /// Expand nodes recursively.
    #[arg(long)]
    recursive: bool,

    /// Collapse a node (repeatable).
    #[arg(long, value_name = "ID")]
    collapse: Vec<String>,

    /// Toggle a node (repeatable).
    #[arg(long, value_name = "ID")]
    toggle: Vec<String>,

    #[arg(long)]
    expand_all: bool,

    #[arg(long)]
    collapse_all: bool,

    /// Override the default expansion (-1 all, 0 none, n levels).
    #[arg(long, value_name = "LEVEL", allow_hyphen_values = true)]
    expand_level: Option<i32>,

    /// Print hierarchy statistics and timings after the rows.
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write logs to a file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(args: &Args) -> Result<(), CliError> {
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    match &args.log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::LogFile {
                path: path.clone(),
                source,
            })?;
            WriteLogger::init(level, Config::default(), file)?;
        }
        None => {
            TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    init_logging(&args)?;

    let (mut config, parents, children) = GridPage::load(&args.input)?.into_parts();
    if let Some(level) = args.expand_level {
        config.default_expansion = DefaultExpansion::from(level);
    }
    info!(
        "loaded {} parent and {} child records from {}",
        parents.len(),
        children.len(),
        args.input.display()
    );

    let mut engine = HierarchyEngine::new(config.clone());
    if !engine.initialize(&parents, &children) {
        let warnings = engine
            .detection()
            .map(|d| d.warnings.iter().map(ToString::to_string).collect::<Vec<_>>())
            .unwrap_or_default();
        eprintln!("No hierarchy built.");
        for warning in warnings {
            eprintln!("  - {warning}");
        }
    }

    if args.expand_all {
        engine.expand_all();
    }
    if args.collapse_all {
        engine.collapse_all();
    }
    let options = ExpandOptions {
        recursive: args.recursive,
        max_depth: None,
    };
    for id in &args.expand {
        engine.expand_node(id, options);
    }
    for id in &args.collapse {
        engine.collapse_node(id);
    }
    for id in &args.toggle {
        engine.toggle_node(id);
    }

    print!("{}", render_rows(&engine, &config));

    if args.stats {
        if let Some(relationship) = engine.relationship() {
            println!();
            println!(
                "relationship: {}.{} <- {}{}",
                relationship.parent_key,
                relationship.child_key,
                relationship.reference_column,
                relationship
                    .confidence
                    .map(|c| format!(" (auto, confidence {c:.2})"))
                    .unwrap_or_default()
            );
        }
        let stats = engine.statistics();
        let metrics = engine.metrics();
        println!(
            "nodes: {} ({} roots, {} children, {} orphans dropped)",
            stats.total_nodes, stats.root_count, stats.child_count, stats.orphan_count
        );
        println!(
            "visible: {}, expanded: {}, max depth: {}",
            stats.visible_count, stats.expanded_count, stats.max_depth
        );
        println!(
            "build: {:?}, last expand: {:?}, last render: {:?}",
            metrics.last_build_time, metrics.last_expand_time, metrics.last_render_time
        );
        if config.show_expand_collapse_all {
            println!("hint: --expand-all / --collapse-all");
        }
    }

    engine.dispose();
    Ok(())
}
