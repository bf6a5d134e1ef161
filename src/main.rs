//! covertree - aggregate archive coverage of a URL space into a tree.
//!
//! Usage:
//!   covertree -m eot.json tree         Build a tree and print it
//!   covertree -m eot.json summary      Print archived/total counts
//!   covertree -m eot.json rebuild      Merge repositories into the cache
//!   covertree show                     Print the cached tree
//!   covertree --help                   Show help

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use covertree_core::{CacheStore, CoverageConfig, Node, TreeStats};
use covertree_gen::CoverageGenerator;
use covertree_repo::{ManifestRepository, RepositoryRegistry};

#[derive(Parser)]
#[command(
    name = "covertree",
    version,
    about = "Aggregate archive coverage of a URL space into a tree",
    long_about = "covertree merges URL listings from several repositories into one \
                  tree and annotates every node with archived/total counts.\n\n\
                  Repositories are registered from JSON manifests with --manifest."
)]
struct Cli {
    /// Cache artifact path
    #[arg(short, long, global = true, default_value = covertree_core::DEFAULT_CACHE_FILE)]
    cache: PathBuf,

    /// Repository manifest to register (repeatable)
    #[arg(short, long = "manifest", global = true)]
    manifests: Vec<PathBuf>,

    /// Only use these repository ids (repeatable)
    #[arg(short, long = "repo", global = true)]
    repos: Vec<String>,

    /// Only insert URLs matching these patterns (repeatable)
    #[arg(short, long = "source", global = true)]
    sources: Vec<String>,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a fresh tree from the selected repositories
    Tree {
        /// Maximum depth to display in text output
        #[arg(short, long, default_value = "3")]
        depth: u32,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print archived and total descendant counts
    Summary {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Merge repositories into the cached tree and write it back
    Rebuild,

    /// Print the cached tree
    Show {
        /// Maximum depth to display in text output
        #[arg(short, long, default_value = "3")]
        depth: u32,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = CoverageConfig::builder()
        .cache_path(cli.cache.clone())
        .repository_ids(cli.repos.clone())
        .source_patterns(cli.sources.clone())
        .build()
        .context("Invalid configuration")?;

    match cli.command {
        Command::Tree { depth, format } => {
            let generator = generator(&cli.manifests, &config)?;
            let tree = generator.tree().context("Failed to build coverage tree")?;
            print_tree(&tree, depth, format)?;
        }
        Command::Summary { format } => {
            let generator = generator(&cli.manifests, &config)?;
            let summary = generator.summary().context("Failed to build coverage tree")?;
            match format {
                OutputFormat::Text => {
                    println!("{} of {} nodes archived", summary.archived, summary.descendants);
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            }
        }
        Command::Rebuild => {
            let generator = generator(&cli.manifests, &config)?;
            let cache = CacheStore::new(&config.cache_path);
            let outcome = generator.init_tree(&cache).context("Rebuild failed")?;

            for failure in &outcome.failures {
                eprintln!("warning: {}: {}", failure.repository_id, failure.error);
            }
            match &outcome.save_error {
                Some(err) => eprintln!("warning: cache not written: {err}"),
                None => eprintln!("Wrote {}", cache.path().display()),
            }
            print_stats(&outcome.tree);
        }
        Command::Show { depth, format } => {
            let cache = CacheStore::new(&config.cache_path);
            match cache.load().context("Failed to read cache")? {
                Some(tree) => print_tree(&tree, depth, format)?,
                None => eprintln!("No cache at {}", cache.path().display()),
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let default_filter = ["covertree", "covertree_core", "covertree_repo", "covertree_gen"]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Register every manifest and select repositories per `config`.
fn generator(manifests: &[PathBuf], config: &CoverageConfig) -> Result<CoverageGenerator> {
    let mut registry = RepositoryRegistry::new();
    for path in manifests {
        let repo = ManifestRepository::open(path)
            .with_context(|| format!("Failed to open manifest {}", path.display()))?;
        registry.register(repo);
    }
    if registry.is_empty() {
        tracing::warn!("no repositories registered, tree will be empty");
    }
    Ok(CoverageGenerator::from_config(&registry, config)?)
}

fn print_tree(tree: &Node, depth: u32, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print_stats(tree);
            println!();
            print_node(tree, 0, depth);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(tree)?),
    }
    Ok(())
}

fn print_stats(tree: &Node) {
    let stats = TreeStats::from_root(tree);
    println!("{}", "─".repeat(60));
    println!(
        " {} nodes, {} archived ({:.1}%)",
        stats.total_nodes,
        stats.archived_nodes,
        stats.coverage_ratio() * 100.0
    );
    println!(
        " {} leaves, {} archived ({:.1}%)",
        stats.total_leaves,
        stats.archived_leaves,
        stats.leaf_coverage_ratio() * 100.0
    );
    println!("{}", "─".repeat(60));
}

/// Print a node and its children.
fn print_node(node: &Node, depth: u32, max_depth: u32) {
    let indent = "  ".repeat(depth as usize);
    let marker = if node.is_leaf() { "  " } else { "▼ " };
    let archived = if node.archived || node.is_covered() { "✓" } else { " " };

    if node.is_leaf() {
        println!("{indent}{marker}{archived} {}", node.name);
    } else {
        println!(
            "{indent}{marker}{archived} {:<40} {:>6}/{:<6} leaves archived",
            node.name, node.num_leaves_archived, node.num_leaves
        );
    }

    if depth < max_depth {
        for child in &node.children {
            print_node(child, depth + 1, max_depth);
        }
    } else if !node.is_leaf() {
        println!("{indent}    ... {} more", node.num_descendants);
    }
}
