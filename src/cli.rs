use clap::{ArgAction, Parser, Subcommand};
use scope_graph::application::dto::OutputFormat;
use std::path::PathBuf;

/// Dependency graphs and weekly download trends for the packages of an npm scope
#[derive(Parser, Debug)]
#[command(name = "scope-graph")]
#[command(version)]
#[command(about = "Dependency graphs and weekly download trends for the packages of an npm scope", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// npm scope to inspect, e.g. @wxn0brp
    #[arg(short, long, global = true)]
    pub scope: Option<String>,

    /// Path to a config file (defaults to ./scope-graph.config.yml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Maximum number of concurrent registry requests
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_concurrency: Option<u32>,

    /// Bypass the on-disk cache for this run
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the dependency graph between the scope's packages
    Graph {
        /// Output format: json, markdown or dot
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Build weekly download trends of the scope's packages
    Downloads {
        /// Output format: json or markdown
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Number of days to look back from today
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        days: Option<u32>,

        /// Only keep these packages (short names, comma separated)
        #[arg(long, value_name = "NAMES", value_delimiter = ',')]
        select: Vec<String>,
    },

    /// Manage the on-disk cache
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Remove every cached entry
    Clear,
}
