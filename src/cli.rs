//! CLI argument parsing for chronotree

use crate::config::{HierarchyConfig, OutputFormat};
use crate::lifetime::DEFAULT_DAYS;
use crate::timesplit::{parse_start, WindowLength};
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chronotree")]
#[command(version)]
#[command(
    about = "Build temporal-cluster concept hierarchies from timestamped identifiers",
    long_about = None
)]
pub struct Cli {
    /// Enable debug tracing output to stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build one hierarchy per line of identifiers
    Build(BuildArgs),

    /// Count mono/bi-word associations from phenomena and documents
    Count(CountArgs),

    /// Group frequent itemsets into connected components
    Components(ComponentsArgs),

    /// Trace consolidated phenomena through daily phenomenon files
    Lifetime(LifetimeArgs),

    /// Split a timestamped tag stream into fixed time windows
    Split(SplitArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Identifier → timestamp table (`<date> <time> <identifier>` per line)
    #[arg(long = "timestamps", value_name = "FILE")]
    pub timestamps: PathBuf,

    /// Association count source; repeat for several (later ones win)
    #[arg(long = "assoc", value_name = "FILE", required = true, num_args = 1..)]
    pub assoc: Vec<PathBuf>,

    /// Whitespace-separated identifiers, one hierarchy per line
    #[arg(long = "lines", value_name = "FILE")]
    pub lines: PathBuf,

    /// Write output to file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// TOML configuration file (flags override its values)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cluster half-window in hours
    #[arg(long = "alpha-hours", value_name = "HOURS")]
    pub alpha_hours: Option<f64>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Omit the root line from text output
    #[arg(long = "no-root")]
    pub no_root: bool,

    /// Name of the synthetic root node
    #[arg(long = "root-label", value_name = "LABEL")]
    pub root_label: Option<String>,

    /// Skip lines that fail instead of aborting
    #[arg(long = "keep-going")]
    pub keep_going: bool,

    /// Worker threads
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,
}

impl BuildArgs {
    /// Apply flags on top of `config`; flags that were not given leave it alone
    pub fn apply_to(&self, config: &mut HierarchyConfig) {
        if let Some(alpha_hours) = self.alpha_hours {
            config.alpha_hours = alpha_hours;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if self.no_root {
            config.emit_root = false;
        }
        if let Some(label) = &self.root_label {
            config.root_label = label.clone();
        }
        if self.keep_going {
            config.keep_going = true;
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
    }
}

#[derive(Args, Debug)]
pub struct CountArgs {
    /// Phenomenon tag lines defining candidate tags and pairs
    #[arg(long = "phenomena", value_name = "FILE")]
    pub phenomena: PathBuf,

    /// Document tag lines to count
    #[arg(long = "documents", value_name = "FILE")]
    pub documents: PathBuf,

    /// Directory receiving biword_assoc.dat and monoword_assoc.dat
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct ComponentsArgs {
    /// Itemset lines (`tag ... <support>`)
    #[arg(long = "itemsets", value_name = "FILE")]
    pub itemsets: PathBuf,

    /// Write output to file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct LifetimeArgs {
    /// Consolidated phenomenon tag lines, numbered from 1
    #[arg(long = "phenomena", value_name = "FILE")]
    pub phenomena: PathBuf,

    /// Directory holding one `<day>.dat` phenomenon file per day
    #[arg(long = "daily-dir", value_name = "DIR")]
    pub daily_dir: PathBuf,

    /// Number of days to scan, starting at day 1
    #[arg(long = "days", value_name = "N", default_value_t = DEFAULT_DAYS)]
    pub days: u32,

    /// Directory receiving phen_lifetime.dat and delta_phen.dat
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Time-ordered `<date> <time> #tag ...` records
    #[arg(long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Start of window 1 (yyyy/mm/dd-HH:MM:SS)
    #[arg(long = "start", value_name = "TIME", value_parser = parse_start)]
    pub start: NaiveDateTime,

    /// Window length (days-hours-minutes-seconds)
    #[arg(long = "window", value_name = "D-H-M-S")]
    pub window: WindowLength,

    /// Directory receiving one `<window>.dat` file per non-empty window
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: PathBuf,
}
