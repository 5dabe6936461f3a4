use anyhow::{Context, Result};
use chronotree::cli::{
    BuildArgs, Cli, Command, ComponentsArgs, CountArgs, LifetimeArgs, SplitArgs,
};
use chronotree::config::HierarchyConfig;
use chronotree::input::{load_association_sources, read_identifier_lines_from_path, TimestampTable};
use chronotree::pipeline::{write_forest, Pipeline};
use chronotree::{components, counting, lifetime, timesplit};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `--debug` raises the level to TRACE
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Output sink: the given file, or stdout
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn load_config(args: &BuildArgs) -> Result<HierarchyConfig> {
    let mut config = match &args.config {
        Some(path) => HierarchyConfig::from_toml(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => HierarchyConfig::default(),
    };
    args.apply_to(&mut config);
    config.validate()?;
    Ok(config)
}

fn run_build(args: &BuildArgs) -> Result<()> {
    let config = load_config(args)?;
    tracing::debug!(?config, "resolved configuration");

    let timestamps = TimestampTable::from_path(&args.timestamps).with_context(|| {
        format!("failed to load timestamps from {}", args.timestamps.display())
    })?;
    let associations = load_association_sources(&args.assoc)
        .context("failed to load association sources")?;
    let lines = read_identifier_lines_from_path(&args.lines)
        .with_context(|| format!("failed to read lines from {}", args.lines.display()))?;

    let pipeline = Pipeline::new(&timestamps, &associations, &config);
    let outcomes = pipeline.run(&lines)?;

    let out = open_output(args.output.as_deref())?;
    write_forest(out, &outcomes, &config).context("failed to write output")?;
    Ok(())
}

fn run_count(args: &CountArgs) -> Result<()> {
    counting::count_associations(&args.phenomena, &args.documents, &args.out_dir)
        .with_context(|| format!("failed to count associations into {}", args.out_dir.display()))?;
    Ok(())
}

fn run_components(args: &ComponentsArgs) -> Result<()> {
    let file = File::open(&args.itemsets)
        .with_context(|| format!("failed to open itemsets {}", args.itemsets.display()))?;
    let out = open_output(args.output.as_deref())?;
    components::write_components(BufReader::new(file), out)?;
    Ok(())
}

fn run_lifetime(args: &LifetimeArgs) -> Result<()> {
    lifetime::analyze_lifetimes(&args.phenomena, &args.daily_dir, args.days, &args.out_dir)
        .with_context(|| format!("failed to analyze lifetimes into {}", args.out_dir.display()))?;
    Ok(())
}

fn run_split(args: &SplitArgs) -> Result<()> {
    timesplit::split_by_time(&args.input, args.start, args.window, &args.out_dir)
        .with_context(|| format!("failed to split {}", args.input.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    match &args.command {
        Command::Build(build) => run_build(build),
        Command::Count(count) => run_count(count),
        Command::Components(components) => run_components(components),
        Command::Lifetime(lifetime) => run_lifetime(lifetime),
        Command::Split(split) => run_split(split),
    }
}
