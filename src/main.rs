use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use depthfold::binning::IntervalTable;
use depthfold::config::{self, FoldConfig, IntervalConfig};
use depthfold::data::{loader, writer};
use depthfold::pipeline;

/// Interval labels shown in the summary after annotation.
const SUMMARY_ROWS: usize = 20;

#[derive(Parser)]
#[command(name = "depthfold")]
#[command(version)]
#[command(about = "Depth-interval labels and group-aware k-fold splits for spectral data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an 'interval' column based on depth intervals
    AddInterval {
        /// Input table (.csv, .json or .parquet)
        input: PathBuf,

        /// Output CSV; defaults to the input name with '_interval' before the extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Name of the depth column
        #[arg(long, default_value = "Depth")]
        depth_col: String,

        /// JSON file with intervals (list of [start, end]) overriding the defaults
        #[arg(long)]
        intervals_json: Option<PathBuf>,
    },

    /// Generate deterministic group k-fold indices as JSON
    MakeFolds {
        /// Input table (.csv, .json or .parquet)
        #[arg(long)]
        csv: PathBuf,

        /// Output JSON file
        #[arg(long, default_value = "folds_groupkfold_v1.json")]
        out: PathBuf,

        /// Name of the group/interval column
        #[arg(long, default_value = "interval")]
        group_col: String,

        /// Depth column used for stable sorting if present
        #[arg(long, default_value = "depth")]
        depth_col: String,

        /// Target column, excluded from spectral columns
        #[arg(long, default_value = "totalREE")]
        target_col: String,

        /// Number of folds
        #[arg(long, default_value_t = depthfold::folds::DEFAULT_N_SPLITS)]
        n_splits: usize,

        /// Derive the group column from depth intervals instead of reading it
        #[arg(long)]
        from_depth: bool,

        /// JSON file with intervals, used with --from-depth
        #[arg(long)]
        intervals_json: Option<PathBuf>,

        /// Drop rows without a group key before splitting
        #[arg(long)]
        drop_unlabeled: bool,
    },
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_intervals(path: Option<&Path>) -> Result<IntervalTable> {
    match path {
        Some(p) => IntervalTable::load_json(p),
        None => Ok(IntervalTable::default()),
    }
}

fn run_add_interval(input: &Path, output: Option<PathBuf>, config: &IntervalConfig) -> Result<()> {
    let table = load_intervals(config.intervals_json.as_deref())?;
    let mut dataset = loader::load_file(input)?;
    pipeline::annotate_intervals(&mut dataset, &config.depth_col, &table)?;

    let out_path = output.unwrap_or_else(|| config::default_interval_output(input));
    writer::write_csv(&dataset, &out_path)?;
    println!("Saved output with 'interval' column to: {}", out_path.display());

    let counts = pipeline::interval_counts(&dataset)?;
    println!("\n{}", pipeline::format_interval_counts(&counts, SUMMARY_ROWS));
    Ok(())
}

fn run_make_folds(input: &Path, out: &Path, config: &FoldConfig) -> Result<()> {
    if config.intervals_json.is_some() && !config.from_depth {
        log::warn!("--intervals-json is ignored without --from-depth");
    }
    let table = load_intervals(config.intervals_path())?;
    let dataset = loader::load_file(input)?;
    let run = pipeline::make_folds(dataset, config, &table)
        .with_context(|| format!("building folds for {}", input.display()))?;

    writer::write_json(&run.report.folds, out)?;

    let aux_path = config::aux_folds_path(out);
    writer::write_csv(&run.table, &aux_path)?;

    println!("[OK] Wrote JSON folds to: {}", out.display());
    println!("[OK] Wrote auxiliary CSV (per-row fold id) to: {}", aux_path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::AddInterval {
            input,
            output,
            depth_col,
            intervals_json,
        } => {
            let config = IntervalConfig {
                depth_col,
                intervals_json,
            };
            run_add_interval(&input, output, &config)
        }
        Commands::MakeFolds {
            csv,
            out,
            group_col,
            depth_col,
            target_col,
            n_splits,
            from_depth,
            intervals_json,
            drop_unlabeled,
        } => {
            let config = FoldConfig {
                group_col,
                depth_col,
                target_col,
                n_splits,
                from_depth,
                intervals_json,
                drop_unlabeled,
            };
            run_make_folds(&csv, &out, &config)
        }
    }
}
