use data_crosser::frame::{load_table, write_csv};
use data_crosser::{column_name_hints, CrosserConfig, DataCrosser, HintReason, JoinMode, JoinOptions, Suffixes, Table};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "crosser")]
#[command(about = "Discover join keys between two open-data tables, cross them and score the result")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank candidate key column pairs between two tables
    Candidates {
        /// First table (CSV or Parquet)
        table_a: PathBuf,

        /// Second table (CSV or Parquet)
        table_b: PathBuf,

        /// Show only the N best candidates
        #[arg(long)]
        top: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Join two tables on a key pair and report join quality
    Cross {
        table_a: PathBuf,

        table_b: PathBuf,

        /// Key column in the first table
        #[arg(long)]
        left_key: String,

        /// Key column in the second table
        #[arg(long)]
        right_key: String,

        /// Join mode: inner, left, right or outer
        #[arg(long, default_value = "inner")]
        mode: String,

        /// Suffix for colliding columns of the first table
        #[arg(long)]
        suffix_a: Option<String>,

        /// Suffix for colliding columns of the second table
        #[arg(long)]
        suffix_b: Option<String>,

        /// Write the joined table to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },
    /// Suggest crossings across several tables (dataset name = file stem)
    Suggest {
        #[arg(required = true, num_args = 2..)]
        tables: Vec<PathBuf>,

        #[arg(long)]
        json: bool,
    },
    /// Show inferred kind, uniqueness and missing values per column
    Profile {
        table: PathBuf,
    },
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = CrosserConfig::from_env().context("Invalid crosser configuration")?;
    let crosser = DataCrosser::with_config(config);

    match args.command {
        Commands::Candidates { table_a, table_b, top, json } => {
            run_candidates(&crosser, &table_a, &table_b, top, json)
        }
        Commands::Cross {
            table_a,
            table_b,
            left_key,
            right_key,
            mode,
            suffix_a,
            suffix_b,
            output,
            json,
        } => {
            let mode: JoinMode = mode.parse()?;
            let (default_a, default_b) = crosser.config().default_suffixes.clone();
            let options = JoinOptions::new(mode).with_suffixes(Suffixes::new(
                suffix_a.unwrap_or(default_a),
                suffix_b.unwrap_or(default_b),
            ));
            run_cross(&crosser, &table_a, &table_b, &left_key, &right_key, &options, output, json)
        }
        Commands::Suggest { tables, json } => run_suggest(&crosser, &tables, json),
        Commands::Profile { table } => run_profile(&table),
    }
}

fn load(path: &Path) -> Result<Table> {
    info!("Loading table from {:?}", path);
    load_table(path).with_context(|| format!("Failed to load table {}", path.display()))
}

fn run_candidates(crosser: &DataCrosser, path_a: &Path, path_b: &Path, top: Option<usize>, json: bool) -> Result<()> {
    let table_a = load(path_a)?;
    let table_b = load(path_b)?;

    let mut candidates = crosser.discover(&table_a, &table_b);
    if let Some(n) = top {
        candidates.truncate(n);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!(" KEY CANDIDATES");
    println!("{}", "=".repeat(80));

    if candidates.is_empty() {
        println!("\nNo candidates found. Pick the key columns manually.");
        let hints = column_name_hints(&table_a, &table_b, crosser.config());
        if !hints.is_empty() {
            println!("\nColumns with related names:");
            for hint in &hints {
                let reason = match &hint.reason {
                    HintReason::SameName => "same name".to_string(),
                    HintReason::Keyword { family } => format!("both look like '{}'", family),
                    HintReason::SimilarName { similarity } => format!("similar names ({:.2})", similarity),
                };
                println!("   {} <-> {}  [{}]", hint.left_column, hint.right_column, reason);
            }
        }
        return Ok(());
    }

    for (i, candidate) in candidates.iter().enumerate() {
        println!(
            "   {}. {} <-> {}  score {:.1}%",
            i + 1,
            candidate.left_column,
            candidate.right_column,
            candidate.score * 100.0
        );
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_cross(
    crosser: &DataCrosser,
    path_a: &Path,
    path_b: &Path,
    left_key: &str,
    right_key: &str,
    options: &JoinOptions,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let table_a = load(path_a)?;
    let table_b = load(path_b)?;

    let crossing = crosser.cross(&table_a, &table_b, left_key, right_key, options)?;

    if let Some(path) = output {
        write_csv(&crossing.table, &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Crossing written to {:?}", path);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&crossing.report)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!(" CROSSING: {} = {} ({} join)", left_key, right_key, options.mode);
    println!("{}", "=".repeat(80));
    println!("{}", crossing.report);
    println!("\nColumns: {}", crossing.table.column_names().join(", "));
    Ok(())
}

fn run_suggest(crosser: &DataCrosser, paths: &[PathBuf], json: bool) -> Result<()> {
    let mut loaded = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        loaded.push((name, load(path)?));
    }

    let datasets: Vec<(&str, &Table)> = loaded.iter().map(|(n, t)| (n.as_str(), t)).collect();
    let suggestions = data_crosser::suggest_crossings(&datasets, crosser.config());

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!("No crossing suggestions above score {:.2}.", crosser.config().suggestion_min_score);
    }
    for suggestion in &suggestions {
        println!("   {}", suggestion.description);
    }
    Ok(())
}

fn run_profile(path: &Path) -> Result<()> {
    let table = load(path)?;

    println!("{} rows, {} columns\n", table.height(), table.width());
    println!("{:<32} {:<10} {:>10} {:>8}", "column", "kind", "unique", "missing");
    for column in table.columns() {
        println!(
            "{:<32} {:<10} {:>9.1}% {:>8}",
            column.name(),
            column.kind().as_str(),
            column.uniqueness_ratio() * 100.0,
            column.missing_count()
        );
    }
    Ok(())
}
