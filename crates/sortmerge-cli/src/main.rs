//! sortmerge CLI: run, index, validate and explain merge join jobs.

use clap::{Parser, Subcommand};
use sortmerge_core::config::{JoinConfig, JoinMode};
use sortmerge_exec::JobSpec;
use sortmerge_io::location::resolve_path;
use sortmerge_io::CsvSortedSource;
use sortmerge_operators::Operator;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sortmerge")]
#[command(about = "Map-side sort-merge join over pre-sorted inputs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a join job from a YAML file
    Run {
        /// Path to the job YAML file
        #[arg(short, long)]
        job: PathBuf,

        /// Join mode: dense or sparse (overrides job and environment)
        #[arg(long)]
        mode: Option<JoinMode>,

        /// Sparse index file for the right side (overrides job and environment)
        #[arg(long)]
        index_file: Option<String>,

        /// Initial capacity of the left run buffer
        #[arg(long)]
        buffer_capacity: Option<usize>,

        /// Write the run manifest as JSON to this path
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// Build a sparse index for the job's right-side file
    Index {
        /// Path to the job YAML file
        #[arg(short, long)]
        job: PathBuf,

        /// Where to write the index (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Rows between index entries (overrides job)
        #[arg(long)]
        interval: Option<usize>,
    },

    /// Validate a job YAML file without reading any data
    Validate {
        /// Path to the job YAML file
        #[arg(short, long)]
        job: PathBuf,
    },

    /// Show how a job would be executed
    Explain {
        /// Path to the job YAML file
        #[arg(short, long)]
        job: PathBuf,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            job,
            mode,
            index_file,
            buffer_capacity,
            manifest,
        } => run_job(
            &job,
            Overrides {
                mode,
                index_file,
                buffer_capacity,
            },
            manifest.as_deref(),
        ),
        Commands::Index {
            job,
            output,
            interval,
        } => build_index(&job, &output, interval),
        Commands::Validate { job } => validate_job(&job).map(|_| println!("✓ Job is valid")),
        Commands::Explain { job } => explain_job(&job),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Command-line settings that win over both the job file and the environment.
#[derive(Debug, Default)]
struct Overrides {
    mode: Option<JoinMode>,
    index_file: Option<String>,
    buffer_capacity: Option<usize>,
}

fn apply_overrides(mut config: JoinConfig, o: Overrides) -> JoinConfig {
    if let Some(mode) = o.mode {
        config.mode = mode;
    }
    if let Some(idx) = o.index_file {
        config.right.index_file = Some(idx);
    }
    if let Some(cap) = o.buffer_capacity {
        config.buffer_capacity = cap;
    }
    config
}

fn run_job(
    job_path: &Path,
    overrides: Overrides,
    manifest_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let job = JobSpec::from_path(job_path)?;
    let config = apply_overrides(job.join_config()?.from_env(), overrides);
    let manifest = job.run(&config)?;

    println!("✓ Join executed successfully");
    println!("  Rows emitted: {}", manifest.stats.rows_emitted);
    println!(
        "  Left rows: {} ({} null keys)",
        manifest.stats.left_rows, manifest.stats.left_null_keys
    );
    println!(
        "  Right rows: {} ({} null keys)",
        manifest.stats.right_rows, manifest.stats.right_null_keys
    );
    println!("  Seeks: {}", manifest.stats.seeks);
    println!(
        "  Duration: {}ms",
        manifest.finished_ms.saturating_sub(manifest.started_ms)
    );
    println!("  Config hash: {}", manifest.config_hash);

    if let Some(path) = manifest_path {
        fs::write(path, serde_json::to_string_pretty(&manifest)?)?;
        println!("  Manifest: {}", path.display());
    }
    Ok(())
}

fn build_index(
    job_path: &Path,
    output: &Path,
    interval: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let job = JobSpec::from_path(job_path)?;
    let interval = interval.unwrap_or_else(|| job.index_interval());
    let path = resolve_path(&job.right.source)?;
    let index = CsvSortedSource::build_index(
        &path,
        &job.right_source_schema(),
        &job.right_source_key()?,
        interval,
    )?;
    index.write(output)?;
    println!(
        "✓ Indexed {} ({} entries, every {} rows) -> {}",
        path.display(),
        index.len(),
        index.interval,
        output.display()
    );
    Ok(())
}

fn validate_job(job_path: &Path) -> Result<JobSpec, Box<dyn std::error::Error>> {
    let job = JobSpec::from_path(job_path)?;
    let config = job.join_config()?;
    // Builds the transform pipeline and plans the join; no file is opened.
    job.build_engine(&config)?;
    Ok(job)
}

fn explain_job(job_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let job = validate_job(job_path)?;
    let config = job.join_config()?.from_env();
    let engine = job.build_engine(&config)?;
    let plan = engine.plan(&[job.left_schema(), job.right_schema()?])?;

    println!("Join Execution Plan");
    println!("===================");
    println!();
    println!("Operator: {}", engine.name());
    println!("Signature: {}", config.signature()?);
    println!("Buffer capacity: {} rows", config.buffer_capacity);
    println!();
    println!("Left: {}", job.left.source);
    println!("  Key: {}", job.left.key.join(", "));
    println!("Right: {}", job.right.source);
    println!("  Key: {}", job.right.key.join(", "));
    match &config.right.index_file {
        Some(idx) => println!("  Index: {}", idx),
        None => println!("  Index: built on open (every {} rows)", job.index_interval()),
    }
    if let Some(expr) = &job.right.filter {
        println!("  Filter: {}", expr);
    }
    if let Some(cols) = &job.right.project {
        println!("  Project: {}", cols.join(", "));
    }
    println!();
    println!("Output: {} ({})", job.output.destination, job.output.format);
    for (i, f) in plan.output_schema.fields.iter().enumerate() {
        println!(
            "  {}. {} {:?}{}",
            i + 1,
            f.name,
            f.data_type,
            if f.nullable { " (nullable)" } else { "" }
        );
    }
    Ok(())
}
