//! Framework Benchmark CLI

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use framework_benchmark::{
    config::SweepConfig,
    programs,
    reporting::{print_console_report, CsvWriter, JsonSummary, SweepReports},
    runner::{DriverConfig, RunDriver},
    sweep::Sweep,
    trials::{self, TRIALS_HEADER},
};

#[derive(Parser)]
#[command(name = "framework-benchmark")]
#[command(about = "Latency and reliability benchmark for LLM orchestration frameworks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a full benchmark sweep
    Run {
        /// Benchmarks root directory (overrides configuration)
        #[arg(long)]
        benchmarks_root: Option<PathBuf>,

        /// Comma-separated implementation tags to run (default: all configured)
        #[arg(long = "impl")]
        implementations: Option<String>,

        /// Runs per program (overrides configuration)
        #[arg(long)]
        runs: Option<u32>,

        /// Output directory for reports (overrides configuration)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Model identifier exported to programs as MODEL_NAME
        #[arg(long)]
        model: Option<String>,

        /// Skip the overwrite confirmation for an existing output directory
        #[arg(short = 'y', long = "yes")]
        assume_yes: bool,
    },

    /// Run every program variant in a directory repeatedly
    Trials {
        /// Directory holding the variant programs
        #[arg(short, long)]
        dir: PathBuf,

        /// Implementation tag selecting the interpreter
        #[arg(long = "impl", default_value = "mtllm")]
        implementation: String,

        /// Variant file extension (default: the implementation's)
        #[arg(long)]
        ext: Option<String>,

        /// Trials per variant
        #[arg(long, default_value = "50")]
        trials: u32,

        /// Output directory for the trials report (overrides configuration)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List discovered benchmark programs without running them
    ListBenchmarks {
        /// Benchmarks root directory (overrides configuration)
        #[arg(long)]
        benchmarks_root: Option<PathBuf>,
    },

    /// Generate a sample configuration file
    InitConfig {
        /// Output path for the configuration file
        #[arg(short, long, default_value = "config/benchmark.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("framework_benchmark=debug,info")
    } else {
        EnvFilter::new("framework_benchmark=info,warn")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Run {
            benchmarks_root,
            implementations,
            runs,
            output,
            model,
            assume_yes,
        } => {
            run_sweep(
                config,
                benchmarks_root,
                implementations,
                runs,
                output,
                model,
                assume_yes,
            )
            .await?;
        }

        Commands::Trials {
            dir,
            implementation,
            ext,
            trials,
            output,
        } => {
            run_trials(config, dir, implementation, ext, trials, output).await?;
        }

        Commands::ListBenchmarks { benchmarks_root } => {
            list_benchmarks(config, benchmarks_root)?;
        }

        Commands::InitConfig { output } => {
            init_config(output)?;
        }
    }

    Ok(())
}

/// Load the configuration. An explicitly named file that does not exist is
/// an operator error; without `--config` the default locations are probed.
fn load_config(path: Option<&Path>) -> SweepConfig {
    match path {
        Some(path) => {
            if !path.exists() {
                eprintln!("Error: Config file not found: {}", path.display());
                std::process::exit(1);
            }
            match SweepConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: Failed to load {}: {}", path.display(), e);
                    std::process::exit(1);
                }
            }
        }
        None => SweepConfig::load_or_default(),
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_sweep(
    mut config: SweepConfig,
    benchmarks_root: Option<PathBuf>,
    implementations: Option<String>,
    runs: Option<u32>,
    output: Option<PathBuf>,
    model: Option<String>,
    assume_yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // CLI overrides
    if let Some(root) = benchmarks_root {
        config.benchmarks_root = root.display().to_string();
    }
    if let Some(runs) = runs {
        config.num_runs = runs;
    }
    if let Some(output) = output {
        config.output_dir = output.display().to_string();
    }
    if let Some(model) = model {
        config.model = Some(model);
    }
    if let Some(tags) = implementations {
        let tags: Vec<String> = tags.split(',').map(|t| t.trim().to_string()).collect();
        if let Err(e) = config.retain_implementations(&tags) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    let started_at = Utc::now();
    let run_id = started_at.format("%Y%m%d_%H%M%S").to_string();

    println!("=== Framework Benchmark Sweep ===");
    println!("Run ID: {}", run_id);
    println!(
        "Implementations: {}",
        config
            .implementations
            .iter()
            .map(|i| i.tag.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Runs per program: {}", config.num_runs);
    if let Some(model) = &config.model {
        println!("Model: {}", model);
    }
    println!();

    let output_dir = PathBuf::from(&config.output_dir);
    if output_dir.exists() && !assume_yes && !confirm_overwrite(&output_dir) {
        println!("Exiting...");
        std::process::exit(1);
    }
    std::fs::create_dir_all(&output_dir)?;

    let mut reports = SweepReports::create(&output_dir, &run_id)?;
    println!("Detailed results: {}", reports.detailed_path().display());
    println!("Summary results: {}", reports.summary_path().display());

    let sweep = Sweep::new(config);
    let (totals, summaries) = sweep.execute(&mut reports).await?;

    print_console_report(&summaries);

    let json_path = output_dir.join(format!("sweep_summary_{}.json", run_id));
    let summary = JsonSummary::from_summaries(&run_id, started_at, &summaries, &reports);
    summary.write_to_file(&json_path)?;

    println!(
        "\n{} pairs: {} processed, {} missing",
        totals.pairs, totals.processed, totals.missing
    );
    println!("JSON summary written to: {}", json_path.display());

    Ok(())
}

/// Ask before reusing an existing output directory
fn confirm_overwrite(dir: &Path) -> bool {
    print!(
        "Output directory {} exists. Do you want to overwrite it? (y/n) ",
        dir.display()
    );
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    answer.trim().eq_ignore_ascii_case("y")
}

async fn run_trials(
    config: SweepConfig,
    dir: PathBuf,
    implementation: String,
    ext: Option<String>,
    trials: u32,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(implementation) = config.implementation(&implementation).cloned() else {
        eprintln!("Error: Unknown implementation tag: {}", implementation);
        std::process::exit(1);
    };
    let extension = ext.unwrap_or_else(|| implementation.extension.clone());

    let output_dir = output.unwrap_or_else(|| PathBuf::from(&config.output_dir));
    std::fs::create_dir_all(&output_dir)?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let out_path = output_dir.join(format!("sensitivity_trials_{}.csv", timestamp));

    println!("=== Variant Trials ===");
    println!("Directory: {}", dir.display());
    println!("Implementation: {} (.{})", implementation.tag, extension);
    println!("Trials per variant: {}", trials);
    println!();

    let driver = RunDriver::new(DriverConfig {
        timeout: std::time::Duration::from_secs(config.timeout_secs),
        pause_between_runs: std::time::Duration::from_millis(config.pause_between_runs_ms),
        model: config.model.clone(),
        disable_response_cache: config.disable_response_cache,
    });

    let file = std::fs::File::create(&out_path)?;
    let mut out = CsvWriter::new(file, TRIALS_HEADER)?;
    let totals = trials::run_trials(
        &driver,
        &implementation.command,
        &implementation.tag,
        &dir,
        &extension,
        trials,
        &mut out,
    )
    .await?;

    println!(
        "\n{} variants, {} trials recorded",
        totals.variants, totals.trials
    );
    println!("Trials written to: {}", out_path.display());

    Ok(())
}

fn list_benchmarks(
    config: SweepConfig,
    benchmarks_root: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = benchmarks_root.unwrap_or_else(|| PathBuf::from(&config.benchmarks_root));
    let benchmarks = programs::discover_benchmarks(&root)?;

    println!("Benchmarks under {} ({}):", root.display(), benchmarks.len());
    println!("{:-<60}", "");

    for benchmark in &benchmarks {
        for implementation in &config.implementations {
            let program = programs::resolve(&root, benchmark, implementation);
            let marker = if program.exists { "ok" } else { "missing" };
            println!(
                "  {} | {:<8} | {:<7} | {}",
                benchmark,
                implementation.tag,
                marker,
                program.path.display()
            );
        }
    }

    Ok(())
}

fn init_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = SweepConfig::default();

    // Ensure parent directory exists
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    config.save_toml(&output)?;
    println!("Configuration written to: {}", output.display());
    Ok(())
}
