//! Benchmark harness for LLM orchestration frameworks
//!
//! This crate compares implementations of the same question-answering and
//! reasoning benchmarks across several LLM orchestration frameworks. Each
//! benchmark program is an independent script invoking a hosted model; the
//! harness runs every program as a child process a fixed number of times,
//! measures wall-clock latency and success/failure, and streams per-run and
//! aggregated rows to CSV reports.
//!
//! # Features
//!
//! - Directory-convention discovery of (benchmark, implementation) pairs
//! - A total run driver: timeouts, spawn failures and non-zero exits all
//!   become recorded rows, never harness errors
//! - Latency statistics (avg/min/max/median/std-dev) over successful runs
//! - Streaming CSV reports that survive a crash mid-sweep
//! - A variant-trials mode for sensitivity experiments
//!
//! # Example
//!
//! ```no_run
//! use framework_benchmark::{
//!     config::SweepConfig,
//!     reporting::SweepReports,
//!     sweep::Sweep,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SweepConfig::load_or_default();
//!     std::fs::create_dir_all(&config.output_dir)?;
//!
//!     let output_dir = std::path::PathBuf::from(&config.output_dir);
//!     let mut reports = SweepReports::create(&output_dir, "20250101_000000")?;
//!     let (totals, summaries) = Sweep::new(config).execute(&mut reports).await?;
//!
//!     println!("{} pairs processed, {} missing", totals.processed, totals.missing);
//!     framework_benchmark::reporting::print_console_report(&summaries);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod programs;
pub mod reporting;
pub mod runner;
pub mod sweep;
pub mod trials;

pub use config::SweepConfig;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::analysis::{LatencyStats, SummaryRecord};
    pub use crate::config::{ConfigError, ImplementationConfig, SweepConfig};
    pub use crate::programs::{discover_benchmarks, program_path, resolve, ProgramRef};
    pub use crate::reporting::{
        print_console_report, CsvWriter, JsonSummary, ReportError, SweepReports,
    };
    pub use crate::runner::{DriverConfig, RunDriver, RunRecord};
    pub use crate::sweep::{Sweep, SweepError, SweepTotals};
    pub use crate::trials::{run_trials, TrialTotals, TrialsError};
}
