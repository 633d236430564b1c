//! Sweep orchestration
//!
//! One sweep walks every (benchmark, implementation) pair in order, drives
//! the configured number of runs for each existing program, and streams
//! rows to the open reports. Nothing is retained across pairs. A run-level
//! failure never aborts the sweep; only an operator interrupt does.

use std::path::Path;
use std::time::Duration;

use crate::analysis::SummaryRecord;
use crate::config::SweepConfig;
use crate::programs;
use crate::reporting::{ReportError, SweepReports};
use crate::runner::{DriverConfig, RunDriver, RunRecord};

/// Sweep-level errors: only setup problems, never run outcomes
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("Failed to enumerate benchmarks under {root}: {source}")]
    Discover {
        root: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Counters describing one completed sweep
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepTotals {
    pub pairs: usize,
    pub processed: usize,
    pub missing: usize,
}

/// Executes one benchmarking pass over all pairs
pub struct Sweep {
    config: SweepConfig,
    driver: RunDriver,
}

impl Sweep {
    pub fn new(config: SweepConfig) -> Self {
        let driver = RunDriver::new(DriverConfig {
            timeout: Duration::from_secs(config.timeout_secs),
            pause_between_runs: Duration::from_millis(config.pause_between_runs_ms),
            model: config.model.clone(),
            disable_response_cache: config.disable_response_cache,
        });
        Self { config, driver }
    }

    /// Run the full sweep, streaming every row to the reports as produced
    pub async fn execute(
        &self,
        reports: &mut SweepReports,
    ) -> Result<(SweepTotals, Vec<SummaryRecord>), SweepError> {
        let root = Path::new(&self.config.benchmarks_root);
        let benchmarks = programs::discover_benchmarks(root).map_err(|source| {
            SweepError::Discover {
                root: self.config.benchmarks_root.clone(),
                source,
            }
        })?;

        tracing::info!(
            "Starting sweep: {} benchmarks x {} implementations, {} runs each",
            benchmarks.len(),
            self.config.implementations.len(),
            self.config.num_runs
        );

        let mut totals = SweepTotals::default();
        let mut summaries = Vec::new();

        for benchmark in &benchmarks {
            for implementation in &self.config.implementations {
                totals.pairs += 1;
                let program = programs::resolve(root, benchmark, implementation);
                tracing::info!(
                    "Processing {}: {} - {}",
                    totals.pairs,
                    benchmark,
                    implementation.tag
                );

                if !program.exists {
                    tracing::warn!("File not found: {}", program.path.display());
                    totals.missing += 1;

                    reports.record_run(&RunRecord::missing_file(&program))?;
                    let summary = SummaryRecord::missing_file(&program);
                    reports.record_summary(&summary)?;
                    summaries.push(summary);
                    continue;
                }

                totals.processed += 1;
                let runs = self
                    .driver
                    .run_many(&program, &implementation.command, self.config.num_runs)
                    .await;

                for run in &runs {
                    reports.record_run(run)?;
                }

                let summary = SummaryRecord::from_runs(&program, &runs);
                reports.record_summary(&summary)?;

                tracing::info!(
                    "Completed {}-{}: {}/{} successful (Success rate: {:.1}%)",
                    benchmark,
                    implementation.tag,
                    summary.successful_runs,
                    summary.total_runs,
                    summary.success_rate
                );
                if summary.successful_runs > 0 {
                    tracing::info!(
                        "  Avg time: {:.2}s, Min: {:.2}s, Max: {:.2}s",
                        summary.stats.avg,
                        summary.stats.min,
                        summary.stats.max
                    );
                }

                summaries.push(summary);
            }
        }

        tracing::info!(
            "Sweep complete: {} pairs, {} processed, {} missing",
            totals.pairs,
            totals.processed,
            totals.missing
        );

        Ok((totals, summaries))
    }
}
