//! Results reporting
//!
//! Two CSV destinations per sweep (per-run detail and per-pair summary),
//! plus a console ranking report and a JSON sweep summary.

pub mod csv;

pub use csv::{run_record_fields, summary_record_fields, CsvWriter, DETAILED_HEADER, SUMMARY_HEADER};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::analysis::SummaryRecord;
use crate::runner::RunRecord;

/// Reporting errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Row has {got} fields, header declares {expected}")]
    ColumnCount { expected: usize, got: usize },

    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// The two open CSV reports of one sweep
pub struct SweepReports {
    detailed: CsvWriter<File>,
    summary: CsvWriter<File>,
    detailed_path: PathBuf,
    summary_path: PathBuf,
}

impl SweepReports {
    /// Open both report files and write their headers
    pub fn create(output_dir: &Path, run_id: &str) -> Result<Self, ReportError> {
        let detailed_path = output_dir.join(format!("benchmark_detailed_results_{}.csv", run_id));
        let summary_path = output_dir.join(format!("benchmark_summary_results_{}.csv", run_id));

        let detailed = CsvWriter::new(File::create(&detailed_path)?, DETAILED_HEADER)?;
        let summary = CsvWriter::new(File::create(&summary_path)?, SUMMARY_HEADER)?;

        Ok(Self {
            detailed,
            summary,
            detailed_path,
            summary_path,
        })
    }

    /// Append one run to the detailed report
    pub fn record_run(&mut self, record: &RunRecord) -> Result<(), ReportError> {
        self.detailed.write_row(&run_record_fields(record))
    }

    /// Append one pair summary to the summary report
    pub fn record_summary(&mut self, record: &SummaryRecord) -> Result<(), ReportError> {
        self.summary.write_row(&summary_record_fields(record))
    }

    pub fn detailed_path(&self) -> &Path {
        &self.detailed_path
    }

    pub fn summary_path(&self) -> &Path {
        &self.summary_path
    }
}

/// Per-pair outcome in the JSON sweep summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairOutcome {
    pub benchmark: String,
    pub implementation: String,
    pub file_exists: bool,
    pub success_rate: f64,
    pub avg_execution_time: f64,
}

/// JSON export written next to the CSV reports at the end of a sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub run_id: String,
    pub started_at: String,
    pub completed_at: String,
    pub total_pairs: usize,
    pub pairs_missing: usize,
    pub detailed_results_file: String,
    pub summary_results_file: String,
    pub outcomes: Vec<PairOutcome>,
}

impl JsonSummary {
    /// Build from the sweep's summary records, best outcomes first
    pub fn from_summaries(
        run_id: impl Into<String>,
        started_at: chrono::DateTime<chrono::Utc>,
        summaries: &[SummaryRecord],
        reports: &SweepReports,
    ) -> Self {
        let mut outcomes: Vec<PairOutcome> = summaries
            .iter()
            .map(|s| PairOutcome {
                benchmark: s.benchmark.clone(),
                implementation: s.implementation.clone(),
                file_exists: s.file_exists,
                success_rate: s.success_rate,
                avg_execution_time: s.stats.avg,
            })
            .collect();

        // Highest success rate first, faster average breaking ties
        outcomes.sort_by(|a, b| {
            b.success_rate
                .partial_cmp(&a.success_rate)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    a.avg_execution_time
                        .partial_cmp(&b.avg_execution_time)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
        });

        Self {
            run_id: run_id.into(),
            started_at: started_at.to_rfc3339(),
            completed_at: chrono::Utc::now().to_rfc3339(),
            total_pairs: summaries.len(),
            pairs_missing: summaries.iter().filter(|s| !s.file_exists).count(),
            detailed_results_file: reports.detailed_path().display().to_string(),
            summary_results_file: reports.summary_path().display().to_string(),
            outcomes,
        }
    }

    /// Write to a JSON file
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| ReportError::Serialize(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Print the end-of-sweep report: per-pair outcomes and an implementation
/// ranking by mean success rate
pub fn print_console_report(summaries: &[SummaryRecord]) {
    println!("\n=== Benchmark Sweep Results ===\n");
    println!("Pairs: {}\n", summaries.len());

    println!(
        "{:<20} {:<8} {:>8} {:>10} {:>10}",
        "Benchmark", "Impl", "Runs", "Success", "Avg (s)"
    );
    println!("{:-<60}", "");
    for s in summaries {
        if s.file_exists {
            println!(
                "{:<20} {:<8} {:>8} {:>9.1}% {:>10.2}",
                s.benchmark, s.implementation, s.total_runs, s.success_rate, s.stats.avg
            );
        } else {
            println!(
                "{:<20} {:<8} {:>8} {:>10} {:>10}",
                s.benchmark, s.implementation, "-", "missing", "-"
            );
        }
    }

    // Implementation ranking over pairs whose program file existed
    let mut by_impl: HashMap<&str, Vec<&SummaryRecord>> = HashMap::new();
    for s in summaries.iter().filter(|s| s.file_exists) {
        by_impl.entry(&s.implementation).or_default().push(s);
    }

    if !by_impl.is_empty() {
        let mut rankings: Vec<(&str, f64, f64)> = by_impl
            .iter()
            .map(|(implementation, records)| {
                let n = records.len() as f64;
                let rate = records.iter().map(|s| s.success_rate).sum::<f64>() / n;
                let avg = records.iter().map(|s| s.stats.avg).sum::<f64>() / n;
                (*implementation, rate, avg)
            })
            .collect();
        rankings.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        println!("\nImplementation Rankings:");
        println!("{:-<60}", "");
        for (i, (implementation, rate, avg)) in rankings.iter().enumerate() {
            println!(
                "  {}. {} - Success Rate: {:.1}%, Avg Time: {:.2}s",
                i + 1,
                implementation,
                rate,
                avg
            );
        }
    }

    println!("\n{:=<60}", "");
}
