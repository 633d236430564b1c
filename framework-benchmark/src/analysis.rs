//! Latency statistics and per-pair summaries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::programs::ProgramRef;
use crate::runner::RunRecord;

/// Latency summary over the successful runs of one program, in seconds.
///
/// All fields are zero when no run succeeded, so downstream reports never
/// carry NaN or missing values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl LatencyStats {
    /// Compute statistics over a sample set.
    ///
    /// Standard deviation is the sample (n-1) deviation and zero when fewer
    /// than two samples exist.
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let n = samples.len() as f64;
        let avg = samples.iter().sum::<f64>() / n;

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        let std_dev = if samples.len() > 1 {
            let variance = samples.iter().map(|s| (s - avg).powi(2)).sum::<f64>() / (n - 1.0);
            variance.sqrt()
        } else {
            0.0
        };

        Self {
            avg,
            min,
            max,
            median,
            std_dev,
        }
    }
}

/// Aggregate over all runs of one (benchmark, implementation) pair.
///
/// Failed runs count toward the totals but never toward the latency
/// statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub benchmark: String,
    pub implementation: String,
    pub file_path: String,
    pub file_exists: bool,
    pub total_runs: u32,
    pub successful_runs: u32,
    pub failed_runs: u32,
    /// Percentage, zero when no runs were made
    pub success_rate: f64,
    #[serde(flatten)]
    pub stats: LatencyStats,
    pub timestamp: DateTime<Utc>,
}

impl SummaryRecord {
    /// Aggregate the ordered run records of one pair
    pub fn from_runs(program: &ProgramRef, runs: &[RunRecord]) -> Self {
        let total_runs = runs.len() as u32;
        let samples: Vec<f64> = runs
            .iter()
            .filter(|r| r.success)
            .map(|r| r.execution_time)
            .collect();
        let successful_runs = samples.len() as u32;

        let success_rate = if total_runs > 0 {
            (successful_runs as f64 / total_runs as f64) * 100.0
        } else {
            0.0
        };

        Self {
            benchmark: program.benchmark.clone(),
            implementation: program.implementation.clone(),
            file_path: program.path_display(),
            file_exists: program.exists,
            total_runs,
            successful_runs,
            failed_runs: total_runs - successful_runs,
            success_rate,
            stats: LatencyStats::from_samples(&samples),
            timestamp: Utc::now(),
        }
    }

    /// All-zero summary for a program file that does not exist
    pub fn missing_file(program: &ProgramRef) -> Self {
        Self {
            benchmark: program.benchmark.clone(),
            implementation: program.implementation.clone(),
            file_path: program.path_display(),
            file_exists: false,
            total_runs: 0,
            successful_runs: 0,
            failed_runs: 0,
            success_rate: 0.0,
            stats: LatencyStats::default(),
            timestamp: Utc::now(),
        }
    }
}
