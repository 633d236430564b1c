//! Subprocess execution and per-run records

pub mod driver;

pub use driver::{DriverConfig, RunDriver};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::programs::ProgramRef;

/// Exit code recorded when the child never produced one: timeout, spawn
/// failure, missing program file, or termination by signal.
pub const NO_EXIT_CODE: i64 = -1;

/// One execution attempt of a benchmark program.
///
/// Created by the run driver (or synthesized for a missing file) and never
/// mutated afterward; the report writer consumes it row by row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub benchmark: String,
    pub implementation: String,
    pub file_path: String,
    pub run_number: u32,
    pub file_exists: bool,
    /// Exit code zero
    pub success: bool,
    /// Wall-clock seconds around the invocation
    pub execution_time: f64,
    pub return_code: i64,
    /// Rendered command line, `N/A` when nothing was executed
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub timestamp: DateTime<Utc>,
}

impl RunRecord {
    /// Synthetic record for a program file that does not exist
    pub fn missing_file(program: &ProgramRef) -> Self {
        Self {
            benchmark: program.benchmark.clone(),
            implementation: program.implementation.clone(),
            file_path: program.path_display(),
            run_number: 1,
            file_exists: false,
            success: false,
            execution_time: 0.0,
            return_code: NO_EXIT_CODE,
            command: "N/A".to_string(),
            stdout: String::new(),
            stderr: "File not found".to_string(),
            timestamp: Utc::now(),
        }
    }
}
