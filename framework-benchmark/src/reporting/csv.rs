//! Streaming CSV serialization
//!
//! Rows are written and flushed as they are produced, so a crash partway
//! through a long sweep preserves every row recorded so far. Fields are
//! quoted RFC 4180 style because stdout and stderr are free-form text.

use std::io::Write;

use super::ReportError;
use crate::analysis::SummaryRecord;
use crate::runner::RunRecord;

/// Column set of the detailed per-run report
pub const DETAILED_HEADER: &[&str] = &[
    "benchmark",
    "implementation",
    "file_path",
    "run_number",
    "file_exists",
    "success",
    "execution_time",
    "return_code",
    "command",
    "stdout",
    "stderr",
    "timestamp",
];

/// Column set of the aggregated summary report
pub const SUMMARY_HEADER: &[&str] = &[
    "benchmark",
    "implementation",
    "file_path",
    "file_exists",
    "total_runs",
    "successful_runs",
    "failed_runs",
    "success_rate",
    "avg_execution_time",
    "min_execution_time",
    "max_execution_time",
    "median_execution_time",
    "std_execution_time",
    "timestamp",
];

/// Streaming CSV writer with a fixed column set declared once
pub struct CsvWriter<W: Write> {
    out: W,
    columns: usize,
}

impl<W: Write> CsvWriter<W> {
    /// Create a writer and emit the header row
    pub fn new(mut out: W, header: &[&str]) -> Result<Self, ReportError> {
        writeln!(out, "{}", header.join(","))?;
        out.flush()?;
        Ok(Self {
            out,
            columns: header.len(),
        })
    }

    /// Append one row and flush it; the field count must match the header
    pub fn write_row(&mut self, fields: &[String]) -> Result<(), ReportError> {
        if fields.len() != self.columns {
            return Err(ReportError::ColumnCount {
                expected: self.columns,
                got: fields.len(),
            });
        }
        let line: Vec<String> = fields.iter().map(|f| escape(f)).collect();
        writeln!(self.out, "{}", line.join(","))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Quote a field when it contains a delimiter, quote or line break
fn escape(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render a run record in detailed-report column order
pub fn run_record_fields(record: &RunRecord) -> Vec<String> {
    vec![
        record.benchmark.clone(),
        record.implementation.clone(),
        record.file_path.clone(),
        record.run_number.to_string(),
        record.file_exists.to_string(),
        record.success.to_string(),
        record.execution_time.to_string(),
        record.return_code.to_string(),
        record.command.clone(),
        record.stdout.clone(),
        record.stderr.clone(),
        record.timestamp.to_rfc3339(),
    ]
}

/// Render a summary record in summary-report column order
pub fn summary_record_fields(record: &SummaryRecord) -> Vec<String> {
    vec![
        record.benchmark.clone(),
        record.implementation.clone(),
        record.file_path.clone(),
        record.file_exists.to_string(),
        record.total_runs.to_string(),
        record.successful_runs.to_string(),
        record.failed_runs.to_string(),
        record.success_rate.to_string(),
        record.stats.avg.to_string(),
        record.stats.min.to_string(),
        record.stats.max.to_string(),
        record.stats.median.to_string(),
        record.stats.std_dev.to_string(),
        record.timestamp.to_rfc3339(),
    ]
}
