//! Variant trials
//!
//! Runs every program variant found in one directory repeatedly through the
//! run driver and records one row per trial. Used to measure how sensitive a
//! single benchmark is to run-to-run variation across program variants.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::programs::ProgramRef;
use crate::reporting::{CsvWriter, ReportError};
use crate::runner::RunDriver;

/// Column set of the trials report
pub const TRIALS_HEADER: &[&str] = &[
    "variant",
    "trial",
    "success",
    "execution_time",
    "return_code",
    "output",
    "error",
    "timestamp",
];

/// Trial-mode errors
#[derive(Debug, thiserror::Error)]
pub enum TrialsError {
    #[error("Failed to enumerate variants under {dir}: {source}")]
    Discover {
        dir: String,
        source: std::io::Error,
    },

    #[error("No .{extension} variants found under {dir}")]
    Empty { dir: String, extension: String },

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Counters describing one completed trials pass
#[derive(Debug, Clone, Copy, Default)]
pub struct TrialTotals {
    pub variants: usize,
    pub trials: usize,
}

/// List variant program files with the given extension, sorted
pub fn discover_variants(dir: &Path, extension: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut variants = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().map(|e| e == extension).unwrap_or(false) {
            variants.push(path);
        }
    }
    variants.sort();
    Ok(variants)
}

/// Run every variant `trials` times, streaming one row per trial
pub async fn run_trials<W: Write>(
    driver: &RunDriver,
    command: &[String],
    implementation_tag: &str,
    dir: &Path,
    extension: &str,
    trials: u32,
    out: &mut CsvWriter<W>,
) -> Result<TrialTotals, TrialsError> {
    let variants = discover_variants(dir, extension).map_err(|source| TrialsError::Discover {
        dir: dir.display().to_string(),
        source,
    })?;
    if variants.is_empty() {
        return Err(TrialsError::Empty {
            dir: dir.display().to_string(),
            extension: extension.to_string(),
        });
    }

    let mut totals = TrialTotals::default();

    for path in variants {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        tracing::info!("Running variant {}", path.display());

        let program = ProgramRef {
            benchmark: name.clone(),
            implementation: implementation_tag.to_string(),
            path,
            exists: true,
        };

        let runs = driver.run_many(&program, command, trials).await;
        for run in &runs {
            out.write_row(&[
                name.clone(),
                run.run_number.to_string(),
                run.success.to_string(),
                run.execution_time.to_string(),
                run.return_code.to_string(),
                run.stdout.clone(),
                run.stderr.clone(),
                run.timestamp.to_rfc3339(),
            ])?;
            totals.trials += 1;
        }
        totals.variants += 1;
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{DriverConfig, RunDriver};
    use std::time::Duration;

    fn quick_driver() -> RunDriver {
        RunDriver::new(DriverConfig {
            timeout: Duration::from_secs(5),
            pause_between_runs: Duration::from_millis(1),
            model: None,
            disable_response_cache: false,
        })
    }

    #[test]
    fn test_discover_variants_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_variant.sh"), "echo b\n").unwrap();
        std::fs::write(dir.path().join("a_variant.sh"), "echo a\n").unwrap();
        std::fs::write(dir.path().join("readme.md"), "not a variant").unwrap();

        let variants = discover_variants(dir.path(), "sh").unwrap();
        let names: Vec<_> = variants
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a_variant.sh", "b_variant.sh"]);
    }

    #[tokio::test]
    async fn test_trials_record_every_variant_and_trial() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.sh"), "echo ok\n").unwrap();
        std::fs::write(dir.path().join("bad.sh"), "exit 2\n").unwrap();

        let mut buf = Vec::new();
        let mut out = CsvWriter::new(&mut buf, TRIALS_HEADER).unwrap();
        let command = vec!["sh".to_string()];
        let totals = run_trials(&quick_driver(), &command, "sh", dir.path(), "sh", 2, &mut out)
            .await
            .unwrap();

        assert_eq!(totals.variants, 2);
        assert_eq!(totals.trials, 4);

        drop(out);
        let text = String::from_utf8(buf).unwrap();
        // Header plus one row per trial
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("good,1,true,"));
        assert!(text.contains("bad,2,false,"));
    }

    #[tokio::test]
    async fn test_empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut buf = Vec::new();
        let mut out = CsvWriter::new(&mut buf, TRIALS_HEADER).unwrap();
        let command = vec!["sh".to_string()];
        let result =
            run_trials(&quick_driver(), &command, "sh", dir.path(), "sh", 2, &mut out).await;
        assert!(matches!(result, Err(TrialsError::Empty { .. })));
    }
}
