//! Child-process run driver
//!
//! The driver's contract is total: every invocation yields a `RunRecord`.
//! Timeouts, spawn failures and non-zero exits all become failed records;
//! nothing propagates past the sweep loop as an error.

use std::process::Stdio;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::process::Command;
use tokio::time::{sleep, timeout};

use super::{RunRecord, NO_EXIT_CODE};
use crate::programs::ProgramRef;

/// Settings for the run driver
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Ceiling on a single run
    pub timeout: Duration,
    /// Pause between consecutive runs, to avoid saturating the host or the
    /// upstream model API
    pub pause_between_runs: Duration,
    /// Model identifier exported to the child as MODEL_NAME
    pub model: Option<String>,
    /// Export cache-disabling flags into the child environment
    pub disable_response_cache: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            pause_between_runs: Duration::from_millis(100),
            model: None,
            disable_response_cache: true,
        }
    }
}

/// Executes benchmark programs as child processes and records the outcome
pub struct RunDriver {
    config: DriverConfig,
}

impl RunDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    /// Execute one run of a program and capture its outcome.
    ///
    /// `command` is the interpreter invocation; the program path is appended
    /// as the final argument. Stdin is closed so a program waiting for input
    /// fails fast instead of hanging until the ceiling.
    pub async fn run_once(
        &self,
        program: &ProgramRef,
        command: &[String],
        run_number: u32,
    ) -> RunRecord {
        let rendered = render_command(command, program);

        let base = RunRecord {
            benchmark: program.benchmark.clone(),
            implementation: program.implementation.clone(),
            file_path: program.path_display(),
            run_number,
            file_exists: true,
            success: false,
            execution_time: 0.0,
            return_code: NO_EXIT_CODE,
            command: rendered,
            stdout: String::new(),
            stderr: String::new(),
            timestamp: Utc::now(),
        };

        let Some((interpreter, args)) = command.split_first() else {
            return RunRecord {
                stderr: "Empty interpreter command".to_string(),
                ..base
            };
        };

        let mut cmd = Command::new(interpreter);
        cmd.args(args)
            .arg(&program.path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Environment flags exist only at this process boundary; the harness
        // never mutates its own environment.
        if let Some(model) = &self.config.model {
            cmd.env("MODEL_NAME", model);
        }
        if self.config.disable_response_cache {
            cmd.env("OPENAI_API_CACHE", "false");
            cmd.env("OPENAI_CACHE", "false");
        }

        let started = Instant::now();
        match timeout(self.config.timeout, cmd.output()).await {
            Ok(Ok(output)) => {
                let execution_time = started.elapsed().as_secs_f64();
                let return_code = output.status.code().map(i64::from).unwrap_or(NO_EXIT_CODE);
                RunRecord {
                    success: output.status.success(),
                    execution_time,
                    return_code,
                    stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                    timestamp: Utc::now(),
                    ..base
                }
            }
            Ok(Err(err)) => {
                tracing::error!(
                    "Failed to invoke {} for {}: {}",
                    base.command,
                    program.benchmark,
                    err
                );
                RunRecord {
                    stderr: err.to_string(),
                    timestamp: Utc::now(),
                    ..base
                }
            }
            Err(_) => {
                // The child is killed when the timed-out future drops.
                let ceiling = self.config.timeout.as_secs_f64();
                tracing::warn!(
                    "Run {} of {} timed out after {:.0}s",
                    run_number,
                    program.path.display(),
                    ceiling
                );
                RunRecord {
                    execution_time: ceiling,
                    stderr: format!("Execution timeout ({:.0} seconds)", ceiling),
                    timestamp: Utc::now(),
                    ..base
                }
            }
        }
    }

    /// Execute a program N times in sequence, pausing between runs
    pub async fn run_many(
        &self,
        program: &ProgramRef,
        command: &[String],
        num_runs: u32,
    ) -> Vec<RunRecord> {
        tracing::info!("Running {} {} times...", program.path.display(), num_runs);

        let mut records = Vec::with_capacity(num_runs as usize);
        for run_number in 1..=num_runs {
            tracing::debug!("  Run {}/{}", run_number, num_runs);
            records.push(self.run_once(program, command, run_number).await);
            if run_number < num_runs {
                sleep(self.config.pause_between_runs).await;
            }
        }
        records
    }
}

fn render_command(command: &[String], program: &ProgramRef) -> String {
    let mut parts: Vec<&str> = command.iter().map(String::as_str).collect();
    let path = program.path_display();
    parts.push(&path);
    parts.join(" ")
}
