//! Sweep configuration
//!
//! Loads harness settings from TOML files and provides runtime access.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration for a benchmark sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Directory holding one subdirectory per benchmark
    #[serde(default = "default_benchmarks_root")]
    pub benchmarks_root: String,
    /// Runs per (benchmark, implementation) pair
    #[serde(default = "default_num_runs")]
    pub num_runs: u32,
    /// Ceiling on a single run, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Pause between consecutive runs, in milliseconds
    #[serde(default = "default_pause_between_runs_ms")]
    pub pause_between_runs_ms: u64,
    /// Directory the CSV reports are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Model identifier exported to child programs as MODEL_NAME
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Pass cache-disabling flags into child program environments
    #[serde(default = "default_true")]
    pub disable_response_cache: bool,
    /// Frameworks under comparison, in sweep order
    #[serde(default = "ImplementationConfig::defaults")]
    pub implementations: Vec<ImplementationConfig>,
}

/// One framework under comparison: its tag, file extension and interpreter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImplementationConfig {
    /// Tag used in program file names (`<benchmark>_<tag>.<ext>`)
    pub tag: String,
    /// Program file extension, without the leading dot
    pub extension: String,
    /// Interpreter command; the program path is appended as the final argument
    pub command: Vec<String>,
}

impl ImplementationConfig {
    pub fn new(
        tag: impl Into<String>,
        extension: impl Into<String>,
        command: &[&str],
    ) -> Self {
        Self {
            tag: tag.into(),
            extension: extension.into(),
            command: command.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The three frameworks the harness was built to compare
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("lmql", "py", &["python"]),
            Self::new("dspy", "py", &["python"]),
            Self::new("mtllm", "jac", &["jac", "run"]),
        ]
    }
}

// Default value functions
fn default_benchmarks_root() -> String {
    "benchmarks".to_string()
}
fn default_num_runs() -> u32 {
    20
}
fn default_timeout_secs() -> u64 {
    300
}
fn default_pause_between_runs_ms() -> u64 {
    100
}
fn default_output_dir() -> String {
    "results".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            benchmarks_root: default_benchmarks_root(),
            num_runs: default_num_runs(),
            timeout_secs: default_timeout_secs(),
            pause_between_runs_ms: default_pause_between_runs_ms(),
            output_dir: default_output_dir(),
            model: None,
            disable_response_cache: default_true(),
            implementations: ImplementationConfig::defaults(),
        }
    }
}

impl SweepConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a default config location or return defaults
    pub fn load_or_default() -> Self {
        let config_paths = ["benchmark.toml", "config/benchmark.toml"];

        for path in &config_paths {
            if let Ok(config) = Self::from_file(path) {
                tracing::info!("Loaded configuration from {}", path);
                return config;
            }
        }

        tracing::info!("Using default configuration");
        Self::default()
    }

    /// Save configuration to a TOML file
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Look up an implementation by tag
    pub fn implementation(&self, tag: &str) -> Option<&ImplementationConfig> {
        self.implementations.iter().find(|i| i.tag == tag)
    }

    /// Restrict the sweep to the given implementation tags, preserving the
    /// configured order. Unknown tags are reported back to the caller.
    pub fn retain_implementations(&mut self, tags: &[String]) -> Result<(), ConfigError> {
        for tag in tags {
            if self.implementation(tag).is_none() {
                return Err(ConfigError::UnknownImplementation(tag.clone()));
            }
        }
        self.implementations.retain(|i| tags.contains(&i.tag));
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown implementation tag: {0}")]
    UnknownImplementation(String),
}
