//! Benchmark program discovery
//!
//! Benchmarks live under a root directory, one subdirectory per benchmark,
//! with one program file per framework named `<benchmark>_<tag>.<ext>`.
//! A missing program file is a reportable outcome, not an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::ImplementationConfig;

/// A candidate program for one (benchmark, implementation) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramRef {
    pub benchmark: String,
    pub implementation: String,
    pub path: PathBuf,
    pub exists: bool,
}

impl ProgramRef {
    /// Path rendered for report rows
    pub fn path_display(&self) -> String {
        self.path.display().to_string()
    }
}

/// List benchmark names: the immediate subdirectories of the root, sorted
pub fn discover_benchmarks(root: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Expected program path for a (benchmark, implementation) pair
pub fn program_path(root: &Path, benchmark: &str, implementation: &ImplementationConfig) -> PathBuf {
    root.join(benchmark).join(format!(
        "{}_{}.{}",
        benchmark, implementation.tag, implementation.extension
    ))
}

/// Resolve a pair to its program file, recording whether the file exists
pub fn resolve(root: &Path, benchmark: &str, implementation: &ImplementationConfig) -> ProgramRef {
    let path = program_path(root, benchmark, implementation);
    ProgramRef {
        benchmark: benchmark.to_string(),
        implementation: implementation.tag.clone(),
        exists: path.is_file(),
        path,
    }
}
