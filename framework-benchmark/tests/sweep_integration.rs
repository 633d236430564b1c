//! End-to-end tests for the framework-benchmark binary.
//!
//! Tests exercise the CLI through `std::process::Command`, covering a full
//! sweep over a scratch benchmarks tree, report file contents, exit codes
//! for operator errors, and the overwrite confirmation.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn benchmark_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_framework-benchmark"))
}

fn run(args: &[&str]) -> Output {
    Command::new(benchmark_bin())
        .args(args)
        .output()
        .expect("Failed to execute framework-benchmark binary")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "Expected exit code 0, got {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Scratch benchmarks tree with an `sh`-based implementation so the tests
/// need no Python or Jac interpreter.
fn write_fixture(root: &Path) {
    let math = root.join("benchmarks/math_problem");
    let joke = root.join("benchmarks/joke_gen");
    std::fs::create_dir_all(&math).unwrap();
    std::fs::create_dir_all(&joke).unwrap();
    std::fs::write(math.join("math_problem_sh.sh"), "echo 42\n").unwrap();
    std::fs::write(joke.join("joke_gen_sh.sh"), "echo nope >&2\nexit 1\n").unwrap();

    let config = format!(
        r#"
benchmarks_root = "{}"
num_runs = 2
timeout_secs = 5
pause_between_runs_ms = 1
output_dir = "{}"

[[implementations]]
tag = "sh"
extension = "sh"
command = ["sh"]
"#,
        root.join("benchmarks").display(),
        root.join("results").display()
    );
    std::fs::write(root.join("benchmark.toml"), config).unwrap();
}

fn read_only_file_matching(dir: &Path, prefix: &str) -> String {
    let mut matches: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().starts_with(prefix))
                .unwrap_or(false)
        })
        .collect();
    assert_eq!(matches.len(), 1, "expected one {} file in {:?}", prefix, dir);
    std::fs::read_to_string(matches.remove(0)).unwrap()
}

#[test]
fn full_sweep_writes_both_reports() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let config = dir.path().join("benchmark.toml");

    let output = run(&["--config", config.to_str().unwrap(), "run", "-y"]);
    assert_success(&output);

    let results = dir.path().join("results");

    let detailed = read_only_file_matching(&results, "benchmark_detailed_results_");
    // Header + 2 runs per pair x 2 pairs
    assert_eq!(detailed.lines().count(), 5);
    assert!(detailed
        .lines()
        .next()
        .unwrap()
        .starts_with("benchmark,implementation,file_path,run_number"));
    assert!(detailed.contains("math_problem,sh,"));
    assert!(detailed.contains(",42,"));
    assert!(detailed.contains("joke_gen,sh,"));
    assert!(detailed.contains("nope"));

    let summary = read_only_file_matching(&results, "benchmark_summary_results_");
    assert_eq!(summary.lines().count(), 3);
    // joke_gen fails on every run, so its latency stats are all zero
    let joke_row: Vec<&str> = summary
        .lines()
        .find(|l| l.starts_with("joke_gen,"))
        .unwrap()
        .split(',')
        .collect();
    // total, successful, failed, success_rate, then the five stats
    assert_eq!(&joke_row[4..13], &["2", "0", "2", "0", "0", "0", "0", "0", "0"]);

    let math_row: Vec<&str> = summary
        .lines()
        .find(|l| l.starts_with("math_problem,"))
        .unwrap()
        .split(',')
        .collect();
    assert_eq!(&math_row[4..8], &["2", "2", "0", "100"]);

    let json = read_only_file_matching(&results, "sweep_summary_");
    assert!(json.contains("\"total_pairs\": 2"));
    assert!(json.contains("\"pairs_missing\": 0"));
}

#[test]
fn missing_program_file_yields_synthetic_rows() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    // A benchmark directory with no program file for the sh implementation
    std::fs::create_dir_all(dir.path().join("benchmarks/expert_answer")).unwrap();
    let config = dir.path().join("benchmark.toml");

    let output = run(&["--config", config.to_str().unwrap(), "run", "-y"]);
    assert_success(&output);

    let results = dir.path().join("results");
    let detailed = read_only_file_matching(&results, "benchmark_detailed_results_");
    let synthetic = detailed
        .lines()
        .find(|l| l.starts_with("expert_answer,"))
        .expect("missing file must still produce a detailed row");
    assert!(synthetic.contains("false"));
    assert!(synthetic.contains("N/A"));
    assert!(synthetic.contains("File not found"));

    let summary = read_only_file_matching(&results, "benchmark_summary_results_");
    let row: Vec<&str> = summary
        .lines()
        .find(|l| l.starts_with("expert_answer,"))
        .unwrap()
        .split(',')
        .collect();
    assert_eq!(row[3], "false");
    assert_eq!(&row[4..13], &["0", "0", "0", "0", "0", "0", "0", "0", "0"]);
}

#[test]
fn list_benchmarks_shows_missing_pairs() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let config = dir.path().join("benchmark.toml");

    let output = run(&["--config", config.to_str().unwrap(), "list-benchmarks"]);
    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("math_problem"));
    assert!(stdout.contains("ok"));

    // Add an empty benchmark directory and it shows up as missing
    std::fs::create_dir_all(dir.path().join("benchmarks/empty_case")).unwrap();
    let output = run(&["--config", config.to_str().unwrap(), "list-benchmarks"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("empty_case"));
    assert!(stdout.contains("missing"));
}

#[test]
fn explicit_missing_config_is_fatal() {
    let output = run(&["--config", "/definitely/not/here.toml", "run", "-y"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Config file not found"));
}

#[test]
fn unknown_implementation_tag_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let config = dir.path().join("benchmark.toml");

    let output = run(&[
        "--config",
        config.to_str().unwrap(),
        "run",
        "-y",
        "--impl",
        "guidance",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown implementation tag"));
}

#[test]
fn declined_overwrite_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    std::fs::create_dir_all(dir.path().join("results")).unwrap();
    let config = dir.path().join("benchmark.toml");

    let mut child = Command::new(benchmark_bin())
        .args(["--config", config.to_str().unwrap(), "run"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(b"n\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    // Nothing was written
    let leftovers = std::fs::read_dir(dir.path().join("results")).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[test]
fn init_config_writes_a_loadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config/benchmark.toml");

    let output = run(&["init-config", "--output", path.to_str().unwrap()]);
    assert_success(&output);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("benchmarks_root"));
    assert!(text.contains("[[implementations]]"));
    assert!(text.contains("mtllm"));
}
