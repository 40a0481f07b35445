//! Интеграционный тест драйвера повторных запусков.

use rustytda::experiment::{ExperimentError, ExperimentRunner, RunMetrics, RunOutcome, RunnerConfig};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Уникальная временная директория для теста.
fn scratch_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let dir = std::env::temp_dir().join(format!("rustytda_{}_{}_{}", name, std::process::id(), nanos));
    fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir
}

fn write_experiment_file(dir: &Path) -> PathBuf {
    let path = dir.join("my_experiment.rs");
    fs::write(&path, "fn main() {}\n").expect("Failed to write experiment file");
    path
}

fn single_subdir(dir: &Path) -> PathBuf {
    let subdirs: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    assert_eq!(subdirs.len(), 1, "expected exactly one run directory: {:?}", subdirs);
    subdirs.into_iter().next().unwrap()
}

#[test]
fn n_runs_produce_n_entries_without_model() {
    let base = scratch_dir("n_runs");
    let source = write_experiment_file(&base);
    let runs_dir = base.join("runs");
    fs::create_dir(&runs_dir).unwrap();

    let mut call = 0usize;
    let runner = ExperimentRunner::new(RunnerConfig::new().with_base_dir(&runs_dir));
    let summary = runner
        .run(
            4,
            || {
                call += 1;
                let accuracies: Vec<f64> = (0..12).map(|e| if e < 2 { 0.0 } else { 0.5 }).collect();
                let metrics = RunMetrics::new(accuracies)
                    .with_field("run", call)
                    .with_field("model", "should not be persisted");
                Ok::<_, ExperimentError>(RunOutcome::new(vec![0.0f32; 8], metrics))
            },
            &source,
        )
        .unwrap();

    assert_eq!(call, 4);
    assert_eq!(summary.results.len(), 4);
    assert!((summary.mean_trailing_accuracy - 0.5).abs() < 1e-12);

    // Директория переименована и содержит копию файла эксперимента
    let run_dir = single_subdir(&runs_dir);
    assert_eq!(run_dir, summary.run_dir);
    let name = run_dir.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("my_experiment_0.50_acc_on_"), "unexpected name {}", name);
    assert_eq!(fs::read_to_string(run_dir.join("my_experiment.rs")).unwrap(), "fn main() {}\n");

    let results_name = summary.results_path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(results_name.starts_with("results__"));
    assert!(results_name.ends_with(".json"));

    let parsed: Value = serde_json::from_str(&fs::read_to_string(&summary.results_path).unwrap()).unwrap();
    let entries = parsed.as_array().unwrap();
    assert_eq!(entries.len(), 4);
    for (i, entry) in entries.iter().enumerate() {
        assert!(entry.get("model").is_none());
        assert_eq!(entry["run"], i + 1);
        assert_eq!(entry["test_accuracies"].as_array().unwrap().len(), 12);
    }

    fs::remove_dir_all(&base).ok();
}

#[test]
fn failing_run_aborts_and_keeps_completed_results() {
    let base = scratch_dir("failing");
    let source = write_experiment_file(&base);
    let runs_dir = base.join("runs");
    fs::create_dir(&runs_dir).unwrap();

    let mut call = 0usize;
    let runner = ExperimentRunner::new(RunnerConfig::new().with_base_dir(&runs_dir));
    let result = runner.run(
        5,
        || {
            call += 1;
            if call == 3 {
                return Err(std::io::Error::other("diverged"));
            }
            Ok(RunOutcome::new((), RunMetrics::new(vec![0.9])))
        },
        &source,
    );

    match result {
        Err(ExperimentError::RunFailed { run, .. }) => assert_eq!(run, 2),
        other => panic!("expected RunFailed, got {:?}", other.map(|s| s.run_dir)),
    }
    assert_eq!(call, 3);

    // Директория не переименована, в файле два завершенных запуска
    let tmp_dir = single_subdir(&runs_dir);
    let results_file = fs::read_dir(&tmp_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.extension().map(|e| e == "json").unwrap_or(false))
        .expect("results file must exist");
    let parsed: Vec<RunMetrics> = serde_json::from_str(&fs::read_to_string(results_file).unwrap()).unwrap();
    assert_eq!(parsed.len(), 2);

    fs::remove_dir_all(&base).ok();
}

#[test]
fn custom_window_and_name() {
    let base = scratch_dir("window");
    let source = write_experiment_file(&base);

    let runner = ExperimentRunner::new(
        RunnerConfig::new()
            .with_base_dir(&base)
            .with_trailing_window(1)
            .with_experiment_name("persistence"),
    );
    let summary = runner
        .run(
            2,
            || Ok::<_, ExperimentError>(RunOutcome::new((), RunMetrics::new(vec![0.0, 0.25]))),
            &source,
        )
        .unwrap();

    assert!((summary.mean_trailing_accuracy - 0.25).abs() < 1e-12);
    let name = summary.run_dir.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("persistence_0.25_acc_on_"), "unexpected name {}", name);

    fs::remove_dir_all(&base).ok();
}

#[test]
fn empty_accuracies_still_rename_with_nan() {
    let base = scratch_dir("empty_acc");
    let source = write_experiment_file(&base);
    let runs_dir = base.join("runs");
    fs::create_dir(&runs_dir).unwrap();

    let summary = ExperimentRunner::new(RunnerConfig::new().with_base_dir(&runs_dir))
        .run(
            2,
            || Ok::<_, ExperimentError>(RunOutcome::new((), RunMetrics::new(vec![]))),
            &source,
        )
        .unwrap();

    assert!(summary.mean_trailing_accuracy.is_nan());
    assert_eq!(summary.results.len(), 2);

    let run_dir = single_subdir(&runs_dir);
    assert_eq!(run_dir, summary.run_dir);
    let name = run_dir.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("my_experiment_NaN_acc_on_"), "unexpected name {}", name);
    assert!(summary.results_path.is_file());

    fs::remove_dir_all(&base).ok();
}
