// --- Файл: src/experiment/runner.rs ---

//! Драйвер повторных запусков эксперимента.

use super::result::{RunMetrics, RunOutcome};
use super::{ExperimentError, Result};
use crate::metrics::RunningMean;
use chrono::Local;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Конфигурация драйвера.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Директория, в которой создается директория запуска (`None` - текущая)
    pub base_dir: Option<PathBuf>,
    /// Сколько последних значений точности усреднять в каждом запуске
    pub trailing_window: usize,
    /// Имя эксперимента в итоговой директории (`None` - имя файла без расширения)
    pub experiment_name: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            trailing_window: 10,
            experiment_name: None,
        }
    }
}

impl RunnerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Устанавливает базовую директорию
    pub fn with_base_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.base_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Устанавливает окно усреднения точности
    pub fn with_trailing_window(mut self, window: usize) -> Self {
        self.trailing_window = window;
        self
    }

    /// Устанавливает имя эксперимента
    pub fn with_experiment_name(mut self, name: &str) -> Self {
        self.experiment_name = Some(name.to_string());
        self
    }
}

/// Итог серии запусков.
#[derive(Debug, Clone)]
pub struct ExperimentSummary {
    /// Итоговая (переименованная) директория запуска
    pub run_dir: PathBuf,
    /// Путь к JSON с результатами внутри `run_dir`
    pub results_path: PathBuf,
    /// Метрики всех запусков, в порядке запуска
    pub results: Vec<RunMetrics>,
    /// Среднее по запускам хвостового среднего точности
    pub mean_trailing_accuracy: f64,
}

/// Драйвер, запускающий эксперимент несколько раз подряд.
#[derive(Debug, Clone, Default)]
pub struct ExperimentRunner {
    config: RunnerConfig,
}

impl ExperimentRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Запускает `experiment` `n` раз.
    ///
    /// После каждого запуска модель отбрасывается, а файл результатов
    /// перезаписывается всеми накопленными метриками. Ошибка эксперимента
    /// прерывает серию; результаты завершенных запусков остаются на диске,
    /// директория в этом случае не переименовывается. Запуск без значений
    /// точности не прерывает серию: итог становится NaN, а директория
    /// получает имя `<name>_NaN_acc_on_<date>`.
    pub fn run<M, E, F>(&self, n: usize, mut experiment: F, experiment_file: &Path) -> Result<ExperimentSummary>
    where
        F: FnMut() -> std::result::Result<RunOutcome<M>, E>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        if n == 0 {
            return Err(ExperimentError::InvalidArgument("n должно быть положительным".to_string()));
        }
        if !experiment_file.is_file() {
            return Err(ExperimentError::ExperimentFileNotFound(experiment_file.to_path_buf()));
        }
        let file_name = experiment_file
            .file_name()
            .ok_or_else(|| ExperimentError::ExperimentFileNotFound(experiment_file.to_path_buf()))?;

        let base_dir = match &self.config.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        let started = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        let tmp_dir = base_dir.join(started.to_string());
        fs::create_dir(&tmp_dir)?;
        fs::copy(experiment_file, tmp_dir.join(file_name))?;

        let date = Local::now().format("%Y-%m-%d_%H:%M:%S").to_string();
        let results_name = format!("results__{}.json", date);
        let results_path = tmp_dir.join(&results_name);

        let mut results: Vec<RunMetrics> = Vec::with_capacity(n);
        for run in 0..n {
            info!("==================^================");
            info!("Run {}", run);

            let outcome = experiment().map_err(|e| ExperimentError::RunFailed {
                run,
                source: e.into(),
            })?;
            results.push(outcome.into_metrics());
            write_results(&results_path, &results)?;
        }

        let score = mean_trailing_accuracy(&results, self.config.trailing_window);

        let experiment_name = match &self.config.experiment_name {
            Some(name) => name.clone(),
            None => experiment_file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        let run_dir = base_dir.join(format!("{}_{:.2}_acc_on_{}", experiment_name, score, date));
        fs::rename(&tmp_dir, &run_dir)?;
        info!("{} runs finished, mean trailing accuracy {:.4}, results in {}", n, score, run_dir.display());

        Ok(ExperimentSummary {
            results_path: run_dir.join(results_name),
            run_dir,
            results,
            mean_trailing_accuracy: score,
        })
    }
}

/// Запускает эксперимент `n` раз с конфигурацией по умолчанию.
pub fn run_experiment_n_times<M, E, F>(n: usize, experiment: F, experiment_file: &Path) -> Result<ExperimentSummary>
where
    F: FnMut() -> std::result::Result<RunOutcome<M>, E>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    ExperimentRunner::default().run(n, experiment, experiment_file)
}

/// Пишет результаты во временный файл и переносит его поверх `path`,
/// чтобы прерванная запись не затирала предыдущие запуски.
fn write_results(path: &Path, results: &[RunMetrics]) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Запуск без значений точности дает NaN, и итог серии тоже становится NaN.
fn mean_trailing_accuracy(results: &[RunMetrics], window: usize) -> f64 {
    let mut mean = RunningMean::new();
    for (run, metrics) in results.iter().enumerate() {
        let trailing = metrics.trailing_test_accuracy(window).unwrap_or_else(|| {
            warn!("Run {} has no test accuracies", run);
            f64::NAN
        });
        mean.update(trailing);
    }
    mean.compute()
}
