// --- Файл: src/experiment/mod.rs ---

//! Модуль повторных запусков экспериментов.
//!
//! Эксперимент - функция без аргументов, возвращающая обученную модель и
//! метрики. Драйвер запускает ее n раз, после каждого запуска перезаписывает
//! JSON с накопленными метриками (модель не сохраняется), а в конце
//! переименовывает директорию запуска так, чтобы в имени была итоговая
//! точность.
//!
//! Структура директории:
//! ```text
//! <experiment>_<acc>_acc_on_<date>/
//! ├── <experiment source file>     # Копия файла эксперимента
//! └── results__<date>.json         # Метрики всех запусков
//! ```

pub mod result;
pub mod runner;

pub use result::{RunMetrics, RunOutcome};
pub use runner::{run_experiment_n_times, ExperimentRunner, ExperimentSummary, RunnerConfig};

use std::path::PathBuf;
use thiserror::Error;

/// Ошибки драйвера экспериментов.
#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error("Ошибка ввода/вывода: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Ошибка JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Файл эксперимента не найден: {0}")]
    ExperimentFileNotFound(PathBuf),

    #[error("Запуск {run} завершился ошибкой: {source}")]
    RunFailed {
        run: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Неверный аргумент: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, ExperimentError>;
