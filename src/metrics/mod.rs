// --- Файл: src/metrics/mod.rs ---

//! Модуль метрик для оценки обучения.
//!
//! - **Классификация**: Accuracy по номерам классов
//! - **Статистики**: RunningMean, скользящее среднее по хвосту, MetricLogger
//!
//! # Пример использования
//!
//! ```rust,ignore
//! use rustytda::metrics::{Accuracy, Metric};
//!
//! let mut accuracy = Accuracy::new();
//! accuracy.update(&predictions, &targets);
//! println!("Accuracy: {:.4}", accuracy.compute());
//! accuracy.reset();
//! ```

pub mod classification;
pub mod running;

pub use classification::Accuracy;
pub use running::{trailing_mean, MetricLogger, RunningMean};

/// Базовый трейт для всех метрик.
pub trait Metric {
    /// Тип предсказания
    type Prediction;
    /// Тип целевого значения
    type Target;
    /// Тип результата метрики
    type Output;

    /// Обновляет состояние метрики новыми данными.
    fn update(&mut self, predictions: &Self::Prediction, targets: &Self::Target);

    /// Вычисляет текущее значение метрики.
    fn compute(&self) -> Self::Output;

    /// Сбрасывает состояние метрики.
    fn reset(&mut self);

    /// Возвращает имя метрики.
    fn name(&self) -> &str;
}
