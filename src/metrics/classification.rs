// --- Файл: src/metrics/classification.rs ---

//! Метрики для задач классификации.

use super::Metric;
use ndarray::Array1;

/// Метрика точности (Accuracy) по номерам классов.
///
/// Accuracy = correct / total
#[derive(Debug, Clone, Default)]
pub struct Accuracy {
    correct: usize,
    total: usize,
}

impl Accuracy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Количество учтенных образцов.
    pub fn total(&self) -> usize {
        self.total
    }
}

impl Metric for Accuracy {
    type Prediction = Array1<i64>;
    type Target = Array1<i64>;
    type Output = f64;

    fn update(&mut self, predictions: &Self::Prediction, targets: &Self::Target) {
        for (pred, target) in predictions.iter().zip(targets.iter()) {
            if pred == target {
                self.correct += 1;
            }
            self.total += 1;
        }
    }

    fn compute(&self) -> Self::Output {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    fn reset(&mut self) {
        self.correct = 0;
        self.total = 0;
    }

    fn name(&self) -> &str {
        "Accuracy"
    }
}
