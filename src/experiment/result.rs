// --- Файл: src/experiment/result.rs ---

//! Результат одного запуска эксперимента.

use crate::metrics::trailing_mean;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Имя поля модели, которое никогда не попадает в файл результатов.
pub const MODEL_FIELD: &str = "model";

/// Метрики одного запуска, сохраняемые в JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Точность на тесте по эпохам
    pub test_accuracies: Vec<f64>,
    /// Произвольные дополнительные поля эксперимента
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RunMetrics {
    /// Создает метрики из истории точности на тесте.
    pub fn new(test_accuracies: Vec<f64>) -> Self {
        Self {
            test_accuracies,
            extra: Map::new(),
        }
    }

    /// Добавляет дополнительное поле.
    pub fn with_field<V: Into<Value>>(mut self, key: &str, value: V) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// Среднее последних `window` значений точности.
    pub fn trailing_test_accuracy(&self, window: usize) -> Option<f64> {
        trailing_mean(&self.test_accuracies, window)
    }
}

/// То, что возвращает эксперимент: модель и метрики.
#[derive(Debug, Clone)]
pub struct RunOutcome<M> {
    pub model: M,
    pub metrics: RunMetrics,
}

impl<M> RunOutcome<M> {
    pub fn new(model: M, metrics: RunMetrics) -> Self {
        Self { model, metrics }
    }

    /// Отбрасывает модель и возвращает метрики без поля `model`.
    pub fn into_metrics(self) -> RunMetrics {
        let mut metrics = self.metrics;
        metrics.extra.remove(MODEL_FIELD);
        metrics
    }
}
