// --- Файл: src/metrics/running.rs ---

//! Утилиты для отслеживания статистик во время обучения.

use std::collections::HashMap;

/// Онлайн вычисление среднего значения.
///
/// Использует инкрементальный алгоритм для численной стабильности.
#[derive(Debug, Clone, Default)]
pub struct RunningMean {
    mean: f64,
    count: usize,
}

impl RunningMean {
    /// Создает новый RunningMean.
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет значение.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
    }

    /// Добавляет несколько значений.
    pub fn update_batch(&mut self, values: &[f64]) {
        for &v in values {
            self.update(v);
        }
    }

    /// Возвращает текущее среднее.
    pub fn compute(&self) -> f64 {
        self.mean
    }

    /// Возвращает количество добавленных значений.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Среднее последних `window` значений (или всех, если их меньше).
///
/// Возвращает `None` для пустого списка или нулевого окна.
pub fn trailing_mean(values: &[f64], window: usize) -> Option<f64> {
    if values.is_empty() || window == 0 {
        return None;
    }
    let start = values.len().saturating_sub(window);
    let mut mean = RunningMean::new();
    mean.update_batch(&values[start..]);
    Some(mean.compute())
}

/// Логгер метрик для отслеживания множества метрик во время обучения.
#[derive(Debug, Clone, Default)]
pub struct MetricLogger {
    /// История значений метрик по эпохам
    history: HashMap<String, Vec<f64>>,
    /// Текущие значения (для текущей эпохи)
    current: HashMap<String, RunningMean>,
    /// Текущая эпоха
    epoch: usize,
}

impl MetricLogger {
    /// Создает новый MetricLogger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Логирует значение метрики.
    pub fn log(&mut self, name: &str, value: f64) {
        self.current
            .entry(name.to_string())
            .or_default()
            .update(value);
    }

    /// Завершает эпоху: сохраняет средние значения в историю.
    pub fn end_epoch(&mut self) {
        for (name, running_mean) in self.current.drain() {
            self.history.entry(name).or_default().push(running_mean.compute());
        }
        self.epoch += 1;
    }

    /// Возвращает историю метрики.
    pub fn get_history(&self, name: &str) -> Option<&Vec<f64>> {
        self.history.get(name)
    }

    /// Возвращает последнее значение метрики.
    pub fn get_last(&self, name: &str) -> Option<f64> {
        self.history.get(name).and_then(|h| h.last().copied())
    }

    /// Возвращает текущую эпоху.
    pub fn current_epoch(&self) -> usize {
        self.epoch
    }

    /// Форматирует результаты эпохи.
    pub fn format_epoch(&self, epoch: usize) -> String {
        let mut parts: Vec<String> = self
            .history
            .iter()
            .filter_map(|(name, history)| history.get(epoch).map(|v| format!("{}: {:.6}", name, v)))
            .collect();

        parts.sort();
        format!("Epoch {}: {}", epoch, parts.join(" | "))
    }
}
