// --- Файл: src/demo.rs ---

//! Демонстрационный эксперимент для бинарника.
//!
//! Диаграммы проходят через UpperDiagonalThresholdedLogTransform, затем
//! каждая превращается в отклики гауссовых структурных элементов с центрами
//! над диагональю; поверх признаков обучается softmax-регрессия.

use log::{debug, info};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rustytda::data::{
    diagram_center_init, diagram_center_init_with_rng, train_test_from_dataset_with_transform, DataError,
    DiagramBatch, LoaderConfig, PersistenceDiagramProvider, SyntheticProvider, TestSize,
    UpperDiagonalThresholdedLogTransform,
};
use rustytda::experiment::{RunMetrics, RunOutcome};
use rustytda::metrics::{Accuracy, Metric, MetricLogger};
use std::sync::Arc;

/// Резкость гауссовых структурных элементов.
const SHARPNESS: f32 = 8.0;

/// Параметры одного запуска.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub test_size: f64,
    pub transform: UpperDiagonalThresholdedLogTransform,
    pub num_centers: usize,
    pub learning_rate: f32,
}

/// Линейный классификатор с softmax.
#[derive(Debug, Clone)]
pub struct SoftmaxClassifier {
    weights: Array2<f32>,
    bias: Array1<f32>,
}

impl SoftmaxClassifier {
    pub fn new(num_features: usize, num_classes: usize) -> Self {
        Self {
            weights: Array2::zeros((num_features, num_classes)),
            bias: Array1::zeros(num_classes),
        }
    }

    fn probabilities(&self, x: &Array2<f32>) -> Array2<f32> {
        let mut logits = x.dot(&self.weights) + &self.bias;
        for mut row in logits.rows_mut() {
            let max = row.fold(f32::NEG_INFINITY, |a, &b| a.max(b));
            row.mapv_inplace(|v| (v - max).exp());
            let sum = row.sum();
            row /= sum;
        }
        logits
    }

    pub fn predict(&self, x: &Array2<f32>) -> Array1<i64> {
        self.probabilities(x)
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                    .map(|(class, _)| class as i64)
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Один шаг градиентного спуска по кросс-энтропии; возвращает loss.
    pub fn train_step(&mut self, x: &Array2<f32>, targets: &Array1<i64>, learning_rate: f32) -> f32 {
        let n = x.nrows().max(1) as f32;
        let mut grad = self.probabilities(x);
        let mut loss = 0.0;
        for (i, &target) in targets.iter().enumerate() {
            let t = target as usize;
            loss -= grad[[i, t]].max(1e-12).ln();
            grad[[i, t]] -= 1.0;
        }
        grad /= n;

        let grad_w = x.t().dot(&grad);
        let grad_b = grad.sum_axis(Axis(0));
        self.weights.scaled_add(-learning_rate, &grad_w);
        self.bias.scaled_add(-learning_rate, &grad_b);

        loss / n
    }
}

/// Суммарные отклики структурных элементов по каждому представлению.
fn structure_features(batch: &DiagramBatch, views: &[String], centers: &Array2<f32>) -> Array2<f32> {
    let k = centers.nrows();
    let mut x = Array2::zeros((batch.len(), views.len() * k));

    for (v, name) in views.iter().enumerate() {
        let Some(dgms) = batch.views.get(name) else {
            continue;
        };
        for (i, dgm) in dgms.iter().enumerate() {
            for point in dgm.rows() {
                // точки на диагонали после ln дают -inf
                if !point[1].is_finite() {
                    continue;
                }
                for c in 0..k {
                    let dx = point[0] - centers[[c, 0]];
                    let dy = point[1] - centers[[c, 1]];
                    x[[i, v * k + c]] += (-SHARPNESS * (dx * dx + dy * dy)).exp();
                }
            }
        }
    }

    x
}

/// Один запуск: разбиение, обучение по эпохам, точность на тесте.
pub fn run_once(
    provider: Arc<SyntheticProvider>,
    config: &DemoConfig,
    seed: Option<u64>,
) -> Result<RunOutcome<SoftmaxClassifier>, DataError> {
    let views = provider.view_names();

    let mut loader_config = LoaderConfig::new()
        .with_batch_size(config.batch_size)
        .with_test_size(TestSize::Fraction(config.test_size));
    if let Some(s) = seed {
        loader_config = loader_config.with_seed(s);
    }
    let loaders = train_test_from_dataset_with_transform(provider, &loader_config, config.transform)?;

    let centers = match seed {
        Some(s) => diagram_center_init_with_rng(config.num_centers, &mut StdRng::seed_from_u64(s)),
        None => diagram_center_init(config.num_centers),
    };

    let mut model = SoftmaxClassifier::new(views.len() * config.num_centers, loaders.encoder.num_classes());
    let mut logger = MetricLogger::new();

    for epoch in 0..config.epochs {
        for batch in loaders.train.iter() {
            let batch = batch?;
            let x = structure_features(&batch, &views, &centers);
            let loss = model.train_step(&x, &batch.targets, config.learning_rate);
            logger.log("train_loss", loss as f64);
        }

        let mut accuracy = Accuracy::new();
        for batch in loaders.test.iter() {
            let batch = batch?;
            let x = structure_features(&batch, &views, &centers);
            accuracy.update(&model.predict(&x), &batch.targets);
        }
        logger.log("test_accuracy", accuracy.compute());
        logger.end_epoch();
        debug!("{}", logger.format_epoch(epoch));
    }

    let test_accuracies = logger.get_history("test_accuracy").cloned().unwrap_or_default();
    let train_losses = logger.get_history("train_loss").cloned().unwrap_or_default();
    info!(
        "finished {} epochs, last test accuracy {:.4}",
        logger.current_epoch(),
        logger.get_last("test_accuracy").unwrap_or_default()
    );

    let metrics = RunMetrics::new(test_accuracies)
        .with_field("train_losses", train_losses)
        .with_field("epochs", config.epochs)
        .with_field("num_centers", config.num_centers)
        .with_field("nu", config.transform.nu() as f64);

    Ok(RunOutcome::new(model, metrics))
}
