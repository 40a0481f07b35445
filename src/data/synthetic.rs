// --- Файл: src/data/synthetic.rs ---

//! Синтетические многовидовые диаграммы для демонстрации и тестов.
//!
//! Классы различаются типичной персистентностью точек: у класса с большим
//! номером точки живут дольше, в старших представлениях разница сильнее.

use super::dataset::{Diagram, InMemoryProvider, PersistenceDiagramProvider, ViewMap};
use super::{DataError, Result};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Вероятность пустой диаграммы в представлении.
const EMPTY_PROBABILITY: f64 = 0.05;

/// Провайдер со сгенерированными диаграммами и строковыми метками.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    inner: InMemoryProvider<String>,
}

impl SyntheticProvider {
    /// Генерирует датасет.
    ///
    /// # Аргументы
    ///
    /// * `num_samples` - Количество образцов; классы чередуются по кругу
    /// * `class_names` - Имена классов (метки)
    /// * `view_names` - Имена представлений
    /// * `max_points` - Максимальное число точек в диаграмме
    /// * `seed` - Seed генератора
    pub fn generate(
        num_samples: usize,
        class_names: &[&str],
        view_names: &[&str],
        max_points: usize,
        seed: u64,
    ) -> Result<Self> {
        if class_names.is_empty() || view_names.is_empty() {
            return Err(DataError::InvalidArgument(
                "нужен хотя бы один класс и одно представление".to_string(),
            ));
        }
        if max_points == 0 {
            return Err(DataError::InvalidArgument("max_points должен быть положительным".to_string()));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let samples = (0..num_samples)
            .map(|i| {
                let class = i % class_names.len();
                let views: ViewMap = view_names
                    .iter()
                    .enumerate()
                    .map(|(v, name)| (name.to_string(), random_diagram(&mut rng, class, v, max_points)))
                    .collect();
                (views, class_names[class].to_string())
            })
            .collect();

        let inner = InMemoryProvider::new(view_names.iter().map(|v| v.to_string()).collect(), samples)?;
        Ok(Self { inner })
    }
}

fn random_diagram<R: Rng + ?Sized>(rng: &mut R, class: usize, view: usize, max_points: usize) -> Diagram {
    if rng.random_bool(EMPTY_PROBABILITY) {
        return Array2::zeros((0, 2));
    }

    let n = rng.random_range(1..=max_points);
    let scale = 0.12 * (class as f32 + 1.0) * (view as f32 + 1.0).sqrt();
    let mut dgm = Array2::zeros((n, 2));
    for i in 0..n {
        let birth: f32 = rng.random::<f32>() * 0.5;
        let lifetime = 0.02 + rng.random::<f32>() * scale;
        dgm[[i, 0]] = birth;
        dgm[[i, 1]] = birth + lifetime;
    }
    dgm
}

impl PersistenceDiagramProvider for SyntheticProvider {
    type Label = String;

    fn view_names(&self) -> Vec<String> {
        self.inner.view_names()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn get(&self, index: usize) -> Option<(ViewMap, String)> {
        self.inner.get(index)
    }

    fn sample_labels(&self) -> Vec<String> {
        self.inner.sample_labels()
    }
}
