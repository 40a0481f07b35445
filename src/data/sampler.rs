// --- Файл: src/data/sampler.rs ---

//! Стратегии сэмплирования индексов для DiagramLoader.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Трейт для сэмплеров - генераторов индексов.
pub trait Sampler: Iterator<Item = usize> {
    /// Возвращает общее количество образцов.
    fn len(&self) -> usize;

    /// Проверяет, пуст ли сэмплер.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Сбрасывает сэмплер в начальное состояние.
    fn reset(&mut self);
}

/// Случайный сэмплер по подмножеству индексов.
///
/// Возвращает только индексы из заданного подмножества, в новом случайном
/// порядке на каждом проходе.
pub struct SubsetRandomSampler {
    indices: Vec<usize>,
    order: Vec<usize>,
    current: usize,
    rng: StdRng,
}

impl SubsetRandomSampler {
    /// Создает сэмплер по подмножеству индексов.
    pub fn new(indices: Vec<usize>) -> Self {
        Self::from_rng(indices, StdRng::from_rng(&mut rand::rng()))
    }

    /// Создает сэмплер с фиксированным seed для воспроизводимости.
    pub fn with_seed(indices: Vec<usize>, seed: u64) -> Self {
        Self::from_rng(indices, StdRng::seed_from_u64(seed))
    }

    fn from_rng(indices: Vec<usize>, rng: StdRng) -> Self {
        let mut sampler = Self {
            order: Vec::with_capacity(indices.len()),
            indices,
            current: 0,
            rng,
        };
        sampler.shuffle();
        sampler
    }

    fn shuffle(&mut self) {
        self.order.clear();
        self.order.extend_from_slice(&self.indices);
        self.order.shuffle(&mut self.rng);
    }
}

impl Iterator for SubsetRandomSampler {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = *self.order.get(self.current)?;
        self.current += 1;
        Some(idx)
    }
}

impl Sampler for SubsetRandomSampler {
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn reset(&mut self) {
        self.current = 0;
        self.shuffle();
    }
}

/// Батч-сэмплер - группирует индексы в батчи.
pub struct BatchSampler<S: Sampler> {
    sampler: S,
    batch_size: usize,
    drop_last: bool,
}

impl<S: Sampler> BatchSampler<S> {
    /// Создает батч-сэмплер.
    ///
    /// # Аргументы
    ///
    /// * `sampler` - Внутренний сэмплер для генерации индексов
    /// * `batch_size` - Размер батча
    /// * `drop_last` - Отбросить последний неполный батч
    pub fn new(sampler: S, batch_size: usize, drop_last: bool) -> Self {
        Self {
            sampler,
            batch_size,
            drop_last,
        }
    }

    /// Возвращает количество батчей.
    pub fn num_batches(&self) -> usize {
        let n = self.sampler.len();
        if self.drop_last {
            n / self.batch_size
        } else {
            n.div_ceil(self.batch_size)
        }
    }
}

impl<S: Sampler> Iterator for BatchSampler<S> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch: Vec<usize> = self.sampler.by_ref().take(self.batch_size).collect();

        if batch.is_empty() {
            return None;
        }

        if batch.len() < self.batch_size && self.drop_last {
            return None;
        }

        Some(batch)
    }
}
