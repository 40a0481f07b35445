// --- Файл: src/data/dataloader.rs ---

//! DiagramLoader - итератор по батчам диаграмм из подмножества индексов.

use super::collate::{DiagramBatch, PersistenceDiagramCollate};
use super::dataset::PersistenceDiagramProvider;
use super::encoder::LabelEncoder;
use super::sampler::{BatchSampler, SubsetRandomSampler};
use super::split::{StratifiedShuffleSplit, TestSize};
use super::transforms::DiagramTransform;
use super::{DataError, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt::Debug;
use std::sync::Arc;

/// DiagramLoader - батчи по заданному подмножеству образцов провайдера.
///
/// Каждый вызов [`DiagramLoader::iter`] - новый проход со свежей перестановкой
/// индексов.
///
/// # Пример
///
/// ```rust,ignore
/// let loader = DiagramLoader::new(provider, collate, train_indices, 32).seed(7);
///
/// for batch in loader.iter() {
///     let batch = batch?;
///     println!("Batch size: {}", batch.len());
/// }
/// ```
pub struct DiagramLoader<P: PersistenceDiagramProvider> {
    provider: Arc<P>,
    collate: Arc<PersistenceDiagramCollate<P::Label>>,
    indices: Vec<usize>,
    batch_size: usize,
    drop_last: bool,
    seed: Option<u64>,
    pass: Cell<u64>,
}

impl<P: PersistenceDiagramProvider> DiagramLoader<P> {
    /// Создает новый DiagramLoader.
    ///
    /// # Аргументы
    ///
    /// * `provider` - Источник образцов
    /// * `collate` - Сборщик батчей
    /// * `indices` - Индексы образцов, из которых берутся батчи
    /// * `batch_size` - Размер батча
    ///
    /// # Паника
    ///
    /// Паникует если `batch_size` равен нулю.
    pub fn new(
        provider: Arc<P>,
        collate: Arc<PersistenceDiagramCollate<P::Label>>,
        indices: Vec<usize>,
        batch_size: usize,
    ) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        Self {
            provider,
            collate,
            indices,
            batch_size,
            drop_last: false,
            seed: None,
            pass: Cell::new(0),
        }
    }

    /// Устанавливает, нужно ли отбрасывать последний неполный батч.
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// Устанавливает seed для воспроизводимости.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Возвращает количество батчей за проход.
    pub fn num_batches(&self) -> usize {
        let n = self.indices.len();
        if self.drop_last {
            n / self.batch_size
        } else {
            n.div_ceil(self.batch_size)
        }
    }

    /// Возвращает количество образцов в подмножестве.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Проверяет, пуст ли DiagramLoader.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Возвращает размер батча.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Индексы подмножества.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Создает итератор по батчам (один проход).
    pub fn iter(&self) -> DiagramLoaderIterator<'_, P> {
        let pass = self.pass.get();
        self.pass.set(pass + 1);

        let sampler = match self.seed {
            Some(seed) => SubsetRandomSampler::with_seed(self.indices.clone(), seed.wrapping_add(pass)),
            None => SubsetRandomSampler::new(self.indices.clone()),
        };

        DiagramLoaderIterator {
            provider: self.provider.as_ref(),
            collate: self.collate.as_ref(),
            batch_sampler: BatchSampler::new(sampler, self.batch_size, self.drop_last),
        }
    }
}

/// Итератор по батчам диаграмм.
pub struct DiagramLoaderIterator<'a, P: PersistenceDiagramProvider> {
    provider: &'a P,
    collate: &'a PersistenceDiagramCollate<P::Label>,
    batch_sampler: BatchSampler<SubsetRandomSampler>,
}

impl<P: PersistenceDiagramProvider> Iterator for DiagramLoaderIterator<'_, P> {
    type Item = Result<DiagramBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        let indices = self.batch_sampler.next()?;

        let samples: Result<Vec<_>> = indices
            .iter()
            .map(|&idx| {
                self.provider.get(idx).ok_or(DataError::IndexOutOfRange {
                    index: idx,
                    len: self.provider.len(),
                })
            })
            .collect();

        let batch = samples.and_then(|s| self.collate.collate(s)).map(|mut batch| {
            batch.indices = indices;
            batch
        });
        Some(batch)
    }
}

/// Параметры разбиения и загрузки.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Размер тестовой части
    pub test_size: TestSize,
    /// Размер батча
    pub batch_size: usize,
    /// Нужные представления (`None` - все)
    pub wanted_views: Option<Vec<String>>,
    /// Seed для разбиения и перемешивания
    pub seed: Option<u64>,
    /// Отбрасывать последний неполный батч
    pub drop_last: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            test_size: TestSize::Fraction(0.2),
            batch_size: 64,
            wanted_views: None,
            seed: None,
            drop_last: false,
        }
    }
}

impl LoaderConfig {
    /// Создает конфигурацию по умолчанию.
    pub fn new() -> Self {
        Self::default()
    }

    /// Устанавливает размер тестовой части.
    pub fn with_test_size(mut self, test_size: TestSize) -> Self {
        self.test_size = test_size;
        self
    }

    /// Устанавливает размер батча.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Устанавливает нужные представления.
    pub fn with_wanted_views(mut self, views: &[&str]) -> Self {
        self.wanted_views = Some(views.iter().map(|v| v.to_string()).collect());
        self
    }

    /// Устанавливает seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Устанавливает drop_last.
    pub fn with_drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }
}

/// Пара загрузчиков train/test и обученный кодировщик меток.
pub struct TrainTestLoaders<P: PersistenceDiagramProvider> {
    pub train: DiagramLoader<P>,
    pub test: DiagramLoader<P>,
    pub encoder: Arc<LabelEncoder<P::Label>>,
}

/// Кодирует метки, строит одно стратифицированное разбиение и возвращает
/// загрузчики train и test с общим сборщиком.
pub fn train_test_from_dataset<P>(provider: Arc<P>, config: &LoaderConfig) -> Result<TrainTestLoaders<P>>
where
    P: PersistenceDiagramProvider,
    P::Label: Ord + Debug + Send + Sync + 'static,
{
    build_loaders(provider, config, |collate| collate)
}

/// То же, что [`train_test_from_dataset`], но каждая диаграмма проходит
/// через `transform` при сборке батча.
pub fn train_test_from_dataset_with_transform<P, T>(
    provider: Arc<P>,
    config: &LoaderConfig,
    transform: T,
) -> Result<TrainTestLoaders<P>>
where
    P: PersistenceDiagramProvider,
    P::Label: Ord + Debug + Send + Sync + 'static,
    T: DiagramTransform + 'static,
{
    build_loaders(provider, config, move |collate| collate.with_transform(transform))
}

fn build_loaders<P, F>(provider: Arc<P>, config: &LoaderConfig, finish: F) -> Result<TrainTestLoaders<P>>
where
    P: PersistenceDiagramProvider,
    P::Label: Ord + Debug + Send + Sync + 'static,
    F: FnOnce(PersistenceDiagramCollate<P::Label>) -> PersistenceDiagramCollate<P::Label>,
{
    if config.batch_size == 0 {
        return Err(DataError::InvalidArgument("batch_size должен быть положительным".to_string()));
    }

    let sample_labels = provider.sample_labels();
    let encoder = Arc::new(LabelEncoder::fit(&sample_labels));
    let encoded = encoder.transform(&sample_labels)?;

    let label_encoder = Arc::clone(&encoder);
    let label_map = move |label: &P::Label| -> Result<i64> {
        label_encoder.transform_one(label).map(|code| code as i64)
    };
    let collate = PersistenceDiagramCollate::new(provider.as_ref(), config.wanted_views.clone(), label_map)?;
    let collate = Arc::new(finish(collate));

    let mut splitter = StratifiedShuffleSplit::new(config.test_size);
    if let Some(seed) = config.seed {
        splitter = splitter.with_seed(seed);
    }
    let split = splitter
        .split(&encoded)?
        .pop()
        .ok_or_else(|| DataError::InvalidArgument("разбиение не построено".to_string()))?;

    info!(
        "train/test split: {} / {} samples, {} classes, views {:?}",
        split.train.len(),
        split.test.len(),
        encoder.num_classes(),
        collate.wanted_views()
    );

    let mut train = DiagramLoader::new(Arc::clone(&provider), Arc::clone(&collate), split.train, config.batch_size)
        .drop_last(config.drop_last);
    let mut test = DiagramLoader::new(provider, collate, split.test, config.batch_size).drop_last(config.drop_last);

    if let Some(seed) = config.seed {
        train = train.seed(seed.wrapping_add(1));
        test = test.seed(seed.wrapping_add(2));
        debug!("loader seeds: train {}, test {}", seed.wrapping_add(1), seed.wrapping_add(2));
    }

    Ok(TrainTestLoaders { train, test, encoder })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::{diagram_from_points, InMemoryProvider, ViewMap};
    use std::collections::HashSet;

    fn create_test_provider() -> Arc<InMemoryProvider<String>> {
        let samples = (0..20)
            .map(|i| {
                let mut views = ViewMap::new();
                views.insert("dim_0".to_string(), diagram_from_points(&[(0.0, i as f32 + 1.0)]));
                views.insert("dim_1".to_string(), diagram_from_points(&[(0.1, 0.2), (0.3, 0.6)]));
                let label = if i % 4 == 0 { "loop" } else { "blob" };
                (views, label.to_string())
            })
            .collect();
        Arc::new(InMemoryProvider::new(vec!["dim_0".to_string(), "dim_1".to_string()], samples).unwrap())
    }

    #[test]
    fn test_loaders_cover_split() {
        let provider = create_test_provider();
        let config = LoaderConfig::new().with_batch_size(3).with_seed(42);
        let loaders = train_test_from_dataset(provider, &config).unwrap();

        assert_eq!(loaders.train.len(), 16);
        assert_eq!(loaders.test.len(), 4);
        assert_eq!(loaders.train.num_batches(), 6);
        assert_eq!(loaders.encoder.classes(), &["blob".to_string(), "loop".to_string()]);

        let train_seen: Vec<usize> = loaders
            .train
            .iter()
            .flat_map(|b| b.unwrap().indices)
            .collect();
        let test_seen: Vec<usize> = loaders
            .test
            .iter()
            .flat_map(|b| b.unwrap().indices)
            .collect();

        let train_set: HashSet<_> = train_seen.iter().copied().collect();
        let test_set: HashSet<_> = test_seen.iter().copied().collect();
        assert_eq!(train_set.len(), 16);
        assert_eq!(test_set.len(), 4);
        assert!(train_set.is_disjoint(&test_set));
    }

    #[test]
    fn test_each_pass_reshuffles() {
        let provider = create_test_provider();
        let config = LoaderConfig::new().with_batch_size(16).with_seed(1);
        let loaders = train_test_from_dataset(provider, &config).unwrap();

        let first = loaders.train.iter().next().unwrap().unwrap().indices;
        let second = loaders.train.iter().next().unwrap().unwrap().indices;
        assert_eq!(first.len(), 16);
        assert_ne!(first, second);

        let mut a = first.clone();
        let mut b = second.clone();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_targets_are_encoded() {
        let provider = create_test_provider();
        let config = LoaderConfig::new().with_batch_size(20).with_seed(3);
        let loaders = train_test_from_dataset(Arc::clone(&provider), &config).unwrap();

        for batch in loaders.test.iter() {
            let batch = batch.unwrap();
            for (pos, &idx) in batch.indices.iter().enumerate() {
                let expected = if idx % 4 == 0 { 1 } else { 0 };
                assert_eq!(batch.targets[pos], expected);
            }
        }
    }

    #[test]
    fn test_wanted_views_subset() {
        let provider = create_test_provider();
        let config = LoaderConfig::new().with_wanted_views(&["dim_1"]).with_seed(0);
        let loaders = train_test_from_dataset(provider, &config).unwrap();

        let batch = loaders.train.iter().next().unwrap().unwrap();
        assert_eq!(batch.views.len(), 1);
        assert_eq!(batch.views["dim_1"].len(), batch.len());
    }

    #[test]
    fn test_unknown_view_fails() {
        let provider = create_test_provider();
        let config = LoaderConfig::new().with_wanted_views(&["dim_9"]);
        assert!(matches!(
            train_test_from_dataset(provider, &config),
            Err(DataError::UnknownView { .. })
        ));
    }

    #[test]
    fn test_drop_last() {
        let provider = create_test_provider();
        let config = LoaderConfig::new().with_batch_size(5).with_drop_last(true).with_seed(8);
        let loaders = train_test_from_dataset(provider, &config).unwrap();

        assert_eq!(loaders.train.num_batches(), 3);
        assert_eq!(loaders.train.iter().count(), 3);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let provider = create_test_provider();
        let config = LoaderConfig::new().with_batch_size(0);
        assert!(train_test_from_dataset(provider, &config).is_err());
    }
}
