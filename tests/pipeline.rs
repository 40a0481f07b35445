//! Интеграционный тест конвейера: провайдер -> разбиение -> батчи -> преобразование.

use rustytda::data::{
    diagram_center_init, train_test_from_dataset, train_test_from_dataset_with_transform, DataError,
    LoaderConfig, PersistenceDiagramProvider, SyntheticProvider, TestSize, UpperDiagonalThresholdedLogTransform,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

fn provider() -> Arc<SyntheticProvider> {
    Arc::new(SyntheticProvider::generate(90, &["torus", "sphere", "annulus"], &["dim_0", "dim_1"], 12, 17).unwrap())
}

#[test]
fn batches_cover_split_without_overlap() {
    let provider = provider();
    let config = LoaderConfig::new().with_batch_size(8).with_seed(5);
    let loaders = train_test_from_dataset(Arc::clone(&provider), &config).unwrap();

    let mut seen_train = Vec::new();
    for batch in loaders.train.iter() {
        let batch = batch.unwrap();
        // Каждое представление присутствует и содержит по диаграмме на образец
        assert_eq!(batch.views.len(), 2);
        for dgms in batch.views.values() {
            assert_eq!(dgms.len(), batch.len());
        }
        assert_eq!(batch.indices.len(), batch.len());
        seen_train.extend(batch.indices);
    }

    let mut seen_test = Vec::new();
    for batch in loaders.test.iter() {
        seen_test.extend(batch.unwrap().indices);
    }

    let train: HashSet<_> = seen_train.iter().copied().collect();
    let test: HashSet<_> = seen_test.iter().copied().collect();
    assert_eq!(train.len(), seen_train.len());
    assert_eq!(test.len(), seen_test.len());
    assert!(train.is_disjoint(&test));
    assert_eq!(train.len() + test.len(), provider.len());
    assert_eq!(test.len(), 18);
}

#[test]
fn split_is_stratified() {
    let provider = provider();
    let config = LoaderConfig::new()
        .with_batch_size(100)
        .with_test_size(TestSize::Fraction(1.0 / 3.0))
        .with_seed(11);
    let loaders = train_test_from_dataset(Arc::clone(&provider), &config).unwrap();

    let batch = loaders.test.iter().next().unwrap().unwrap();
    let mut per_class: HashMap<i64, usize> = HashMap::new();
    for &t in batch.targets.iter() {
        *per_class.entry(t).or_default() += 1;
    }
    // 30 образцов каждого класса, треть в тест
    assert_eq!(per_class.len(), 3);
    assert!(per_class.values().all(|&c| c == 10));
}

#[test]
fn seeded_pipeline_is_reproducible() {
    let config = LoaderConfig::new().with_batch_size(16).with_seed(21);
    let a = train_test_from_dataset(provider(), &config).unwrap();
    let b = train_test_from_dataset(provider(), &config).unwrap();

    assert_eq!(a.train.indices(), b.train.indices());
    assert_eq!(a.test.indices(), b.test.indices());

    let first_a = a.train.iter().next().unwrap().unwrap();
    let first_b = b.train.iter().next().unwrap().unwrap();
    assert_eq!(first_a.indices, first_b.indices);
    assert_eq!(first_a.targets, first_b.targets);
}

#[test]
fn transform_is_applied_to_every_diagram() {
    let provider = provider();
    let nu = 0.1;
    let config = LoaderConfig::new().with_batch_size(32).with_seed(2);
    let loaders =
        train_test_from_dataset_with_transform(Arc::clone(&provider), &config, UpperDiagonalThresholdedLogTransform::new(nu).unwrap())
            .unwrap();
    let transform = UpperDiagonalThresholdedLogTransform::new(nu).unwrap();

    let batch = loaders.train.iter().next().unwrap().unwrap();
    for (pos, &idx) in batch.indices.iter().enumerate() {
        let (raw, _) = provider.get(idx).unwrap();
        for (view, dgms) in &batch.views {
            let original = &raw[view];
            let transformed = &dgms[pos];
            assert_eq!(original.nrows(), transformed.nrows());
            for (p, q) in original.rows().into_iter().zip(transformed.rows()) {
                let (x, y) = transform.transform_point(p[0], p[1]);
                assert!((q[0] - x).abs() < 1e-6);
                assert!((q[1] - y).abs() < 1e-6);
            }
        }
    }
}

#[test]
fn unknown_view_is_invalid_argument() {
    let config = LoaderConfig::new().with_wanted_views(&["dim_0", "dim_3"]);
    let err = train_test_from_dataset(provider(), &config).err().unwrap();
    match err {
        DataError::UnknownView { view, available } => {
            assert_eq!(view, "dim_3");
            assert_eq!(available, vec!["dim_0".to_string(), "dim_1".to_string()]);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn center_init_stays_above_diagonal() {
    let centers = diagram_center_init(256);
    assert_eq!(centers.nrows(), 256);
    assert!(centers.rows().into_iter().all(|c| c[1] > c[0]));
}
