// --- Файл: src/data/split.rs ---

//! Стратифицированное разбиение индексов на train/test.
//!
//! Размеры частей каждого класса подбираются так, чтобы пропорции классов
//! в train и test совпадали с исходными настолько, насколько позволяют
//! целые числа. Остатки распределяются по правилу наибольшего остатка
//! со случайным выбором среди равных.

use super::{DataError, Result};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Размер тестовой части.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TestSize {
    /// Доля образцов в интервале (0, 1)
    Fraction(f64),
    /// Абсолютное количество образцов
    Count(usize),
}

impl TestSize {
    /// Возвращает (n_train, n_test) для датасета из `n` образцов.
    pub fn resolve(&self, n: usize) -> Result<(usize, usize)> {
        let n_test = match *self {
            TestSize::Fraction(f) => {
                if !(f > 0.0 && f < 1.0) {
                    return Err(DataError::InvalidArgument(format!(
                        "доля тестовой части должна быть в (0, 1), получено {}",
                        f
                    )));
                }
                (f * n as f64).ceil() as usize
            }
            TestSize::Count(c) => c,
        };

        if n_test == 0 || n_test >= n {
            return Err(DataError::InvalidArgument(format!(
                "при {} образцах тестовая часть из {} образцов оставляет пустую часть",
                n, n_test
            )));
        }

        Ok((n - n_test, n_test))
    }
}

/// Одно разбиение: непересекающиеся train и test индексы.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Стратифицированное случайное разбиение.
#[derive(Debug, Clone)]
pub struct StratifiedShuffleSplit {
    n_splits: usize,
    test_size: TestSize,
    seed: Option<u64>,
}

impl StratifiedShuffleSplit {
    /// Создает одиночное разбиение с заданным размером теста.
    pub fn new(test_size: TestSize) -> Self {
        Self {
            n_splits: 1,
            test_size,
            seed: None,
        }
    }

    /// Устанавливает количество разбиений.
    pub fn with_n_splits(mut self, n_splits: usize) -> Self {
        self.n_splits = n_splits;
        self
    }

    /// Устанавливает seed для воспроизводимости.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Разбивает индексы образцов по закодированным меткам `y`.
    pub fn split(&self, y: &[usize]) -> Result<Vec<Split>> {
        let n = y.len();
        let (n_train, n_test) = self.test_size.resolve(n)?;

        let mut classes: Vec<usize> = y.to_vec();
        classes.sort_unstable();
        classes.dedup();
        let n_classes = classes.len();

        let mut members: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
        for (idx, label) in y.iter().enumerate() {
            // binary_search не может промахнуться: classes построен из y
            if let Ok(c) = classes.binary_search(label) {
                members[c].push(idx);
            }
        }
        let counts: Vec<usize> = members.iter().map(Vec::len).collect();

        if counts.iter().any(|&c| c < 2) {
            return Err(DataError::InvalidArgument(
                "в каждом классе должно быть не меньше 2 образцов".to_string(),
            ));
        }
        if n_train < n_classes {
            return Err(DataError::InvalidArgument(format!(
                "train часть ({}) меньше числа классов ({})",
                n_train, n_classes
            )));
        }
        if n_test < n_classes {
            return Err(DataError::InvalidArgument(format!(
                "test часть ({}) меньше числа классов ({})",
                n_test, n_classes
            )));
        }

        let mut rng = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut splits = Vec::with_capacity(self.n_splits);
        for _ in 0..self.n_splits {
            let train_counts = approximate_mode(&counts, n_train, &mut rng);
            let remaining: Vec<usize> = counts
                .iter()
                .zip(&train_counts)
                .map(|(c, t)| c - t)
                .collect();
            let test_counts = approximate_mode(&remaining, n_test, &mut rng);

            let mut train = Vec::with_capacity(n_train);
            let mut test = Vec::with_capacity(n_test);
            for (c, class_members) in members.iter().enumerate() {
                let mut perm = class_members.clone();
                perm.shuffle(&mut rng);
                let cut = train_counts[c];
                train.extend_from_slice(&perm[..cut]);
                test.extend_from_slice(&perm[cut..cut + test_counts[c]]);
            }
            train.shuffle(&mut rng);
            test.shuffle(&mut rng);

            debug!(
                "stratified split: {} train / {} test over {} classes",
                train.len(),
                test.len(),
                n_classes
            );
            splits.push(Split { train, test });
        }

        Ok(splits)
    }
}

/// Распределяет `n_draws` выборок между классами пропорционально `counts`.
///
/// Дробные части округляются вниз, недостающие единицы достаются классам
/// с наибольшим остатком; среди равных остатков выбор случаен.
fn approximate_mode<R: Rng + ?Sized>(counts: &[usize], n_draws: usize, rng: &mut R) -> Vec<usize> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0; counts.len()];
    }

    let continuous: Vec<f64> = counts
        .iter()
        .map(|&c| c as f64 * n_draws as f64 / total as f64)
        .collect();
    let mut floored: Vec<usize> = continuous
        .iter()
        .zip(counts)
        .map(|(v, &c)| (v.floor() as usize).min(c))
        .collect();
    let mut need = n_draws.saturating_sub(floored.iter().sum());

    if need > 0 {
        let remainder: Vec<f64> = continuous
            .iter()
            .zip(&floored)
            .map(|(v, &f)| v - f as f64)
            .collect();
        let mut values = remainder.clone();
        values.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        values.dedup();

        for value in values {
            let mut inds: Vec<usize> = (0..counts.len())
                .filter(|&i| remainder[i] == value && floored[i] < counts[i])
                .collect();
            inds.shuffle(rng);
            let add_now = inds.len().min(need);
            for &i in &inds[..add_now] {
                floored[i] += 1;
            }
            need -= add_now;
            if need == 0 {
                break;
            }
        }
    }

    floored
}

/// Одиночное стратифицированное разбиение, удобная обертка.
pub fn stratified_train_test_split(y: &[usize], test_size: TestSize, seed: Option<u64>) -> Result<Split> {
    let mut splitter = StratifiedShuffleSplit::new(test_size);
    if let Some(s) = seed {
        splitter = splitter.with_seed(s);
    }
    splitter
        .split(y)?
        .pop()
        .ok_or_else(|| DataError::InvalidArgument("разбиение не построено".to_string()))
}
