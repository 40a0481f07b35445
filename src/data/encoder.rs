// --- Файл: src/data/encoder.rs ---

//! Кодирование категориальных меток в целые числа.

use super::{DataError, Result};
use std::fmt::Debug;

/// Кодировщик меток: класс получает индекс своей позиции среди
/// отсортированных уникальных меток.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoder<L> {
    classes: Vec<L>,
}

impl<L: Ord + Clone + Debug> LabelEncoder<L> {
    /// Обучает кодировщик на списке меток.
    pub fn fit(labels: &[L]) -> Self {
        let mut classes = labels.to_vec();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Отсортированные уникальные классы.
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    /// Количество классов.
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Кодирует одну метку.
    pub fn transform_one(&self, label: &L) -> Result<usize> {
        self.classes
            .binary_search(label)
            .map_err(|_| DataError::UnseenLabel(format!("{:?}", label)))
    }

    /// Кодирует список меток.
    pub fn transform(&self, labels: &[L]) -> Result<Vec<usize>> {
        labels.iter().map(|l| self.transform_one(l)).collect()
    }

    /// Восстанавливает метки по кодам.
    pub fn inverse_transform(&self, codes: &[usize]) -> Result<Vec<L>> {
        codes
            .iter()
            .map(|&code| {
                self.classes.get(code).cloned().ok_or_else(|| {
                    DataError::InvalidLabel(format!(
                        "код {} при {} классах",
                        code,
                        self.classes.len()
                    ))
                })
            })
            .collect()
    }
}
