// --- Файл: src/data/dataset.rs ---

//! Провайдеры персистентных диаграмм и базовые типы данных.

use super::{DataError, Result};
use ndarray::Array2;
use std::collections::HashMap;
use std::sync::Arc;

/// Персистентная диаграмма: массив формы [n, 2], строки - пары (birth, death).
///
/// Пустая диаграмма имеет форму [0, 2].
pub type Diagram = Array2<f32>;

/// Набор диаграмм одного образца, по одной на каждое представление (view).
pub type ViewMap = HashMap<String, Diagram>;

/// Создает пустую диаграмму.
pub fn empty_diagram() -> Diagram {
    Array2::zeros((0, 2))
}

/// Создает диаграмму из списка пар (birth, death).
pub fn diagram_from_points(points: &[(f32, f32)]) -> Diagram {
    Array2::from_shape_fn((points.len(), 2), |(i, j)| {
        if j == 0 {
            points[i].0
        } else {
            points[i].1
        }
    })
}

/// Трейт для источников многовидовых персистентных диаграмм.
///
/// Каждый провайдер должен уметь:
/// - Сообщать имена предоставляемых представлений
/// - Возвращать количество образцов
/// - Возвращать образец (диаграммы и метку) по индексу
pub trait PersistenceDiagramProvider: Send + Sync {
    /// Тип метки образца
    type Label: Clone;

    /// Имена представлений, которые есть у каждого образца.
    fn view_names(&self) -> Vec<String>;

    /// Возвращает количество образцов.
    fn len(&self) -> usize;

    /// Проверяет, пуст ли провайдер.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Возвращает диаграммы и метку по индексу.
    fn get(&self, index: usize) -> Option<(ViewMap, Self::Label)>;

    /// Возвращает метки всех образцов в порядке индексов.
    fn sample_labels(&self) -> Vec<Self::Label> {
        (0..self.len())
            .filter_map(|i| self.get(i).map(|(_, label)| label))
            .collect()
    }
}

/// Провайдер, хранящий все диаграммы в памяти.
#[derive(Debug, Clone)]
pub struct InMemoryProvider<L> {
    view_names: Vec<String>,
    samples: Arc<Vec<(ViewMap, L)>>,
}

impl<L: Clone + Send + Sync> InMemoryProvider<L> {
    /// Создает провайдер, проверяя что каждый образец содержит все
    /// представления и каждая диаграмма имеет два столбца.
    pub fn new(view_names: Vec<String>, samples: Vec<(ViewMap, L)>) -> Result<Self> {
        for (index, (views, _)) in samples.iter().enumerate() {
            for name in &view_names {
                let dgm = views.get(name).ok_or_else(|| DataError::MissingView {
                    index,
                    view: name.clone(),
                })?;
                if dgm.ncols() != 2 {
                    return Err(DataError::InvalidDiagram {
                        index,
                        view: name.clone(),
                        cols: dgm.ncols(),
                    });
                }
            }
        }

        Ok(Self {
            view_names,
            samples: Arc::new(samples),
        })
    }

    /// Создает провайдер с единственным представлением.
    pub fn from_single_view(view_name: &str, diagrams: Vec<Diagram>, labels: Vec<L>) -> Result<Self> {
        if diagrams.len() != labels.len() {
            return Err(DataError::LengthMismatch {
                what: "diagrams/labels",
                left: diagrams.len(),
                right: labels.len(),
            });
        }

        let samples = diagrams
            .into_iter()
            .zip(labels)
            .map(|(dgm, label)| {
                let mut views = ViewMap::new();
                views.insert(view_name.to_string(), dgm);
                (views, label)
            })
            .collect();

        Self::new(vec![view_name.to_string()], samples)
    }
}

impl<L: Clone + Send + Sync> PersistenceDiagramProvider for InMemoryProvider<L> {
    type Label = L;

    fn view_names(&self) -> Vec<String> {
        self.view_names.clone()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, index: usize) -> Option<(ViewMap, L)> {
        self.samples.get(index).cloned()
    }

    fn sample_labels(&self) -> Vec<L> {
        self.samples.iter().map(|(_, label)| label.clone()).collect()
    }
}
