// --- Файл: src/data/collate.rs ---

//! Сборка батча из образцов с диаграммами переменной длины.
//!
//! Диаграммы разных образцов имеют разное число точек, поэтому батч хранит
//! для каждого представления список диаграмм, а не один тензор.

use super::dataset::{Diagram, PersistenceDiagramProvider, ViewMap};
use super::transforms::DiagramTransform;
use super::{DataError, Result};
use ndarray::Array1;
use std::collections::HashMap;
use std::sync::Arc;

/// Функция, переводящая метку образца в номер класса.
pub type LabelMap<L> = Arc<dyn Fn(&L) -> Result<i64> + Send + Sync>;

/// Батч многовидовых диаграмм.
#[derive(Debug, Clone)]
pub struct DiagramBatch {
    /// Диаграммы батча: по списку на каждое запрошенное представление
    pub views: HashMap<String, Vec<Diagram>>,
    /// Закодированные метки
    pub targets: Array1<i64>,
    /// Индексы образцов в этом батче
    pub indices: Vec<usize>,
}

impl DiagramBatch {
    /// Возвращает размер батча.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Проверяет, пуст ли батч.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Сборщик батчей для провайдера персистентных диаграмм.
pub struct PersistenceDiagramCollate<L> {
    wanted_views: Vec<String>,
    label_map: LabelMap<L>,
    transform: Option<Arc<dyn DiagramTransform>>,
}

impl<L> PersistenceDiagramCollate<L> {
    /// Создает сборщик.
    ///
    /// # Аргументы
    ///
    /// * `provider` - Провайдер, чьи представления проверяются
    /// * `wanted_views` - Нужные представления, `None` - все, что есть у провайдера
    /// * `label_map` - Перевод метки в номер класса
    ///
    /// Возвращает ошибку, если запрошено представление, которого нет у провайдера.
    pub fn new<P, F>(provider: &P, wanted_views: Option<Vec<String>>, label_map: F) -> Result<Self>
    where
        P: PersistenceDiagramProvider<Label = L>,
        F: Fn(&L) -> Result<i64> + Send + Sync + 'static,
    {
        let provided = provider.view_names();

        let wanted_views = match wanted_views {
            None => provided,
            Some(wanted) => {
                let mut unique: Vec<String> = Vec::with_capacity(wanted.len());
                for view in wanted {
                    if !provided.contains(&view) {
                        return Err(DataError::UnknownView {
                            view,
                            available: provided,
                        });
                    }
                    if !unique.contains(&view) {
                        unique.push(view);
                    }
                }
                unique
            }
        };

        Ok(Self {
            wanted_views,
            label_map: Arc::new(label_map),
            transform: None,
        })
    }

    /// Устанавливает преобразование, применяемое к каждой диаграмме.
    pub fn with_transform<T: DiagramTransform + 'static>(mut self, transform: T) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Представления, которые попадают в батч.
    pub fn wanted_views(&self) -> &[String] {
        &self.wanted_views
    }

    /// Собирает батч из пар (диаграммы, метка).
    pub fn collate<I>(&self, samples: I) -> Result<DiagramBatch>
    where
        I: IntoIterator<Item = (ViewMap, L)>,
    {
        let mut views: HashMap<String, Vec<Diagram>> = self
            .wanted_views
            .iter()
            .map(|name| (name.clone(), Vec::new()))
            .collect();
        let mut targets = Vec::new();

        for (index, (mut dgm_map, label)) in samples.into_iter().enumerate() {
            for name in &self.wanted_views {
                let dgm = dgm_map.remove(name).ok_or_else(|| DataError::MissingView {
                    index,
                    view: name.clone(),
                })?;
                let dgm = match &self.transform {
                    Some(t) => t.apply(dgm),
                    None => dgm,
                };
                if let Some(list) = views.get_mut(name) {
                    list.push(dgm);
                }
            }
            targets.push((self.label_map)(&label)?);
        }

        Ok(DiagramBatch {
            views,
            targets: Array1::from(targets),
            indices: Vec::new(),
        })
    }
}
