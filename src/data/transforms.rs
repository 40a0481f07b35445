// --- Файл: src/data/transforms.rs ---

//! Преобразования координат персистентных диаграмм.

use super::dataset::Diagram;
use super::{DataError, Result};
use ndarray::Array2;
use std::f32::consts::FRAC_1_SQRT_2;

/// Трейт для преобразований диаграмм.
pub trait DiagramTransform: Send + Sync {
    /// Применяет преобразование к диаграмме.
    fn apply(&self, dgm: Diagram) -> Diagram;
}

/// Композиция нескольких преобразований.
pub struct Compose {
    transforms: Vec<Box<dyn DiagramTransform>>,
}

impl Compose {
    /// Создает пустую композицию.
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Добавляет преобразование в композицию.
    pub fn add<T: DiagramTransform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }
}

impl Default for Compose {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramTransform for Compose {
    fn apply(&self, mut dgm: Diagram) -> Diagram {
        for transform in &self.transforms {
            dgm = transform.apply(dgm);
        }
        dgm
    }
}

/// Поворот на 45° с логарифмическим сглаживанием у диагонали.
///
/// Точка (b, d) переходит в (x, y) = ((b + d) / √2, (d - b) / √2).
/// Для y ≤ ν координата y заменяется на ln(y / ν) + ν: при y = ν обе ветки
/// совпадают, поэтому разрыва на пороге нет.
///
/// Точки на диагонали и под ней (y ≤ 0) дают -inf/NaN, как и у ln.
#[derive(Debug, Clone, Copy)]
pub struct UpperDiagonalThresholdedLogTransform {
    nu: f32,
}

impl UpperDiagonalThresholdedLogTransform {
    /// Создает преобразование с порогом `nu`.
    ///
    /// Возвращает `InvalidArgument`, если `nu` не положительное конечное число.
    pub fn new(nu: f32) -> Result<Self> {
        if !(nu > 0.0 && nu.is_finite()) {
            return Err(DataError::InvalidArgument(format!("nu должно быть положительным, получено {}", nu)));
        }
        Ok(Self { nu })
    }

    /// Порог ν.
    pub fn nu(&self) -> f32 {
        self.nu
    }

    /// Преобразует одну точку (birth, death).
    pub fn transform_point(&self, birth: f32, death: f32) -> (f32, f32) {
        let x = (birth + death) * FRAC_1_SQRT_2;
        let mut y = (death - birth) * FRAC_1_SQRT_2;
        if y <= self.nu {
            y = (y / self.nu).ln() + self.nu;
        }
        (x, y)
    }

    /// Обратное преобразование для точек строго над диагональю.
    pub fn inverse_point(&self, x: f32, y: f32) -> (f32, f32) {
        let y = if y <= self.nu {
            self.nu * (y - self.nu).exp()
        } else {
            y
        };
        ((x - y) * FRAC_1_SQRT_2, (x + y) * FRAC_1_SQRT_2)
    }
}

impl DiagramTransform for UpperDiagonalThresholdedLogTransform {
    fn apply(&self, dgm: Diagram) -> Diagram {
        if dgm.nrows() == 0 {
            return dgm;
        }

        let mut out = Array2::zeros((dgm.nrows(), 2));
        for (i, point) in dgm.rows().into_iter().enumerate() {
            let (x, y) = self.transform_point(point[0], point[1]);
            out[[i, 0]] = x;
            out[[i, 1]] = y;
        }
        out
    }
}
