// --- Файл: src/data/init.rs ---

//! Инициализация центров структурных элементов над диагональю.

use ndarray::Array2;
use rand::Rng;

/// Выбирает `n` случайных точек единичного квадрата строго над диагональю.
pub fn diagram_center_init(n: usize) -> Array2<f32> {
    diagram_center_init_with_rng(n, &mut rand::rng())
}

/// То же, что [`diagram_center_init`], но с заданным генератором.
///
/// Точки с y ≤ x отбрасываются, выборка повторяется до набора `n` точек.
pub fn diagram_center_init_with_rng<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Array2<f32> {
    let mut centers = Array2::zeros((n, 2));
    let mut accepted = 0;

    while accepted < n {
        let x: f32 = rng.random();
        let y: f32 = rng.random();
        if y > x {
            centers[[accepted, 0]] = x;
            centers[[accepted, 1]] = y;
            accepted += 1;
        }
    }

    centers
}
