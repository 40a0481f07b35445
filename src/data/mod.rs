//! # Data Loading Module
//!
//! Dataset-preparation layer for persistence-diagram models: providers,
//! label encoding, stratified splits, batch collation and loaders.
//!
//! ## Key Components
//!
//! - [`PersistenceDiagramProvider`]: Trait for multi-view diagram sources
//! - [`PersistenceDiagramCollate`]: Turns samples into a [`DiagramBatch`]
//! - [`StratifiedShuffleSplit`]: Label-stratified train/test partitioning
//! - [`DiagramLoader`]: Batched iterator over an index subset
//! - [`DiagramTransform`]: Coordinate transforms applied to diagrams
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rustytda::data::{train_test_from_dataset, LoaderConfig, SyntheticProvider};
//!
//! let provider = Arc::new(SyntheticProvider::generate(200, &["a", "b"], &["dim_0", "dim_1"], 12, 7)?);
//! let loaders = train_test_from_dataset(provider, &LoaderConfig::default().with_seed(7))?;
//!
//! for batch in loaders.train.iter() {
//!     let batch = batch?;
//!     // batch.views["dim_0"] holds one diagram per sample
//! }
//! ```

pub mod collate;
pub mod dataloader;
pub mod dataset;
pub mod encoder;
pub mod init;
pub mod sampler;
pub mod split;
pub mod synthetic;
pub mod transforms;

pub use collate::{DiagramBatch, LabelMap, PersistenceDiagramCollate};
pub use dataloader::{
    train_test_from_dataset, train_test_from_dataset_with_transform, DiagramLoader,
    LoaderConfig, TrainTestLoaders,
};
pub use dataset::{diagram_from_points, empty_diagram, Diagram, InMemoryProvider, PersistenceDiagramProvider, ViewMap};
pub use encoder::LabelEncoder;
pub use init::{diagram_center_init, diagram_center_init_with_rng};
pub use sampler::{BatchSampler, Sampler, SubsetRandomSampler};
pub use split::{Split, StratifiedShuffleSplit, TestSize};
pub use synthetic::SyntheticProvider;
pub use transforms::{Compose, DiagramTransform, UpperDiagonalThresholdedLogTransform};

use thiserror::Error;

/// Ошибки подготовки данных.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("{view} не предоставляется провайдером, доступны: {available:?}")]
    UnknownView { view: String, available: Vec<String> },

    #[error("образец {index} не содержит представление {view}")]
    MissingView { index: usize, view: String },

    #[error("диаграмма образца {index} ({view}) должна иметь 2 столбца, получено {cols}")]
    InvalidDiagram { index: usize, view: String, cols: usize },

    #[error("метка не может быть закодирована: {0}")]
    InvalidLabel(String),

    #[error("метка отсутствует в обученном кодировщике: {0}")]
    UnseenLabel(String),

    #[error("несовпадение длин ({what}): {left} != {right}")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    #[error("индекс {index} вне диапазона датасета из {len} образцов")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("неверный аргумент: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, DataError>;
