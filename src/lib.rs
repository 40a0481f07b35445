//! # RustyTDA: persistence-diagram data pipeline in Rust
//!
//! **RustyTDA** prepares persistence diagrams for training topological
//! models and drives repeated training experiments.
//!
//! ## Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rustytda::data::{
//!     train_test_from_dataset_with_transform, LoaderConfig, SyntheticProvider,
//!     UpperDiagonalThresholdedLogTransform,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // 1. Build a multi-view diagram provider
//! let provider = Arc::new(SyntheticProvider::generate(120, &["a", "b"], &["dim_0", "dim_1"], 16, 7)?);
//!
//! // 2. Stratified split + loaders with the 45° log-clamped transform
//! let config = LoaderConfig::new().with_batch_size(32).with_seed(7);
//! let loaders = train_test_from_dataset_with_transform(provider, &config, UpperDiagonalThresholdedLogTransform::new(0.1)?)?;
//!
//! // 3. Iterate over variable-length diagram batches
//! for batch in loaders.train.iter() {
//!     let batch = batch?;
//!     assert_eq!(batch.views["dim_0"].len(), batch.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod experiment;
pub mod metrics;
