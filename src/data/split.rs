//! Train/validation dataset splitting
//!
//! Partitions an ordered collection into disjoint train and validation index
//! sets and hands back one randomized batch loader per set. The partition is
//! produced by a seeded permutation of `0..N` sliced at
//! `floor(N * (1 - validation_ratio))`, so the selection is random yet fully
//! reproducible from the seed.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::dataset::Dataset;
use super::loader::DataLoader;
use crate::error::{AdversarioError, Result};

/// Configuration for dataset splitting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fraction of samples assigned to the validation set, in (0, 1)
    pub validation_ratio: f64,
    /// Batch size both loaders will yield
    pub batch_size: usize,
    /// Number of prefetch worker threads per loader (0 = load inline)
    pub num_workers: usize,
    /// Seed for the partition permutation and the loaders' epoch shuffles
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            validation_ratio: 0.2,
            batch_size: 100,
            num_workers: 2,
            seed: 42,
        }
    }
}

impl SplitConfig {
    /// Create a configuration with the given validation ratio and defaults
    /// for everything else.
    pub fn new(validation_ratio: f64) -> Self {
        Self { validation_ratio, ..Default::default() }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.validation_ratio > 0.0 && self.validation_ratio < 1.0) {
            return Err(AdversarioError::invalid_argument(
                "validation_ratio",
                format!(
                    "must be strictly between 0 and 1, got {} → pass a fraction of the dataset",
                    self.validation_ratio
                ),
            ));
        }
        if self.batch_size == 0 {
            return Err(AdversarioError::invalid_argument(
                "batch_size",
                "must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Disjoint train/validation index partition over `0..total`.
///
/// Invariants: the two sets are disjoint, together cover every index exactly
/// once, and `train.len() == floor(total * (1 - validation_ratio))`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSplit {
    /// Indices assigned to the training set
    pub train: Vec<usize>,
    /// Indices assigned to the validation set
    pub valid: Vec<usize>,
    /// Seed the permutation was drawn from
    pub seed: u64,
}

impl IndexSplit {
    /// Randomly partition `0..total` with a seeded permutation.
    pub fn new(total: usize, validation_ratio: f64, seed: u64) -> Result<Self> {
        if !(validation_ratio > 0.0 && validation_ratio < 1.0) {
            return Err(AdversarioError::invalid_argument(
                "validation_ratio",
                format!("must be strictly between 0 and 1, got {validation_ratio}"),
            ));
        }
        if total == 0 {
            return Err(AdversarioError::invalid_argument(
                "total",
                "cannot partition an empty collection".to_string(),
            ));
        }

        let mut indices: Vec<usize> = (0..total).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let threshold = (total as f64 * (1.0 - validation_ratio)).floor() as usize;
        let valid = indices.split_off(threshold);

        Ok(Self { train: indices, valid, seed })
    }

    /// Total number of partitioned indices.
    pub fn total(&self) -> usize {
        self.train.len() + self.valid.len()
    }
}

/// Split a dataset into train and validation batch loaders.
///
/// The partition is disjoint and covers the dataset exactly once; each loader
/// then samples its own index set in a fresh random order every epoch. The
/// dataset itself is shared read-only between the two loaders.
///
/// # Errors
///
/// `InvalidArgument` if `validation_ratio` is outside `(0, 1)`, if
/// `batch_size` is zero, or if the dataset is empty.
///
/// # Example
///
/// ```
/// use adversario::data::{split, RowDataset, SplitConfig};
///
/// let rows = (0..10).map(|i| vec![i as f32, 0.0]).collect();
/// let dataset = RowDataset::new(rows).unwrap();
/// let config = SplitConfig { validation_ratio: 0.3, batch_size: 2, num_workers: 0, seed: 7 };
///
/// let (mut train, mut valid) = split(dataset, &config).unwrap();
/// assert_eq!(train.sample_count(), 7);
/// assert_eq!(valid.sample_count(), 3);
/// assert!(train.iter_epoch().all(|batch| batch.len() % 2 == 0));
/// ```
pub fn split<D>(dataset: D, config: &SplitConfig) -> Result<(DataLoader<D>, DataLoader<D>)>
where
    D: Dataset + Send + Sync + 'static,
{
    config.validate()?;
    if dataset.is_empty() {
        return Err(AdversarioError::invalid_argument(
            "dataset",
            "cannot split an empty dataset → provide at least one sample".to_string(),
        ));
    }

    let parts = IndexSplit::new(dataset.len(), config.validation_ratio, config.seed)?;
    debug!(
        "split {} samples into {} train / {} validation (seed {})",
        parts.total(),
        parts.train.len(),
        parts.valid.len(),
        config.seed
    );

    let dataset = Arc::new(dataset);
    let train = DataLoader::new(
        Arc::clone(&dataset),
        parts.train,
        config.batch_size,
        config.num_workers,
        config.seed.wrapping_add(1),
    );
    let valid = DataLoader::new(
        dataset,
        parts.valid,
        config.batch_size,
        config.num_workers,
        config.seed.wrapping_add(2),
    );
    Ok((train, valid))
}
