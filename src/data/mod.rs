//! Dataset splitting and randomized batch loading
//!
//! The split component partitions an indexable sample collection into
//! disjoint train/validation index sets ([`IndexSplit`]) and returns one
//! randomized batch loader per set:
//!
//! ```
//! use adversario::data::{split, RowDataset, SplitConfig};
//!
//! let rows = (0..100).map(|i| vec![i as f32; 4]).collect();
//! let dataset = RowDataset::new(rows).unwrap();
//!
//! let (mut train, mut valid) = split(dataset, &SplitConfig::new(0.2)).unwrap();
//! assert_eq!(train.sample_count() + valid.sample_count(), 100);
//! for batch in train.iter_epoch() {
//!     assert!(batch.len() > 0);
//! }
//! ```

mod dataset;
mod loader;
mod split;

pub use dataset::{Dataset, RowDataset};
pub use loader::{BatchIter, DataLoader};
pub use split::{split, IndexSplit, SplitConfig};
