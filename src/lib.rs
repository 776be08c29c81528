//! # adversario
//!
//! A small adversarial-training toolkit with two independent components:
//!
//! - **Split** ([`data`]): partition an ordered sample collection into
//!   disjoint train/validation index sets with a seeded random permutation,
//!   and iterate each side in randomized batches, optionally prefetched by a
//!   fixed pool of worker threads.
//! - **Adversarial training step** ([`gan`]): one coordinated update of a
//!   discriminator/generator pair from a batch of real data — discriminator
//!   phase strictly before generator phase — over injected scoring, sampling,
//!   loss, and parameter-update capabilities.
//!
//! Both components ride on a minimal tape [`autograd`] substrate and the
//! [`optim`] update algorithms.
//!
//! # Example
//!
//! ```
//! use adversario::data::{split, RowDataset, SplitConfig};
//! use adversario::gan::{GanConfig, GanTrainer};
//!
//! // Partition a toy dataset 75/25 and batch the training side.
//! let rows = (0..40).map(|i| vec![(i % 7) as f32 * 0.1; 4]).collect();
//! let dataset = RowDataset::new(rows).unwrap();
//! let split_config =
//!     SplitConfig { validation_ratio: 0.25, batch_size: 5, num_workers: 0, seed: 42 };
//! let (mut train, valid) = split(dataset, &split_config).unwrap();
//! assert_eq!(train.sample_count(), 30);
//! assert_eq!(valid.sample_count(), 10);
//!
//! // Drive one epoch of adversarial updates from the training loader.
//! let gan_config = GanConfig { latent_dim: 4, data_dim: 4, ..Default::default() };
//! let mut trainer = GanTrainer::from_config(&gan_config, 42).unwrap();
//! for batch in train.iter_epoch() {
//!     let result = trainer.step(&batch).unwrap();
//!     assert!(result.dsc_loss.is_finite());
//! }
//! ```

pub mod autograd;
pub mod data;
mod error;
pub mod gan;
pub mod optim;

pub use autograd::{GradGuard, Tensor};
pub use error::{AdversarioError, Result};
