//! Adversarial training step
//!
//! One [`train_batch`] call performs a coordinated update of a
//! discriminator/generator pair from a single batch of real data:
//!
//! ```text
//! Latent z ──► Sampler ──► fake batch ──┬─► Critic ──► scores ──► losses
//!                                       │
//!              real batch ──────────────┘
//! ```
//!
//! The discriminator phase completes — loss, backward, parameter step —
//! before the generator phase re-scores the same fake batch through the
//! updated discriminator. All collaborators are injected capabilities:
//! [`Critic`], [`Sampler`], the two loss functions, and the two
//! [`ParamUpdate`] procedures.
//!
//! # Example
//!
//! ```
//! use adversario::gan::{GanConfig, GanTrainer};
//! use adversario::Tensor;
//!
//! let config = GanConfig { latent_dim: 4, data_dim: 4, ..Default::default() };
//! let mut trainer = GanTrainer::from_config(&config, 42).unwrap();
//!
//! let real_batch = Tensor::from_vec(vec![0.5; 16], false);
//! let result = trainer.step(&real_batch).unwrap();
//! assert!(result.dsc_loss.is_finite());
//! assert!(result.gen_loss.is_finite());
//! ```

mod config;
mod loss;
mod model;
mod stats;
mod step;
mod trainer;

pub use config::GanConfig;
pub use loss::{BceDiscriminatorLoss, BceGeneratorLoss, DiscriminatorLossFn, GeneratorLossFn};
pub use model::{Critic, LinearCritic, LinearSampler, Sampler};
pub use stats::GanStats;
pub use step::{train_batch, OptimUpdate, ParamUpdate};
pub use trainer::{GanTrainer, StepResult};
