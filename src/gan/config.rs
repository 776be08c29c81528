//! Configuration for the adversarial trainer

use serde::{Deserialize, Serialize};

use crate::error::{AdversarioError, Result};

/// Configuration for a [`super::GanTrainer`] built from the reference models
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GanConfig {
    /// Dimension of the latent space
    pub latent_dim: usize,
    /// Width of one data instance's feature row
    pub data_dim: usize,
    /// Learning rate for the discriminator
    pub dsc_lr: f32,
    /// Learning rate for the generator
    pub gen_lr: f32,
    /// Label assigned to real instances (0 or 1)
    pub real_label: f32,
    /// Width of the uniform noise band applied to discriminator targets
    pub label_noise: f32,
    /// Batch size for training
    pub batch_size: usize,
}

impl Default for GanConfig {
    fn default() -> Self {
        Self {
            latent_dim: 64,
            data_dim: 64,
            dsc_lr: 0.0002,
            gen_lr: 0.0002,
            real_label: 1.0,
            label_noise: 0.2,
            batch_size: 32,
        }
    }
}

impl GanConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.latent_dim == 0 {
            return Err(AdversarioError::invalid_argument("latent_dim", "must be at least 1"));
        }
        if self.data_dim == 0 {
            return Err(AdversarioError::invalid_argument("data_dim", "must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(AdversarioError::invalid_argument("batch_size", "must be at least 1"));
        }
        if !(self.dsc_lr > 0.0) || !(self.gen_lr > 0.0) {
            return Err(AdversarioError::invalid_argument(
                "learning_rate",
                format!(
                    "both learning rates must be positive, got dsc_lr={} gen_lr={}",
                    self.dsc_lr, self.gen_lr
                ),
            ));
        }
        if self.real_label != 0.0 && self.real_label != 1.0 {
            return Err(AdversarioError::invalid_argument(
                "real_label",
                format!("must be exactly 0 or 1, got {}", self.real_label),
            ));
        }
        if !(self.label_noise >= 0.0) {
            return Err(AdversarioError::invalid_argument(
                "label_noise",
                format!("must be non-negative, got {}", self.label_noise),
            ));
        }
        Ok(())
    }
}
