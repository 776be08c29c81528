//! Trainer bundling the adversarial capabilities with statistics

use super::config::GanConfig;
use super::loss::{BceDiscriminatorLoss, BceGeneratorLoss, DiscriminatorLossFn, GeneratorLossFn};
use super::model::{Critic, LinearCritic, LinearSampler, Sampler};
use super::stats::GanStats;
use super::step::{train_batch, OptimUpdate, ParamUpdate};
use crate::error::Result;
use crate::optim::Adam;
use crate::Tensor;

/// Result of one adversarial update step
#[derive(Debug, Clone, Copy)]
pub struct StepResult {
    /// Discriminator loss
    pub dsc_loss: f32,
    /// Generator loss
    pub gen_loss: f32,
}

/// Adversarial trainer: a critic/sampler pair with their loss functions,
/// update procedures, and running statistics.
///
/// Each [`GanTrainer::step`] call delegates to [`train_batch`] and records
/// the loss pair.
pub struct GanTrainer<C: Critic, S: Sampler> {
    /// Discriminator model
    pub critic: C,
    /// Generator model
    pub sampler: S,
    dsc_loss: Box<dyn DiscriminatorLossFn>,
    gen_loss: Box<dyn GeneratorLossFn>,
    dsc_update: Box<dyn ParamUpdate>,
    gen_update: Box<dyn ParamUpdate>,
    /// Training statistics
    pub stats: GanStats,
}

impl<C: Critic, S: Sampler> GanTrainer<C, S> {
    /// Assemble a trainer from its injected capabilities
    pub fn new(
        critic: C,
        sampler: S,
        dsc_loss: Box<dyn DiscriminatorLossFn>,
        gen_loss: Box<dyn GeneratorLossFn>,
        dsc_update: Box<dyn ParamUpdate>,
        gen_update: Box<dyn ParamUpdate>,
    ) -> Self {
        Self {
            critic,
            sampler,
            dsc_loss,
            gen_loss,
            dsc_update,
            gen_update,
            stats: GanStats::default(),
        }
    }

    /// Train over one real batch, updating both models and the statistics
    pub fn step(&mut self, real_batch: &Tensor) -> Result<StepResult> {
        let (dsc_loss, gen_loss) = train_batch(
            &self.critic,
            &mut self.sampler,
            self.dsc_loss.as_mut(),
            self.gen_loss.as_mut(),
            self.dsc_update.as_mut(),
            self.gen_update.as_mut(),
            real_batch,
        )?;
        self.stats.record(dsc_loss, gen_loss);
        Ok(StepResult { dsc_loss, gen_loss })
    }

    /// Average discriminator loss over recent history
    #[must_use]
    pub fn avg_dsc_loss(&self) -> f32 {
        self.stats.avg_dsc_loss()
    }

    /// Average generator loss over recent history
    #[must_use]
    pub fn avg_gen_loss(&self) -> f32 {
        self.stats.avg_gen_loss()
    }
}

impl GanTrainer<LinearCritic, LinearSampler> {
    /// Build a trainer from a config using the linear reference models,
    /// BCE losses, and Adam updates.
    pub fn from_config(config: &GanConfig, seed: u64) -> Result<Self> {
        config.validate()?;

        let critic = LinearCritic::with_seed(config.data_dim, seed);
        let sampler = LinearSampler::with_seed(config.latent_dim, config.data_dim, seed + 1);
        let dsc_loss =
            BceDiscriminatorLoss::with_seed(config.real_label, config.label_noise, seed + 2)?;
        let gen_loss = BceGeneratorLoss::new(config.real_label)?;

        let dsc_update = OptimUpdate::new(
            critic.parameters(),
            Box::new(Adam::new(config.dsc_lr, 0.9, 0.999, 1e-8)),
        );
        let gen_update = OptimUpdate::new(
            sampler.parameters(),
            Box::new(Adam::new(config.gen_lr, 0.9, 0.999, 1e-8)),
        );

        Ok(Self::new(
            critic,
            sampler,
            Box::new(dsc_loss),
            Box::new(gen_loss),
            Box::new(dsc_update),
            Box::new(gen_update),
        ))
    }
}
