//! One adversarial training step
//!
//! Alternating-optimization schedule: the discriminator is fully updated —
//! gradients zeroed, loss backpropagated, parameter step applied — before the
//! generator phase re-scores the same fake batch through the updated
//! discriminator. The ordering is load-bearing for training stability, not
//! incidental; both phases run strictly sequentially inside one call.

use log::trace;

use super::loss::{DiscriminatorLossFn, GeneratorLossFn};
use super::model::{Critic, Sampler};
use crate::error::{AdversarioError, Result};
use crate::optim::Optimizer;
use crate::Tensor;

/// Parameter-update capability: zero accumulated gradients, apply one step.
pub trait ParamUpdate {
    /// Clear accumulated gradients on the owned parameters
    fn zero_grad(&mut self);

    /// Apply one optimizer step to the owned parameters
    fn step(&mut self);
}

/// Pairs a parameter list with an optimizer to form a [`ParamUpdate`].
///
/// The tensors alias the model's own parameter storage, so stepping here
/// updates the model in place.
pub struct OptimUpdate {
    params: Vec<Tensor>,
    optimizer: Box<dyn Optimizer>,
}

impl OptimUpdate {
    /// Create an update procedure over the given parameters
    pub fn new(params: Vec<Tensor>, optimizer: Box<dyn Optimizer>) -> Self {
        Self { params, optimizer }
    }

    /// The managed parameter tensors
    pub fn params(&self) -> &[Tensor] {
        &self.params
    }
}

impl ParamUpdate for OptimUpdate {
    fn zero_grad(&mut self) {
        self.optimizer.zero_grad(&mut self.params);
    }

    fn step(&mut self) {
        self.optimizer.step(&mut self.params);
    }
}

/// Train a GAN over one batch, updating discriminator then generator.
///
/// Phase 1 (discriminator): draw a fake batch the size of the real batch with
/// gradient tracking enabled (kept for phase 2), score the real batch and a
/// detached view of the fake batch, backpropagate the discriminator loss, and
/// apply the discriminator update. Phase 2 (generator): re-score the same
/// fake batch — now gradient-attached — through the updated discriminator,
/// backpropagate the generator loss, and apply the generator update.
///
/// Returns `(discriminator_loss, generator_loss)` as plain scalars. NaN or
/// infinite losses are not intercepted; they propagate in the returned
/// values for the driver to act on.
///
/// # Errors
///
/// `ShapeMismatch` if the critic and sampler disagree on the instance size or
/// the real batch is not a nonzero multiple of it.
#[allow(clippy::too_many_arguments)]
pub fn train_batch(
    critic: &dyn Critic,
    sampler: &mut dyn Sampler,
    dsc_loss_fn: &mut dyn DiscriminatorLossFn,
    gen_loss_fn: &mut dyn GeneratorLossFn,
    dsc_update: &mut dyn ParamUpdate,
    gen_update: &mut dyn ParamUpdate,
    real_batch: &Tensor,
) -> Result<(f32, f32)> {
    let dim = critic.instance_dim();
    if dim == 0 {
        return Err(AdversarioError::invalid_argument(
            "critic",
            "instance size must be positive".to_string(),
        ));
    }
    if sampler.instance_dim() != dim {
        return Err(AdversarioError::ShapeMismatch {
            expected: vec![dim],
            actual: vec![sampler.instance_dim()],
        });
    }
    if real_batch.is_empty() || real_batch.len() % dim != 0 {
        return Err(AdversarioError::ShapeMismatch {
            expected: vec![dim],
            actual: vec![real_batch.len()],
        });
    }
    let count = real_batch.len() / dim;

    // Discriminator phase
    dsc_update.zero_grad();

    let fake_batch = sampler.sample(count, true);

    let real_scores = critic.score(real_batch);
    let fake_scores = critic.score(&fake_batch.detach());

    let dsc_loss = dsc_loss_fn.forward(&real_scores, &fake_scores);
    let dsc_loss_val = dsc_loss.data()[0];

    if let Some(op) = dsc_loss.backward_op() {
        op.backward();
    }
    dsc_update.step();

    // Generator phase: the discriminator parameters are already updated.
    gen_update.zero_grad();

    let fake_scores = critic.score(&fake_batch);

    let gen_loss = gen_loss_fn.forward(&fake_scores);
    let gen_loss_val = gen_loss.data()[0];

    if let Some(op) = gen_loss.backward_op() {
        op.backward();
    }
    gen_update.step();

    trace!("train_batch: dsc_loss={dsc_loss_val:.6} gen_loss={gen_loss_val:.6}");
    Ok((dsc_loss_val, gen_loss_val))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gan::loss::{BceDiscriminatorLoss, BceGeneratorLoss};
    use crate::gan::model::{LinearCritic, LinearSampler};
    use crate::optim::SGD;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Events = Rc<RefCell<Vec<&'static str>>>;

    struct RecordingCritic {
        dim: usize,
        events: Events,
    }

    impl Critic for RecordingCritic {
        fn score(&self, batch: &Tensor) -> Tensor {
            self.events.borrow_mut().push(if batch.requires_grad() {
                "score_attached"
            } else {
                "score_detached"
            });
            Tensor::zeros(batch.len() / self.dim, false)
        }

        fn instance_dim(&self) -> usize {
            self.dim
        }
    }

    struct RecordingSampler {
        dim: usize,
        events: Events,
    }

    impl Sampler for RecordingSampler {
        fn sample(&mut self, count: usize, with_grad: bool) -> Tensor {
            self.events.borrow_mut().push("sample");
            Tensor::zeros(count * self.dim, with_grad)
        }

        fn instance_dim(&self) -> usize {
            self.dim
        }
    }

    struct RecordingUpdate {
        zero_label: &'static str,
        step_label: &'static str,
        events: Events,
    }

    impl ParamUpdate for RecordingUpdate {
        fn zero_grad(&mut self) {
            self.events.borrow_mut().push(self.zero_label);
        }

        fn step(&mut self) {
            self.events.borrow_mut().push(self.step_label);
        }
    }

    #[test]
    fn test_phase_ordering() {
        let events: Events = Rc::new(RefCell::new(Vec::new()));

        let critic = RecordingCritic { dim: 2, events: Rc::clone(&events) };
        let mut sampler = RecordingSampler { dim: 2, events: Rc::clone(&events) };
        let mut dsc_loss = BceDiscriminatorLoss::with_seed(1.0, 0.0, 0).unwrap();
        let mut gen_loss = BceGeneratorLoss::new(1.0).unwrap();
        let mut dsc_update =
            RecordingUpdate { zero_label: "dsc_zero", step_label: "dsc_step", events: Rc::clone(&events) };
        let mut gen_update =
            RecordingUpdate { zero_label: "gen_zero", step_label: "gen_step", events: Rc::clone(&events) };

        let real = Tensor::from_vec(vec![0.0; 8], false);
        train_batch(
            &critic,
            &mut sampler,
            &mut dsc_loss,
            &mut gen_loss,
            &mut dsc_update,
            &mut gen_update,
            &real,
        )
        .unwrap();

        // The discriminator step must land before the gradient-attached
        // re-score, and that re-score before the generator step.
        assert_eq!(
            *events.borrow(),
            vec![
                "dsc_zero",
                "sample",
                "score_detached", // real batch
                "score_detached", // detached fake batch
                "dsc_step",
                "gen_zero",
                "score_attached", // same fake batch, gradient-attached
                "gen_step",
            ]
        );
    }

    fn real_setup(
        seed: u64,
    ) -> (LinearCritic, LinearSampler, BceDiscriminatorLoss, BceGeneratorLoss, OptimUpdate, OptimUpdate)
    {
        let critic = LinearCritic::with_seed(3, seed);
        let sampler = LinearSampler::with_seed(3, 3, seed + 1);
        let dsc_loss = BceDiscriminatorLoss::with_seed(1.0, 0.0, seed + 2).unwrap();
        let gen_loss = BceGeneratorLoss::new(1.0).unwrap();
        let dsc_update = OptimUpdate::new(critic.parameters(), Box::new(SGD::new(0.05, 0.0)));
        let gen_update = OptimUpdate::new(sampler.parameters(), Box::new(SGD::new(0.05, 0.0)));
        (critic, sampler, dsc_loss, gen_loss, dsc_update, gen_update)
    }

    #[test]
    fn test_train_batch_returns_finite_losses() {
        let (critic, mut sampler, mut dsc_loss, mut gen_loss, mut dsc_update, mut gen_update) =
            real_setup(42);

        let real = Tensor::from_vec(vec![0.5; 12], false);
        let (d, g) = train_batch(
            &critic,
            &mut sampler,
            &mut dsc_loss,
            &mut gen_loss,
            &mut dsc_update,
            &mut gen_update,
            &real,
        )
        .unwrap();

        assert!(d.is_finite() && d >= 0.0);
        assert!(g.is_finite() && g >= 0.0);
    }

    #[test]
    fn test_train_batch_updates_both_models() {
        let (critic, mut sampler, mut dsc_loss, mut gen_loss, mut dsc_update, mut gen_update) =
            real_setup(7);

        let critic_before = critic.parameters()[0].data().to_vec();
        let sampler_before = sampler.parameters()[0].data().to_vec();

        let real = Tensor::from_vec(vec![1.0; 9], false);
        train_batch(
            &critic,
            &mut sampler,
            &mut dsc_loss,
            &mut gen_loss,
            &mut dsc_update,
            &mut gen_update,
            &real,
        )
        .unwrap();

        assert_ne!(critic.parameters()[0].data().to_vec(), critic_before);
        assert_ne!(sampler.parameters()[0].data().to_vec(), sampler_before);
    }

    #[test]
    fn test_train_batch_rejects_misaligned_batch() {
        let (critic, mut sampler, mut dsc_loss, mut gen_loss, mut dsc_update, mut gen_update) =
            real_setup(1);

        let real = Tensor::from_vec(vec![1.0; 10], false); // not a multiple of 3
        let err = train_batch(
            &critic,
            &mut sampler,
            &mut dsc_loss,
            &mut gen_loss,
            &mut dsc_update,
            &mut gen_update,
            &real,
        )
        .unwrap_err();
        assert!(matches!(err, AdversarioError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_train_batch_rejects_empty_batch() {
        let (critic, mut sampler, mut dsc_loss, mut gen_loss, mut dsc_update, mut gen_update) =
            real_setup(1);

        let real = Tensor::from_vec(Vec::new(), false);
        let err = train_batch(
            &critic,
            &mut sampler,
            &mut dsc_loss,
            &mut gen_loss,
            &mut dsc_update,
            &mut gen_update,
            &real,
        )
        .unwrap_err();
        assert!(matches!(err, AdversarioError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_train_batch_rejects_dim_disagreement() {
        let critic = LinearCritic::with_seed(3, 1);
        let mut sampler = LinearSampler::with_seed(2, 2, 1);
        let mut dsc_loss = BceDiscriminatorLoss::with_seed(1.0, 0.0, 0).unwrap();
        let mut gen_loss = BceGeneratorLoss::new(1.0).unwrap();
        let mut dsc_update = OptimUpdate::new(critic.parameters(), Box::new(SGD::new(0.05, 0.0)));
        let mut gen_update = OptimUpdate::new(sampler.parameters(), Box::new(SGD::new(0.05, 0.0)));

        let real = Tensor::from_vec(vec![1.0; 6], false);
        let err = train_batch(
            &critic,
            &mut sampler,
            &mut dsc_loss,
            &mut gen_loss,
            &mut dsc_update,
            &mut gen_update,
            &real,
        )
        .unwrap_err();
        assert!(matches!(err, AdversarioError::ShapeMismatch { .. }));
    }
}
