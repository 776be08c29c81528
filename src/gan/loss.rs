//! Adversarial loss functions on raw discriminator scores
//!
//! Both losses operate on logits and combine the sigmoid with the
//! cross-entropy in one numerically stable expression:
//!
//! ```text
//! L_i = max(x_i, 0) - x_i * t_i + log(1 + exp(-|x_i|))
//! L = mean(L_i) over the batch
//! ```
//!
//! Gradient: `∂L/∂x_i = (σ(x_i) - t_i) / N`
//!
//! The discriminator loss draws its targets uniformly from a noise band
//! around the real/fake labels; the generator loss uses the constant real
//! label, since the generator wants every fake scored as real.

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::rc::Rc;

use crate::autograd::BackwardOp;
use crate::error::{AdversarioError, Result};
use crate::Tensor;

/// Numerically stable sigmoid: σ(x) = 1 / (1 + exp(-x))
pub(crate) fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Stable BCE on a raw score: max(x, 0) - x*t + log(1 + exp(-|x|))
fn stable_bce(logit: f32, target: f32) -> f32 {
    logit.max(0.0) - logit * target + (1.0 + (-logit.abs()).exp()).ln()
}

fn mean_bce(scores: &Array1<f32>, targets: &Array1<f32>) -> f32 {
    scores
        .iter()
        .zip(targets.iter())
        .map(|(&x, &t)| stable_bce(x, t))
        .sum::<f32>()
        / scores.len() as f32
}

/// `(σ(x_i) - t_i) / N` for each score
fn bce_grad(scores: &Array1<f32>, targets: &Array1<f32>) -> Array1<f32> {
    let n = scores.len() as f32;
    let mut grad = scores.mapv(sigmoid) - targets;
    grad.mapv_inplace(|g| g / n);
    grad
}

fn validate_real_label(real_label: f32) -> Result<()> {
    if real_label != 0.0 && real_label != 1.0 {
        return Err(AdversarioError::invalid_argument(
            "real_label",
            format!("must be exactly 0 or 1, got {real_label}"),
        ));
    }
    Ok(())
}

/// Loss capability for the discriminator phase.
pub trait DiscriminatorLossFn {
    /// Combined loss over real and generated score batches.
    ///
    /// Returns a scalar tensor wired for backpropagation into both score
    /// batches when either tracks gradients.
    fn forward(&mut self, real_scores: &Tensor, fake_scores: &Tensor) -> Tensor;

    /// Name of the loss function
    fn name(&self) -> &'static str;
}

/// Loss capability for the generator phase.
pub trait GeneratorLossFn {
    /// Loss over the generated scores alone.
    fn forward(&mut self, fake_scores: &Tensor) -> Tensor;

    /// Name of the loss function
    fn name(&self) -> &'static str;
}

/// Binary cross-entropy discriminator loss with label noise.
///
/// Real targets are drawn uniformly from
/// `[real_label - noise/2, real_label + noise/2]`, fake targets symmetrically
/// around `1 - real_label`. With `label_noise == 0` the targets are exact and
/// no randomness is consulted, so repeated calls are bit-identical.
#[derive(Debug)]
pub struct BceDiscriminatorLoss {
    real_label: f32,
    label_noise: f32,
    rng: StdRng,
}

impl BceDiscriminatorLoss {
    /// Create the loss with OS-seeded target noise.
    pub fn new(real_label: f32, label_noise: f32) -> Result<Self> {
        Self::with_rng(real_label, label_noise, StdRng::from_os_rng())
    }

    /// Create the loss with a seed for reproducible target noise.
    pub fn with_seed(real_label: f32, label_noise: f32, seed: u64) -> Result<Self> {
        Self::with_rng(real_label, label_noise, StdRng::seed_from_u64(seed))
    }

    fn with_rng(real_label: f32, label_noise: f32, rng: StdRng) -> Result<Self> {
        validate_real_label(real_label)?;
        if !(label_noise >= 0.0) {
            return Err(AdversarioError::invalid_argument(
                "label_noise",
                format!("must be non-negative, got {label_noise}"),
            ));
        }
        Ok(Self { real_label, label_noise, rng })
    }

    /// Targets sampled uniformly from a `label_noise`-wide band around `center`.
    fn targets_around(&mut self, center: f32, len: usize) -> Array1<f32> {
        if self.label_noise == 0.0 {
            return Array1::from_elem(len, center);
        }
        let lo = center - self.label_noise / 2.0;
        Array1::from_iter((0..len).map(|_| lo + self.label_noise * self.rng.random::<f32>()))
    }
}

impl DiscriminatorLossFn for BceDiscriminatorLoss {
    fn forward(&mut self, real_scores: &Tensor, fake_scores: &Tensor) -> Tensor {
        assert_eq!(
            real_scores.len(),
            fake_scores.len(),
            "real and fake score batches must have same length"
        );

        let real_targets = self.targets_around(self.real_label, real_scores.len());
        let fake_targets = self.targets_around(1.0 - self.real_label, fake_scores.len());

        let loss_val =
            mean_bce(&real_scores.data(), &real_targets) + mean_bce(&fake_scores.data(), &fake_targets);

        let requires_grad = real_scores.requires_grad() || fake_scores.requires_grad();
        let mut loss = Tensor::from_vec(vec![loss_val], requires_grad);

        if loss.requires_grad() {
            let real_grad = bce_grad(&real_scores.data(), &real_targets);
            let fake_grad = bce_grad(&fake_scores.data(), &fake_targets);
            loss.set_backward_op(Rc::new(DscLossBackward {
                real: real_scores.clone(),
                fake: fake_scores.clone(),
                real_grad,
                fake_grad,
            }));
        }

        loss
    }

    fn name(&self) -> &'static str {
        "BceDiscriminator"
    }
}

struct DscLossBackward {
    real: Tensor,
    fake: Tensor,
    real_grad: Array1<f32>,
    fake_grad: Array1<f32>,
}

impl BackwardOp for DscLossBackward {
    fn backward(&self) {
        if self.real.requires_grad() {
            self.real.accumulate_grad(self.real_grad.clone());
            if let Some(op) = self.real.backward_op() {
                op.backward();
            }
        }
        if self.fake.requires_grad() {
            self.fake.accumulate_grad(self.fake_grad.clone());
            if let Some(op) = self.fake.backward_op() {
                op.backward();
            }
        }
    }
}

/// Binary cross-entropy generator loss.
///
/// Targets are the constant `real_label`: the generator is rewarded when the
/// discriminator scores its output as real.
#[derive(Debug)]
pub struct BceGeneratorLoss {
    real_label: f32,
}

impl BceGeneratorLoss {
    /// Create the loss for the given real label.
    pub fn new(real_label: f32) -> Result<Self> {
        validate_real_label(real_label)?;
        Ok(Self { real_label })
    }
}

impl GeneratorLossFn for BceGeneratorLoss {
    fn forward(&mut self, fake_scores: &Tensor) -> Tensor {
        let targets = Array1::from_elem(fake_scores.len(), self.real_label);
        let loss_val = mean_bce(&fake_scores.data(), &targets);

        let mut loss = Tensor::from_vec(vec![loss_val], fake_scores.requires_grad());

        if loss.requires_grad() {
            let grad = bce_grad(&fake_scores.data(), &targets);
            loss.set_backward_op(Rc::new(GenLossBackward { fake: fake_scores.clone(), grad }));
        }

        loss
    }

    fn name(&self) -> &'static str {
        "BceGenerator"
    }
}

struct GenLossBackward {
    fake: Tensor,
    grad: Array1<f32>,
}

impl BackwardOp for GenLossBackward {
    fn backward(&self) {
        if self.fake.requires_grad() {
            self.fake.accumulate_grad(self.grad.clone());
            if let Some(op) = self.fake.backward_op() {
                op.backward();
            }
        }
    }
}
