//! Scoring and sampling capabilities, with linear reference models
//!
//! The training step is agnostic to model architecture: it sees a [`Critic`]
//! that maps instance batches to score batches and a [`Sampler`] that maps
//! latent noise to instance batches. The linear models here are the smallest
//! implementations that exercise the full gradient path — real deployments
//! plug in their own networks behind the same traits.

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::rc::Rc;

use crate::autograd::{BackwardOp, GradGuard};
use crate::Tensor;

/// Discriminator capability: instance batch in, one logit per instance out.
pub trait Critic {
    /// Score a flat `count * instance_dim` batch, returning `count` logits.
    ///
    /// The result participates in the autograd tape: gradients flow into the
    /// critic's parameters and, when the batch itself tracks gradients, back
    /// into the batch.
    fn score(&self, batch: &Tensor) -> Tensor;

    /// Width of a single instance's feature row
    fn instance_dim(&self) -> usize;
}

/// Generator capability: latent noise in, instance batch out.
pub trait Sampler {
    /// Draw `count` synthetic instances as a flat `count * instance_dim`
    /// tensor.
    ///
    /// Gradient tracking is enabled for exactly the duration of the call when
    /// `with_grad` is set, and the ambient mode is restored afterwards even
    /// on unwind.
    fn sample(&mut self, count: usize, with_grad: bool) -> Tensor;

    /// Width of a single generated instance
    fn instance_dim(&self) -> usize;
}

/// Box-Muller standard normal sample scaled by `std`
fn sample_normal<R: Rng>(rng: &mut R, std: f64) -> f32 {
    let u1: f64 = rng.random::<f64>().max(1e-10);
    let u2: f64 = rng.random::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    (z * std) as f32
}

/// Linear discriminator: `score_i = w · x_i + b`.
pub struct LinearCritic {
    weight: Tensor,
    bias: Tensor,
    dim: usize,
}

impl LinearCritic {
    /// Create a critic with random Xavier initialization
    pub fn new(dim: usize) -> Self {
        Self::init(dim, &mut StdRng::from_os_rng())
    }

    /// Create a critic with a seed for reproducibility
    pub fn with_seed(dim: usize, seed: u64) -> Self {
        Self::init(dim, &mut StdRng::seed_from_u64(seed))
    }

    fn init<R: Rng>(dim: usize, rng: &mut R) -> Self {
        let std = (2.0 / (dim + 1) as f64).sqrt();
        let weight: Vec<f32> = (0..dim).map(|_| sample_normal(rng, std)).collect();
        Self {
            weight: Tensor::from_vec(weight, true),
            bias: Tensor::zeros(1, true),
            dim,
        }
    }

    /// Parameter tensors, aliasing the model's own storage.
    pub fn parameters(&self) -> Vec<Tensor> {
        vec![self.weight.clone(), self.bias.clone()]
    }

    /// Total number of parameters
    #[must_use]
    pub fn num_parameters(&self) -> usize {
        self.dim + 1
    }
}

impl Critic for LinearCritic {
    fn score(&self, batch: &Tensor) -> Tensor {
        assert!(self.dim > 0, "critic instance size must be positive");
        assert_eq!(
            batch.len() % self.dim,
            0,
            "batch length must be a multiple of the instance size"
        );
        let count = batch.len() / self.dim;

        let scores: Array1<f32> = {
            let data = batch.data();
            let xs = data.as_slice().expect("contiguous tensor data");
            let weight = self.weight.data();
            let ws = weight.as_slice().expect("contiguous tensor data");
            let b = self.bias.data()[0];
            Array1::from_iter((0..count).map(|i| {
                let row = &xs[i * self.dim..(i + 1) * self.dim];
                row.iter().zip(ws).map(|(x, w)| x * w).sum::<f32>() + b
            }))
        };

        let requires_grad =
            self.weight.requires_grad() || self.bias.requires_grad() || batch.requires_grad();
        let mut result = Tensor::new(scores, requires_grad);

        if result.requires_grad() {
            result.set_backward_op(Rc::new(ScoreBackward {
                input: batch.clone(),
                weight: self.weight.clone(),
                bias: self.bias.clone(),
                dim: self.dim,
                result_grad: result.grad_cell(),
            }));
        }

        result
    }

    fn instance_dim(&self) -> usize {
        self.dim
    }
}

struct ScoreBackward {
    input: Tensor,
    weight: Tensor,
    bias: Tensor,
    dim: usize,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for ScoreBackward {
    fn backward(&self) {
        let grad = match &*self.result_grad.borrow() {
            Some(g) => g.clone(),
            None => return,
        };
        let count = grad.len();

        {
            let data = self.input.data();
            let xs = data.as_slice().expect("contiguous tensor data");

            if self.weight.requires_grad() {
                // ∂L/∂w = Σ_i g_i * x_i
                let mut gw = vec![0.0f32; self.dim];
                for i in 0..count {
                    let g = grad[i];
                    for d in 0..self.dim {
                        gw[d] += g * xs[i * self.dim + d];
                    }
                }
                self.weight.accumulate_grad(Array1::from(gw));
            }

            if self.bias.requires_grad() {
                self.bias.accumulate_grad(Array1::from_elem(1, grad.sum()));
            }

            if self.input.requires_grad() {
                // ∂L/∂x_i = g_i * w
                let weight = self.weight.data();
                let ws = weight.as_slice().expect("contiguous tensor data");
                let mut gx = vec![0.0f32; count * self.dim];
                for i in 0..count {
                    let g = grad[i];
                    for d in 0..self.dim {
                        gx[i * self.dim + d] = g * ws[d];
                    }
                }
                self.input.accumulate_grad(Array1::from(gx));
            }
        }

        if let Some(op) = self.input.backward_op() {
            op.backward();
        }
    }
}

/// Linear generator: `x_i = W z_i + b` over standard-normal latents.
pub struct LinearSampler {
    weight: Tensor,
    bias: Tensor,
    latent_dim: usize,
    data_dim: usize,
    rng: StdRng,
}

impl LinearSampler {
    /// Create a sampler with random Xavier initialization
    pub fn new(latent_dim: usize, data_dim: usize) -> Self {
        Self::init(latent_dim, data_dim, StdRng::from_os_rng())
    }

    /// Create a sampler with a seed for reproducibility
    pub fn with_seed(latent_dim: usize, data_dim: usize, seed: u64) -> Self {
        Self::init(latent_dim, data_dim, StdRng::seed_from_u64(seed))
    }

    fn init(latent_dim: usize, data_dim: usize, mut rng: StdRng) -> Self {
        let std = (2.0 / (latent_dim + data_dim) as f64).sqrt();
        let weight: Vec<f32> =
            (0..data_dim * latent_dim).map(|_| sample_normal(&mut rng, std)).collect();
        Self {
            weight: Tensor::from_vec(weight, true),
            bias: Tensor::zeros(data_dim, true),
            latent_dim,
            data_dim,
            rng,
        }
    }

    /// Parameter tensors, aliasing the model's own storage.
    pub fn parameters(&self) -> Vec<Tensor> {
        vec![self.weight.clone(), self.bias.clone()]
    }

    /// Total number of parameters
    #[must_use]
    pub fn num_parameters(&self) -> usize {
        self.data_dim * self.latent_dim + self.data_dim
    }
}

impl Sampler for LinearSampler {
    fn sample(&mut self, count: usize, with_grad: bool) -> Tensor {
        // Scoped toggle: restored when the guard drops, panics included.
        let _guard = GradGuard::new(with_grad);

        let latents: Array1<f32> =
            Array1::from_iter((0..count * self.latent_dim).map(|_| sample_normal(&mut self.rng, 1.0)));

        let out: Vec<f32> = {
            let weight = self.weight.data();
            let ws = weight.as_slice().expect("contiguous tensor data");
            let bias = self.bias.data();
            let zs = latents.as_slice().expect("contiguous latent buffer");

            let mut out = vec![0.0f32; count * self.data_dim];
            for i in 0..count {
                let z_row = &zs[i * self.latent_dim..(i + 1) * self.latent_dim];
                for d in 0..self.data_dim {
                    let w_row = &ws[d * self.latent_dim..(d + 1) * self.latent_dim];
                    let dot: f32 = w_row.iter().zip(z_row).map(|(w, z)| w * z).sum();
                    out[i * self.data_dim + d] = dot + bias[d];
                }
            }
            out
        };

        let requires_grad = self.weight.requires_grad() || self.bias.requires_grad();
        let mut result = Tensor::from_vec(out, requires_grad);

        if result.requires_grad() {
            result.set_backward_op(Rc::new(SampleBackward {
                latents,
                weight: self.weight.clone(),
                bias: self.bias.clone(),
                latent_dim: self.latent_dim,
                data_dim: self.data_dim,
                result_grad: result.grad_cell(),
            }));
        }

        result
    }

    fn instance_dim(&self) -> usize {
        self.data_dim
    }
}

struct SampleBackward {
    latents: Array1<f32>,
    weight: Tensor,
    bias: Tensor,
    latent_dim: usize,
    data_dim: usize,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for SampleBackward {
    fn backward(&self) {
        let grad = match &*self.result_grad.borrow() {
            Some(g) => g.clone(),
            None => return,
        };
        let count = grad.len() / self.data_dim;
        let zs = self.latents.as_slice().expect("contiguous latent buffer");

        if self.weight.requires_grad() {
            // ∂L/∂W[d,l] = Σ_i g_{i,d} * z_{i,l}
            let mut gw = vec![0.0f32; self.data_dim * self.latent_dim];
            for i in 0..count {
                let z_row = &zs[i * self.latent_dim..(i + 1) * self.latent_dim];
                for d in 0..self.data_dim {
                    let g = grad[i * self.data_dim + d];
                    for (l, z) in z_row.iter().enumerate() {
                        gw[d * self.latent_dim + l] += g * z;
                    }
                }
            }
            self.weight.accumulate_grad(Array1::from(gw));
        }

        if self.bias.requires_grad() {
            // ∂L/∂b[d] = Σ_i g_{i,d}
            let mut gb = vec![0.0f32; self.data_dim];
            for i in 0..count {
                for d in 0..self.data_dim {
                    gb[d] += grad[i * self.data_dim + d];
                }
            }
            self.bias.accumulate_grad(Array1::from(gb));
        }
    }
}
