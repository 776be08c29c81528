//! Adam optimizer
//!
//! Adaptive moment estimation with bias-corrected first and second moments:
//!
//! ```text
//! m_t = β1 * m_{t-1} + (1 - β1) * g
//! v_t = β2 * v_{t-1} + (1 - β2) * g²
//! θ  -= lr * m̂_t / (√v̂_t + ε)
//! ```

use super::Optimizer;
use crate::Tensor;
use ndarray::Array1;

/// Adam optimizer
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    t: i32,
    m: Vec<Option<Array1<f32>>>,
    v: Vec<Option<Array1<f32>>>,
}

impl Adam {
    /// Create a new Adam optimizer
    pub fn new(lr: f32, beta1: f32, beta2: f32, eps: f32) -> Self {
        Self { lr, beta1, beta2, eps, t: 0, m: Vec::new(), v: Vec::new() }
    }

    fn ensure_state(&mut self, count: usize) {
        if self.m.is_empty() {
            self.m = (0..count).map(|_| None).collect();
            self.v = (0..count).map(|_| None).collect();
        }
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [Tensor]) {
        self.ensure_state(params.len());
        self.t += 1;

        let bc1 = 1.0 - self.beta1.powi(self.t);
        let bc2 = 1.0 - self.beta2.powi(self.t);

        for (i, param) in params.iter_mut().enumerate() {
            if let Some(grad) = param.grad() {
                let m = match &self.m[i] {
                    Some(m) => m * self.beta1 + &(&grad * (1.0 - self.beta1)),
                    None => &grad * (1.0 - self.beta1),
                };
                let grad_sq = grad.mapv(|g| g * g);
                let v = match &self.v[i] {
                    Some(v) => v * self.beta2 + &(&grad_sq * (1.0 - self.beta2)),
                    None => &grad_sq * (1.0 - self.beta2),
                };

                let m_hat = &m / bc1;
                let v_hat = &v / bc2;
                let denom = v_hat.mapv(f32::sqrt) + self.eps;
                let delta = m_hat * self.lr / &denom;

                let updated = &*param.data() - &delta;
                *param.data_mut() = updated;

                self.m[i] = Some(m);
                self.v[i] = Some(v);
            }
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}
