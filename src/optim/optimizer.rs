//! Optimizer trait

use crate::Tensor;

/// Trait for optimization algorithms
pub trait Optimizer {
    /// Apply one update to every parameter that has a gradient
    fn step(&mut self, params: &mut [Tensor]);

    /// Zero out all gradients
    fn zero_grad(&mut self, params: &mut [Tensor]) {
        for param in params {
            param.zero_grad();
        }
    }

    /// Get learning rate
    fn lr(&self) -> f32;

    /// Set learning rate
    fn set_lr(&mut self, lr: f32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    struct TestOptimizer {
        learning_rate: f32,
    }

    impl Optimizer for TestOptimizer {
        fn step(&mut self, params: &mut [Tensor]) {
            for param in params {
                if let Some(grad) = param.grad() {
                    let updated = &*param.data() - &(&grad * self.learning_rate);
                    *param.data_mut() = updated;
                }
            }
        }

        fn lr(&self) -> f32 {
            self.learning_rate
        }

        fn set_lr(&mut self, lr: f32) {
            self.learning_rate = lr;
        }
    }

    #[test]
    fn test_step_applies_gradient() {
        let mut opt = TestOptimizer { learning_rate: 0.1 };
        let param = Tensor::from_vec(vec![1.0, 2.0], true);
        param.set_grad(arr1(&[0.5, 1.0]));

        opt.step(&mut [param.clone()]);

        let data = param.data();
        assert!((data[0] - 0.95).abs() < 1e-6);
        assert!((data[1] - 1.9).abs() < 1e-6);
    }

    #[test]
    fn test_step_skips_params_without_grad() {
        let mut opt = TestOptimizer { learning_rate: 0.1 };
        let param = Tensor::from_vec(vec![1.0, 2.0], true);

        opt.step(&mut [param.clone()]);

        assert_eq!(param.data()[0], 1.0);
        assert_eq!(param.data()[1], 2.0);
    }

    #[test]
    fn test_zero_grad_default_impl() {
        let mut opt = TestOptimizer { learning_rate: 0.1 };
        let param = Tensor::from_vec(vec![1.0], true);
        param.set_grad(arr1(&[2.0]));

        opt.zero_grad(&mut [param.clone()]);
        assert!(param.grad().is_none());
    }

    #[test]
    fn test_set_lr() {
        let mut opt = TestOptimizer { learning_rate: 0.1 };
        opt.set_lr(0.01);
        assert_eq!(opt.lr(), 0.01);
    }
}
