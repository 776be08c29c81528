//! Tape-based autograd substrate
//!
//! The training step consumes automatic differentiation through a narrow
//! surface: gradient-carrying [`Tensor`]s, [`BackwardOp`]s recorded by the
//! operations that produce them, and a scoped gradient-tracking mode
//! ([`GradGuard`]). Loss functions and models register their own backward
//! ops; calling [`BackwardOp::backward`] on a scalar loss walks the tape.

mod backward;
mod mode;
mod tensor;

pub use backward::BackwardOp;
pub use mode::{is_grad_enabled, GradGuard};
pub use tensor::Tensor;

/// Run the backward pass from a scalar loss tensor.
///
/// Seeds the loss gradient with ones and invokes the recorded op, if any.
pub fn backward(loss: &Tensor) {
    let ones = ndarray::Array1::ones(loss.len());
    loss.set_grad(ones);
    if let Some(op) = loss.backward_op() {
        op.backward();
    }
}
