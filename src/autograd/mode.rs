//! Scoped gradient-tracking mode
//!
//! Gradient tracking is a thread-local flag consulted whenever a tensor is
//! created. It is toggled through an RAII guard rather than bare set calls,
//! so the previous mode is restored when the guard drops — including during
//! unwinding. This is what lets a sampler generate gradient-free batches
//! without leaking disabled-gradient state into the rest of the step.

use std::cell::Cell;

thread_local! {
    static GRAD_ENABLED: Cell<bool> = const { Cell::new(true) };
}

/// Whether tensors created on this thread currently track gradients.
pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(Cell::get)
}

/// RAII guard that sets the gradient mode for its lifetime.
///
/// # Example
///
/// ```
/// use adversario::autograd::{is_grad_enabled, GradGuard};
///
/// assert!(is_grad_enabled());
/// {
///     let _guard = GradGuard::new(false);
///     assert!(!is_grad_enabled());
/// }
/// assert!(is_grad_enabled());
/// ```
pub struct GradGuard {
    prev: bool,
}

impl GradGuard {
    /// Set the gradient mode to `enabled` until the guard drops.
    pub fn new(enabled: bool) -> Self {
        let prev = GRAD_ENABLED.with(|flag| flag.replace(enabled));
        Self { prev }
    }

    /// Disable gradient tracking until the guard drops.
    pub fn no_grad() -> Self {
        Self::new(false)
    }
}

impl Drop for GradGuard {
    fn drop(&mut self) {
        GRAD_ENABLED.with(|flag| flag.set(self.prev));
    }
}
