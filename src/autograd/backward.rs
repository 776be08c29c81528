//! Backward-pass operation trait

/// A recorded operation that propagates gradients to its inputs.
///
/// Implementations read the gradient of their output tensor, accumulate
/// gradients into each input that requires them, and then recurse into the
/// inputs' own backward ops.
pub trait BackwardOp {
    /// Propagate gradients backward through this operation
    fn backward(&self);
}
