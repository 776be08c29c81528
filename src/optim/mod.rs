//! Optimizers: the concrete parameter-update capabilities
//!
//! The training step never calls these directly; it goes through
//! [`crate::gan::ParamUpdate`], which pairs a parameter list with one of
//! these algorithms.

mod adam;
mod optimizer;
mod sgd;

pub use adam::Adam;
pub use optimizer::Optimizer;
pub use sgd::SGD;
