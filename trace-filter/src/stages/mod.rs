//! The stages of the filter pipeline, in the order the engine runs them.
//!
//! Each stage reads the trace and the outputs of the stages before it, and either
//! returns its own output or the reason the pipeline cannot continue.

pub(crate) mod baseline;
pub(crate) mod energy;
pub(crate) mod trigger;

pub use energy::{EnergyCoefficients, SummationLimits};
