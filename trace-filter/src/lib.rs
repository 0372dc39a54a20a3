//! Trapezoidal digital filtering of digitised detector-pulse traces.
//!
//! A [TraceFilter] owns a trigger (fast) and an energy (slow) filter shape.
//! Given a borrowed trace it locates the pulse onset, estimates the baseline,
//! and extracts the pulse amplitude with a pole-zero corrected trapezoidal filter.
//! ```rust
//! use trace_filter::{EnergyShape, FilterShape, TraceFilter, TriggerShape};
//!
//! let trigger = FilterShape::in_ticks(TriggerShape { rise_time: 4.0, flattop: 2.0, threshold: 100.0 });
//! let energy = FilterShape::in_ticks(EnergyShape { rise_time: 4.0, flattop: 2.0, decay_constant: 50.0 });
//! let mut filter = TraceFilter::new(250_000_000, trigger, energy);
//!
//! let trace: Vec<f64> = (0..100)
//!     .map(|i| if i < 30 { 50.0 } else { 50.0 + 500.0 * (-((i - 30) as f64) / 50.0).exp() })
//!     .collect();
//! let results = filter.calculate(&trace).expect("pulse is well inside the trace");
//! assert_eq!(results.trigger_position, 30);
//! ```

mod conversion;
mod engine;
mod error;
mod filters;
mod parameters;
mod stages;
#[cfg(test)]
mod synthetic;

pub use conversion::{ClockTicks, ShapeTicks};
pub use engine::{FilterResults, PipelineState, TraceFilter};
pub use error::{TraceFilterError, TraceFilterResult};
pub use parameters::{
    EnergyShape, EnergyShapeWrapper, FilterShape, TimeUnit, TraceFilterParameters,
    TraceFilterSettings, Trapezoid, TriggerShape, TriggerShapeWrapper,
};
pub use stages::{EnergyCoefficients, SummationLimits};

/// Sample values and filter outputs.
pub type Real = f64;

/// ADC clock frequency in Hz.
pub type SampleRate = u64;
