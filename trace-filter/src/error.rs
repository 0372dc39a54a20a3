use crate::{PipelineState, Real};
use thiserror::Error;

pub type TraceFilterResult<T> = Result<T, TraceFilterError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TraceFilterError {
    #[error("Trace is empty")]
    EmptyTrace,
    #[error("Filter spanning {filter_length} samples is longer than trace of length {trace_length}")]
    FilterLongerThanTrace {
        filter_length: usize,
        trace_length: usize,
    },
    #[error("No trigger found above threshold {threshold}")]
    NoTriggerFound { threshold: Real },
    #[error("Insufficient pretrigger samples: {available} available, {required} required")]
    InsufficientPretriggerSamples { available: usize, required: usize },
    #[error("Trace of length {trace_length} too short for energy filter spanning [{start}, {end}]")]
    WindowOutOfBounds {
        start: isize,
        end: isize,
        trace_length: usize,
    },
}

impl TraceFilterError {
    /// The last pipeline state reached before this error halted the computation.
    pub fn failed_after(&self) -> PipelineState {
        match self {
            Self::EmptyTrace => PipelineState::Uninitialized,
            Self::FilterLongerThanTrace { .. } | Self::NoTriggerFound { .. } => {
                PipelineState::TicksConverted
            }
            Self::InsufficientPretriggerSamples { .. } => PipelineState::TriggerFound,
            Self::WindowOutOfBounds { .. } => PipelineState::BaselineComputed,
        }
    }
}
