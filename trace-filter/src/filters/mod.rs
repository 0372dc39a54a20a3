//! Streaming building blocks the pipeline stages are assembled from.
//!
//! A trace is processed as an iterator of `(index, value)` pairs:
//! ```ignore
//!     let triggers = trace
//!         .iter()
//!         .copied()
//!         .enumerate()
//!         .window(TrapezoidalWindow::trigger(&shape))
//!         .events(LeadingEdgeDiscriminator::new(threshold));
//! ```

pub(crate) mod detectors;
pub(crate) mod window;

pub(crate) use detectors::{EventFilter, LeadingEdgeDiscriminator};
pub(crate) use window::{TrapezoidalWindow, WindowFilter};
