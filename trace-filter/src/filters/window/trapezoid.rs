use super::Window;
use crate::{Real, ShapeTicks};
use std::collections::VecDeque;

/// Weighted sums over three adjacent sub-windows: a leading window and a trailing window of the
/// rise time, separated by a gap of the flattop. The output is attributed to the newest sample.
#[derive(Clone, Debug)]
pub(crate) struct TrapezoidalWindow {
    /// Buffer offsets of the first sample in the gap and in the trailing window.
    into_gap: usize,
    into_trailing: usize,
    length: usize,
    /// Leading, gap and trailing weights.
    weights: [Real; 3],
    sums: [Real; 3],
    /// Grows with the samples pushed, up to `length`.
    buffer: VecDeque<Real>,
}

impl TrapezoidalWindow {
    pub(crate) fn new(shape: &ShapeTicks, weights: [Real; 3]) -> Self {
        Self {
            into_gap: shape.rise_time,
            into_trailing: shape.rise_time.saturating_add(shape.flattop),
            length: shape.length(),
            weights,
            sums: Default::default(),
            buffer: VecDeque::new(),
        }
    }

    /// The difference of the trailing and leading means.
    pub(crate) fn trigger(shape: &ShapeTicks) -> Self {
        let norm = 1.0 / shape.rise_time as Real;
        Self::new(shape, [-norm, 0.0, norm])
    }

    fn sub_window(&self, index: usize) -> usize {
        if index < self.into_gap {
            0
        } else if index < self.into_trailing {
            1
        } else {
            2
        }
    }

    fn is_full(&self) -> bool {
        self.buffer.len() == self.length
    }
}

impl Window for TrapezoidalWindow {
    type InputType = Real;
    type OutputType = Real;

    fn push(&mut self, value: Real) -> bool {
        if self.is_full() {
            // Each boundary sample moves one sub-window towards the front.
            self.sums[0] += self.buffer[self.into_gap] - self.buffer[0];
            self.sums[1] += self.buffer[self.into_trailing] - self.buffer[self.into_gap];
            self.sums[2] += value - self.buffer[self.into_trailing];
            self.buffer.pop_front();
        } else {
            let sub_window = self.sub_window(self.buffer.len());
            self.sums[sub_window] += value;
        }
        self.buffer.push_back(value);
        self.is_full()
    }

    fn output(&self) -> Option<Real> {
        self.is_full().then(|| {
            self.weights
                .iter()
                .zip(self.sums.iter())
                .map(|(weight, sum)| weight * sum)
                .sum()
        })
    }
}
