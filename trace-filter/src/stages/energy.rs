use crate::{
    Real, ShapeTicks, TraceFilterError, TraceFilterResult,
    filters::{TrapezoidalWindow, WindowFilter},
};
use serde::Serialize;
use std::ops::RangeInclusive;

/// Inclusive sample ranges summed by the energy filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummationLimits {
    pub leading: RangeInclusive<usize>,
    pub gap: RangeInclusive<usize>,
    pub trailing: RangeInclusive<usize>,
}

impl SummationLimits {
    /// Window boundaries in order: leading start and end, gap start and end, trailing start and end.
    pub fn boundaries(&self) -> [usize; 6] {
        [
            *self.leading.start(),
            *self.leading.end(),
            *self.gap.start(),
            *self.gap.end(),
            *self.trailing.start(),
            *self.trailing.end(),
        ]
    }
}

/// The gap starts `pretrigger_offset` samples before the trigger, so that a pulse starting within
/// the gap has its decaying tail fill the trailing window.
#[tracing::instrument(skip_all, level = "trace")]
pub(crate) fn find_limits(
    trigger_position: usize,
    pretrigger_offset: usize,
    energy: &ShapeTicks,
    trace_length: usize,
) -> TraceFilterResult<SummationLimits> {
    let signed = |n: usize| isize::try_from(n).unwrap_or(isize::MAX);
    let gap_start = signed(trigger_position).saturating_sub(signed(pretrigger_offset));
    let start = gap_start.saturating_sub(signed(energy.rise_time));
    let end = gap_start
        .saturating_add(signed(energy.flattop))
        .saturating_add(signed(energy.rise_time))
        .saturating_sub(1);
    if start < 0 || end >= signed(trace_length) {
        return Err(TraceFilterError::WindowOutOfBounds {
            start,
            end,
            trace_length,
        });
    }
    // Within the trace, so none of these are negative.
    let (start, gap_start, end) = (start as usize, gap_start as usize, end as usize);
    let trailing_start = gap_start + energy.flattop;
    Ok(SummationLimits {
        leading: start..=(gap_start - 1),
        gap: gap_start..=(trailing_start - 1),
        trailing: trailing_start..=end,
    })
}

/// Weights of the pole-zero corrected trapezoidal filter.
///
/// For a pulse `A·β^n` starting anywhere within the gap, the weighted sum of the three windows is
/// exactly `A`, which keeps the filter output flat across the flattop.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyCoefficients {
    /// Per-sample decay factor `exp(-1/τ)`.
    pub beta: Real,
    pub leading: Real,
    pub gap: Real,
    pub trailing: Real,
}

impl EnergyCoefficients {
    pub(crate) fn new(energy: &ShapeTicks, decay_constant: usize) -> Self {
        let beta = Real::exp(-1.0 / decay_constant as Real);
        let beta_rise = beta.powf(energy.rise_time as Real);
        let gap = 1.0 - beta;
        let trailing = gap / (1.0 - beta_rise);
        Self {
            beta,
            leading: -trailing * beta_rise,
            gap,
            trailing,
        }
    }

    /// Leading, gap and trailing weights.
    pub fn weights(&self) -> [Real; 3] {
        [self.leading, self.gap, self.trailing]
    }
}

fn window_sum(trace: &[Real], range: &RangeInclusive<usize>, baseline: Real) -> Real {
    trace
        .get(range.clone())
        .unwrap_or_default()
        .iter()
        .map(|value| value - baseline)
        .sum()
}

#[tracing::instrument(skip_all, level = "trace")]
pub(crate) fn extract_energy(
    trace: &[Real],
    baseline: Real,
    coefficients: &EnergyCoefficients,
    limits: &SummationLimits,
) -> Real {
    coefficients.leading * window_sum(trace, &limits.leading, baseline)
        + coefficients.gap * window_sum(trace, &limits.gap, baseline)
        + coefficients.trailing * window_sum(trace, &limits.trailing, baseline)
}

/// The energy filter slid along the whole baseline-subtracted trace. Samples before the filter is
/// fully populated repeat its first output.
#[tracing::instrument(skip_all, level = "trace")]
pub(crate) fn energy_response(
    trace: &[Real],
    baseline: Real,
    energy: &ShapeTicks,
    coefficients: &EnergyCoefficients,
) -> Vec<Real> {
    let filtered: Vec<Real> = trace
        .iter()
        .map(|value| value - baseline)
        .enumerate()
        .window(TrapezoidalWindow::new(energy, coefficients.weights()))
        .map(|(_, value)| value)
        .collect();

    let Some(&first) = filtered.first() else {
        return vec![Real::default(); trace.len()];
    };
    std::iter::repeat_n(first, trace.len() - filtered.len())
        .chain(filtered)
        .collect()
}
