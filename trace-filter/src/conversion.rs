use crate::{
    EnergyShape, FilterShape, Real, SampleRate, TimeUnit, Trapezoid, TriggerShape,
};
use serde::Serialize;

const NANOSECONDS_PER_SECOND: Real = 1e9;

/// Rounds a time to the nearest whole clock tick, never returning fewer than one tick.
pub(crate) fn to_clock_ticks(time: Real, unit: TimeUnit, sample_rate: SampleRate) -> usize {
    let ticks = match unit {
        TimeUnit::Nanoseconds => time * sample_rate as Real / NANOSECONDS_PER_SECOND,
        TimeUnit::Ticks => time,
    };
    // Negative and NaN values saturate to zero.
    (ticks.round() as usize).max(1)
}

/// The geometry of one trapezoid in clock ticks.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShapeTicks {
    pub rise_time: usize,
    pub flattop: usize,
}

impl ShapeTicks {
    fn convert<S: Trapezoid>(shape: &FilterShape<S>, sample_rate: SampleRate) -> Self {
        Self {
            rise_time: to_clock_ticks(shape.shape.rise_time(), shape.unit, sample_rate),
            flattop: to_clock_ticks(shape.shape.flattop(), shape.unit, sample_rate),
        }
    }

    /// Number of samples spanned by the leading window, gap and trailing window.
    pub fn length(&self) -> usize {
        self.rise_time.saturating_mul(2).saturating_add(self.flattop)
    }
}

/// Both filter shapes expressed in clock ticks.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClockTicks {
    pub trigger: ShapeTicks,
    /// Not a time, so carried through unconverted.
    pub threshold: Real,
    pub energy: ShapeTicks,
    pub decay_constant: usize,
}

impl ClockTicks {
    pub(crate) fn convert(
        sample_rate: SampleRate,
        trigger: &FilterShape<TriggerShape>,
        energy: &FilterShape<EnergyShape>,
    ) -> Self {
        Self {
            trigger: ShapeTicks::convert(trigger, sample_rate),
            threshold: trigger.shape.threshold,
            energy: ShapeTicks::convert(energy, sample_rate),
            decay_constant: to_clock_ticks(energy.shape.decay_constant, energy.unit, sample_rate),
        }
    }
}
