//! Synthetic detector traces for exercising the filters.
use crate::Real;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

/// A pulse whose charge arrives uniformly over `rise` samples, each portion decaying
/// exponentially with time constant `decay` samples.
#[derive(Debug, Clone)]
pub(crate) struct Pulse {
    pub(crate) start: usize,
    pub(crate) rise: usize,
    pub(crate) amplitude: Real,
    pub(crate) decay: Real,
}

impl Pulse {
    /// A pulse which arrives in a single sample.
    pub(crate) fn step(start: usize, amplitude: Real, decay: Real) -> Self {
        Self {
            start,
            rise: 1,
            amplitude,
            decay,
        }
    }

    pub(crate) fn get_value_at(&self, time: usize) -> Real {
        let portion = self.amplitude / self.rise.max(1) as Real;
        (0..self.rise.max(1))
            .map(|k| self.start + k)
            .filter(|&onset| onset <= time)
            .map(|onset| portion * Real::exp(-((time - onset) as Real) / self.decay))
            .sum()
    }
}

pub(crate) fn trace(length: usize, baseline: Real, pulses: &[Pulse]) -> Vec<Real> {
    (0..length)
        .map(|time| {
            baseline
                + pulses
                    .iter()
                    .map(|pulse| pulse.get_value_at(time))
                    .sum::<Real>()
        })
        .collect()
}

/// Adds reproducible gaussian noise to every sample.
pub(crate) fn add_noise(trace: &mut [Real], sd: Real, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, sd).expect("standard deviation should be finite and positive");
    for value in trace.iter_mut() {
        *value += normal.sample(&mut rng);
    }
}

/// Population variance.
pub(crate) fn variance(values: &[Real]) -> Real {
    let mean = values.iter().sum::<Real>() / values.len() as Real;
    values.iter().map(|v| (v - mean).powi(2)).sum::<Real>() / values.len() as Real
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn step_pulse() {
        let trace = trace(10, 5.0, &[Pulse::step(3, 100.0, 2.0)]);
        assert_eq!(trace[2], 5.0);
        assert_approx_eq!(trace[3], 105.0);
        assert_approx_eq!(trace[5], 5.0 + 100.0 * Real::exp(-1.0));
    }

    #[test]
    fn spread_pulse() {
        let pulse = Pulse {
            start: 0,
            rise: 4,
            amplitude: 100.0,
            decay: 1e12,
        };
        assert_approx_eq!(pulse.get_value_at(0), 25.0);
        assert_approx_eq!(pulse.get_value_at(2), 75.0);
        assert_approx_eq!(pulse.get_value_at(3), 100.0);
        assert_approx_eq!(pulse.get_value_at(10), 100.0);
    }

    #[test]
    fn noise_is_reproducible() {
        let mut a = vec![0.0; 50];
        let mut b = vec![0.0; 50];
        add_noise(&mut a, 1.0, 7);
        add_noise(&mut b, 1.0, 7);
        assert_eq!(a, b);
        assert!(a.iter().any(|&v| v != 0.0));
    }
}
