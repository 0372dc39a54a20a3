use crate::{Real, ShapeTicks, TraceFilterError, TraceFilterResult, TraceFilterSettings};

/// Averages the trace from its start up to `baseline_guard` samples before the energy filter's
/// leading window, which begins one energy rise time before the gap.
#[tracing::instrument(skip_all, level = "trace", fields(num_samples))]
pub(crate) fn find_baseline(
    trace: &[Real],
    trigger_position: usize,
    energy: &ShapeTicks,
    settings: &TraceFilterSettings,
) -> TraceFilterResult<Real> {
    let excluded = settings
        .resolve_pretrigger_offset(energy)
        .saturating_add(energy.rise_time)
        .saturating_add(settings.baseline_guard);
    let available = trigger_position.saturating_sub(excluded).min(trace.len());
    let required = settings.min_baseline_samples.max(1);
    tracing::Span::current().record("num_samples", available);

    match trace.get(..available) {
        Some(pretrigger) if available >= required => {
            Ok(pretrigger.iter().sum::<Real>() / available as Real)
        }
        _ => Err(TraceFilterError::InsufficientPretriggerSamples {
            available,
            required,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    const ENERGY: ShapeTicks = ShapeTicks {
        rise_time: 4,
        flattop: 2,
    };

    #[test]
    fn mean_of_pretrigger() {
        let mut trace = vec![50.0; 100];
        trace[30..].fill(1000.0);
        // Only [0, 20) is averaged.
        trace[19] = 70.0;
        trace[20] = 1000.0;
        let baseline = find_baseline(&trace, 30, &ENERGY, &TraceFilterSettings::default()).unwrap();
        assert_approx_eq!(baseline, 51.0);
    }

    #[test]
    fn guard_excludes_samples() {
        let trace: Vec<_> = (0..40).map(|i| i as Real).collect();
        let settings = TraceFilterSettings {
            baseline_guard: 6,
            ..Default::default()
        };
        // [0, 9) averaged
        let baseline = find_baseline(&trace, 20, &ENERGY, &settings).unwrap();
        assert_approx_eq!(baseline, 4.0);
    }

    #[test]
    fn window_follows_pretrigger_offset() {
        let trace: Vec<_> = (0..100).map(|i| i as Real).collect();
        let settings = TraceFilterSettings {
            pretrigger_offset: Some(10),
            ..Default::default()
        };
        // [0, 41) averaged
        let baseline = find_baseline(&trace, 60, &ENERGY, &settings).unwrap();
        assert_approx_eq!(baseline, 20.0);

        let settings = TraceFilterSettings {
            pretrigger_offset: Some(usize::MAX),
            ..Default::default()
        };
        assert_eq!(
            find_baseline(&trace, 60, &ENERGY, &settings),
            Err(TraceFilterError::InsufficientPretriggerSamples {
                available: 0,
                required: 1
            })
        );
    }

    #[test]
    fn trigger_too_early() {
        let trace = vec![0.0; 100];
        assert_eq!(
            find_baseline(&trace, 9, &ENERGY, &TraceFilterSettings::default()),
            Err(TraceFilterError::InsufficientPretriggerSamples {
                available: 0,
                required: 1
            })
        );
        assert_eq!(
            find_baseline(&trace, 3, &ENERGY, &TraceFilterSettings::default()),
            Err(TraceFilterError::InsufficientPretriggerSamples {
                available: 0,
                required: 1
            })
        );
    }

    #[test]
    fn minimum_samples() {
        let trace = vec![0.0; 100];
        let settings = TraceFilterSettings {
            min_baseline_samples: 20,
            ..Default::default()
        };
        assert_eq!(
            find_baseline(&trace, 29, &ENERGY, &settings),
            Err(TraceFilterError::InsufficientPretriggerSamples {
                available: 19,
                required: 20
            })
        );
        assert!(find_baseline(&trace, 30, &ENERGY, &settings).is_ok());
    }
}
