use crate::{
    Real, ShapeTicks, TraceFilterError, TraceFilterResult,
    filters::{EventFilter, LeadingEdgeDiscriminator, TrapezoidalWindow, WindowFilter},
};

pub(crate) struct Triggers {
    /// The trigger filter response, zero where the filter is not yet fully populated.
    pub(crate) response: Vec<Real>,
    /// The first leading-edge crossing.
    pub(crate) position: usize,
    /// Every leading-edge crossing, including the first.
    pub(crate) positions: Vec<usize>,
}

#[tracing::instrument(skip_all, level = "trace", fields(num_triggers))]
pub(crate) fn find_triggers(
    trace: &[Real],
    shape: &ShapeTicks,
    threshold: Real,
) -> TraceFilterResult<Triggers> {
    let mut response = vec![Real::default(); trace.len()];
    for (i, value) in trace
        .iter()
        .copied()
        .enumerate()
        .window(TrapezoidalWindow::trigger(shape))
    {
        if let Some(r) = response.get_mut(i) {
            *r = value;
        }
    }

    let positions: Vec<usize> = response
        .iter()
        .copied()
        .enumerate()
        .skip(shape.length().saturating_sub(1))
        .events(LeadingEdgeDiscriminator::new(threshold))
        .collect();
    tracing::Span::current().record("num_triggers", positions.len());

    let Some(&position) = positions.first() else {
        return Err(TraceFilterError::NoTriggerFound { threshold });
    };
    Ok(Triggers {
        response,
        position,
        positions,
    })
}
