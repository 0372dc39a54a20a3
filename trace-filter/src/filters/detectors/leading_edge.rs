use super::{Detector, Real};

/// Fires on each upward crossing of the threshold.
///
/// The discriminator starts disarmed, so a signal which is already above threshold when
/// observation begins must first fall below it before an event can be registered.
#[derive(Default, Clone, Debug)]
pub(crate) struct LeadingEdgeDiscriminator {
    threshold: Real,
    armed: bool,
}

impl LeadingEdgeDiscriminator {
    pub(crate) fn new(threshold: Real) -> Self {
        Self {
            threshold,
            armed: false,
        }
    }
}

impl Detector for LeadingEdgeDiscriminator {
    type EventPointType = usize;

    fn signal(&mut self, time: usize, value: Real) -> Option<usize> {
        if value >= self.threshold {
            // Disarmed until the signal drops below threshold again
            std::mem::take(&mut self.armed).then_some(time)
        } else {
            self.armed = true;
            None
        }
    }
}
