pub(crate) mod leading_edge;

use crate::Real;

pub(crate) use leading_edge::LeadingEdgeDiscriminator;

pub(crate) trait Detector: Clone {
    type EventPointType;

    fn signal(&mut self, time: usize, value: Real) -> Option<Self::EventPointType>;
}

#[derive(Clone)]
pub(crate) struct EventIter<I, D>
where
    I: Iterator<Item = (usize, Real)>,
    D: Detector,
{
    source: I,
    detector: D,
}

impl<I, D> Iterator for EventIter<I, D>
where
    I: Iterator<Item = (usize, Real)>,
    D: Detector,
{
    type Item = D::EventPointType;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (time, value) = self.source.next()?;
            if let Some(event) = self.detector.signal(time, value) {
                return Some(event);
            }
        }
    }
}

pub(crate) trait EventFilter<I, D>
where
    I: Iterator<Item = (usize, Real)>,
    D: Detector,
{
    fn events(self, detector: D) -> EventIter<I, D>;
}

impl<I, D> EventFilter<I, D> for I
where
    I: Iterator<Item = (usize, Real)>,
    D: Detector,
{
    fn events(self, detector: D) -> EventIter<I, D> {
        EventIter {
            source: self,
            detector,
        }
    }
}
