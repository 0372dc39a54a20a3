pub(crate) mod trapezoid;

pub(crate) use trapezoid::TrapezoidalWindow;

/// Consumes values from a trace, and outputs a trace after processing.
///
/// Each output is attributed to the index of the sample whose push produced it.
pub(crate) trait Window: Clone {
    type InputType: Copy;
    type OutputType;

    /// Pushes a value into the window, returning true once the window has an output.
    fn push(&mut self, value: Self::InputType) -> bool;

    /// Extracts the window's current processed value.
    fn output(&self) -> Option<Self::OutputType>;
}

#[derive(Clone)]
pub(crate) struct WindowIter<I, W>
where
    I: Iterator<Item = (usize, W::InputType)>,
    W: Window,
{
    window_function: W,
    source: I,
}

impl<I, W> Iterator for WindowIter<I, W>
where
    I: Iterator<Item = (usize, W::InputType)>,
    W: Window,
{
    type Item = (usize, W::OutputType);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (time, value) = self.source.next()?;
            if self.window_function.push(value) {
                return Some((time, self.window_function.output()?));
            }
        }
    }
}

pub(crate) trait WindowFilter<I, W>
where
    I: Iterator<Item = (usize, W::InputType)>,
    W: Window,
{
    fn window(self, window: W) -> WindowIter<I, W>;
}

impl<I, W> WindowFilter<I, W> for I
where
    I: Iterator<Item = (usize, W::InputType)>,
    W: Window,
{
    fn window(self, window_function: W) -> WindowIter<I, W> {
        WindowIter {
            source: self,
            window_function,
        }
    }
}
