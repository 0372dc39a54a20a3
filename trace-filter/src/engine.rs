use crate::{
    ClockTicks, EnergyCoefficients, EnergyShape, FilterShape, Real, SampleRate, SummationLimits,
    TraceFilterError, TraceFilterResult, TraceFilterSettings, TriggerShape,
    stages::{baseline, energy, trigger},
};
use serde::Serialize;
use strum::{Display, EnumIter};

/// Logs at info level when the engine is verbose, and at debug level otherwise.
macro_rules! report {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}

/// The stages of a computation, each reached only if all before it succeeded.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumIter, Serialize,
)]
pub enum PipelineState {
    #[default]
    Uninitialized,
    TicksConverted,
    TriggerFound,
    BaselineComputed,
    LimitsComputed,
    /// Terminal state, results are available.
    EnergyComputed,
}

/// Everything computed from one trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterResults {
    /// Index of the first leading-edge crossing of the trigger filter.
    pub trigger_position: usize,
    /// Indices of every leading-edge crossing, the first being `trigger_position`.
    pub triggers: Vec<usize>,
    pub baseline: Real,
    pub energy: Real,
    /// Trigger filter response, one value per sample of the trace.
    pub trigger_filter: Vec<Real>,
    /// Energy filter response of the baseline-subtracted trace, one value per sample.
    pub energy_filter: Vec<Real>,
    pub energy_coefficients: EnergyCoefficients,
    pub summation_limits: SummationLimits,
}

/// Computes the trigger position, baseline and energy of a pulse within a trace.
///
/// Shapes are converted to clock ticks on the first computation and reused until the sample rate
/// or either shape is replaced.
#[derive(Debug, Clone)]
pub struct TraceFilter {
    sample_rate: SampleRate,
    trigger: FilterShape<TriggerShape>,
    energy: FilterShape<EnergyShape>,
    settings: TraceFilterSettings,
    ticks: Option<ClockTicks>,
    state: PipelineState,
    results: Option<FilterResults>,
    verbose: bool,
}

impl TraceFilter {
    pub fn new(
        sample_rate: SampleRate,
        trigger: FilterShape<TriggerShape>,
        energy: FilterShape<EnergyShape>,
    ) -> Self {
        Self {
            sample_rate,
            trigger,
            energy,
            settings: Default::default(),
            ticks: None,
            state: PipelineState::Uninitialized,
            results: None,
            verbose: false,
        }
    }

    pub fn with_settings(mut self, settings: TraceFilterSettings) -> Self {
        self.settings = settings;
        self.invalidate();
        self
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    pub fn trigger_shape(&self) -> &FilterShape<TriggerShape> {
        &self.trigger
    }

    pub fn energy_shape(&self) -> &FilterShape<EnergyShape> {
        &self.energy
    }

    pub fn settings(&self) -> &TraceFilterSettings {
        &self.settings
    }

    pub fn set_sample_rate(&mut self, sample_rate: SampleRate) {
        self.sample_rate = sample_rate;
        self.invalidate_ticks();
    }

    pub fn set_trigger_shape(&mut self, trigger: FilterShape<TriggerShape>) {
        self.trigger = trigger;
        self.invalidate_ticks();
    }

    pub fn set_energy_shape(&mut self, energy: FilterShape<EnergyShape>) {
        self.energy = energy;
        self.invalidate_ticks();
    }

    fn invalidate_ticks(&mut self) {
        self.ticks = None;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.state = PipelineState::Uninitialized;
        self.results = None;
    }

    /// The shapes in clock ticks, once they have been converted.
    pub fn clock_ticks(&self) -> Option<&ClockTicks> {
        self.ticks.as_ref()
    }

    /// The furthest stage reached by the most recent computation.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Results of the most recent computation, if it ran to completion.
    pub fn results(&self) -> Option<&FilterResults> {
        self.results.as_ref()
    }

    pub fn baseline(&self) -> Option<Real> {
        self.results().map(|results| results.baseline)
    }

    pub fn energy(&self) -> Option<Real> {
        self.results().map(|results| results.energy)
    }

    pub fn trigger_position(&self) -> Option<usize> {
        self.results().map(|results| results.trigger_position)
    }

    pub fn trigger_filter(&self) -> Option<&[Real]> {
        self.results().map(|results| results.trigger_filter.as_slice())
    }

    pub fn energy_coefficients(&self) -> Option<[Real; 3]> {
        self.results()
            .map(|results| results.energy_coefficients.weights())
    }

    pub fn summation_limits(&self) -> Option<[usize; 6]> {
        self.results()
            .map(|results| results.summation_limits.boundaries())
    }

    /// Runs every stage over `trace`.
    ///
    /// The trace is only borrowed for the duration of the call. On failure no results are retained,
    /// and [Self::state] reports the last stage which succeeded.
    #[tracing::instrument(skip_all, fields(trace_length = trace.len(), trigger_position, energy))]
    pub fn calculate(&mut self, trace: &[Real]) -> TraceFilterResult<&FilterResults> {
        self.invalidate();
        match self.run_stages(trace) {
            Ok(results) => {
                let span = tracing::Span::current();
                span.record("trigger_position", results.trigger_position);
                span.record("energy", results.energy);
                Ok(&*self.results.insert(results))
            }
            Err(e) => {
                tracing::warn!(state = %self.state, "{e}");
                Err(e)
            }
        }
    }

    fn advance(&mut self, state: PipelineState) {
        self.state = state;
        tracing::trace!(%state, "Stage complete");
    }

    fn convert_to_clock_ticks(&mut self) -> ClockTicks {
        let ticks = match self.ticks {
            Some(ticks) => ticks,
            None => {
                let ticks = ClockTicks::convert(self.sample_rate, &self.trigger, &self.energy);
                report!(self.verbose, ?ticks, "Converted to clock ticks");
                *self.ticks.insert(ticks)
            }
        };
        self.advance(PipelineState::TicksConverted);
        ticks
    }

    fn run_stages(&mut self, trace: &[Real]) -> TraceFilterResult<FilterResults> {
        if trace.is_empty() {
            return Err(TraceFilterError::EmptyTrace);
        }
        let ticks = self.convert_to_clock_ticks();
        let filter_length = ticks.trigger.length().max(ticks.energy.length());
        if filter_length > trace.len() {
            return Err(TraceFilterError::FilterLongerThanTrace {
                filter_length,
                trace_length: trace.len(),
            });
        }

        let triggers = trigger::find_triggers(trace, &ticks.trigger, ticks.threshold)?;
        report!(
            self.verbose,
            trigger_position = triggers.position,
            num_triggers = triggers.positions.len(),
            "Trigger found"
        );
        self.advance(PipelineState::TriggerFound);

        let baseline =
            baseline::find_baseline(trace, triggers.position, &ticks.energy, &self.settings)?;
        report!(self.verbose, baseline, "Baseline computed");
        self.advance(PipelineState::BaselineComputed);

        let pretrigger_offset = self.settings.resolve_pretrigger_offset(&ticks.energy);
        let summation_limits = energy::find_limits(
            triggers.position,
            pretrigger_offset,
            &ticks.energy,
            trace.len(),
        )?;
        report!(self.verbose, limits = ?summation_limits.boundaries(), "Limits computed");
        self.advance(PipelineState::LimitsComputed);

        let energy_coefficients = EnergyCoefficients::new(&ticks.energy, ticks.decay_constant);
        let energy =
            energy::extract_energy(trace, baseline, &energy_coefficients, &summation_limits);
        let energy_filter =
            energy::energy_response(trace, baseline, &ticks.energy, &energy_coefficients);
        report!(self.verbose, energy, coefficients = ?energy_coefficients, "Energy computed");
        self.advance(PipelineState::EnergyComputed);

        Ok(FilterResults {
            trigger_position: triggers.position,
            triggers: triggers.positions,
            baseline,
            energy,
            trigger_filter: triggers.response,
            energy_filter,
            energy_coefficients,
            summation_limits,
        })
    }
}
