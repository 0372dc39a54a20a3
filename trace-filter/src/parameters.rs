//! Defines the filter shapes and the tunable settings of the filter pipeline.
use crate::{Real, SampleRate, ShapeTicks, TraceFilter};
use anyhow::{Error, anyhow};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Common geometry of both filter roles.
pub trait Trapezoid {
    fn rise_time(&self) -> Real;
    fn flattop(&self) -> Real;
    fn set_rise_time(&mut self, rise_time: Real);
    fn set_flattop(&mut self, flattop: Real);
}

/// Shape of the fast filter used to locate the pulse onset.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TriggerShape {
    pub rise_time: Real,
    pub flattop: Real,
    /// Trigger filter response at which the discriminator fires.
    pub threshold: Real,
}

/// Shape of the slow filter used to measure the pulse amplitude.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EnergyShape {
    pub rise_time: Real,
    pub flattop: Real,
    /// Exponential decay constant of the pulse tail, used for pole-zero correction.
    pub decay_constant: Real,
}

macro_rules! impl_trapezoid {
    ($shape:ty) => {
        impl Trapezoid for $shape {
            fn rise_time(&self) -> Real {
                self.rise_time
            }
            fn flattop(&self) -> Real {
                self.flattop
            }
            fn set_rise_time(&mut self, rise_time: Real) {
                self.rise_time = rise_time;
            }
            fn set_flattop(&mut self, flattop: Real) {
                self.flattop = flattop;
            }
        }
    };
}

impl_trapezoid!(TriggerShape);
impl_trapezoid!(EnergyShape);

impl TriggerShape {
    pub fn set_threshold(&mut self, threshold: Real) {
        self.threshold = threshold;
    }
}

impl EnergyShape {
    pub fn set_decay_constant(&mut self, decay_constant: Real) {
        self.decay_constant = decay_constant;
    }
}

/// The unit in which the times of a shape are expressed.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeUnit {
    /// Times are converted to clock ticks using the ADC sample rate.
    #[default]
    Nanoseconds,
    /// Times are already whole ADC clock ticks.
    Ticks,
}

/// A filter shape together with the unit its times are given in.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FilterShape<S> {
    pub shape: S,
    #[serde(default)]
    pub unit: TimeUnit,
}

impl<S> FilterShape<S> {
    pub fn in_nanoseconds(shape: S) -> Self {
        Self {
            shape,
            unit: TimeUnit::Nanoseconds,
        }
    }

    pub fn in_ticks(shape: S) -> Self {
        Self {
            shape,
            unit: TimeUnit::Ticks,
        }
    }
}

fn parse_triple(s: &str, pattern: &str) -> Result<[Real; 3], Error> {
    let vals: Vec<_> = s.split(',').map(str::trim).collect();
    match vals.as_slice() {
        [a, b, c] => Ok([Real::from_str(a)?, Real::from_str(b)?, Real::from_str(c)?]),
        _ => Err(anyhow!(
            "Incorrect number of parameters in shape, expected pattern '{pattern}', got '{s}'"
        )),
    }
}

/// Parses a trigger shape given as `rise_time,flattop,threshold`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerShapeWrapper(pub TriggerShape);

impl FromStr for TriggerShapeWrapper {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [rise_time, flattop, threshold] = parse_triple(s, "rise_time,flattop,threshold")?;
        Ok(TriggerShapeWrapper(TriggerShape {
            rise_time,
            flattop,
            threshold,
        }))
    }
}

/// Parses an energy shape given as `rise_time,flattop,decay_constant`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnergyShapeWrapper(pub EnergyShape);

impl FromStr for EnergyShapeWrapper {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [rise_time, flattop, decay_constant] =
            parse_triple(s, "rise_time,flattop,decay_constant")?;
        Ok(EnergyShapeWrapper(EnergyShape {
            rise_time,
            flattop,
            decay_constant,
        }))
    }
}

/// Tunables of the baseline and energy stages, in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Args, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TraceFilterSettings {
    /// Number of samples the energy filter's gap starts before the trigger. If omitted, the gap
    /// ends on the trigger, so it contains any onset up to one flattop before the trigger.
    #[clap(long)]
    pub pretrigger_offset: Option<usize>,

    /// Number of samples left between the end of the baseline window and the start of the energy filter.
    #[clap(long, default_value_t = 5)]
    pub baseline_guard: usize,

    /// The fewest pre-trigger samples the baseline may be averaged over.
    #[clap(long, default_value_t = 1)]
    pub min_baseline_samples: usize,
}

impl Default for TraceFilterSettings {
    fn default() -> Self {
        Self {
            pretrigger_offset: None,
            baseline_guard: 5,
            min_baseline_samples: 1,
        }
    }
}

impl TraceFilterSettings {
    pub(crate) fn resolve_pretrigger_offset(&self, energy: &ShapeTicks) -> usize {
        self.pretrigger_offset.unwrap_or(energy.flattop.saturating_sub(1))
    }
}

/// Everything needed to build a [TraceFilter], in a form a host binary can flatten into its command line
/// or load from a configuration file.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TraceFilterParameters {
    /// The ADC clock frequency, in Hz.
    #[clap(long)]
    pub sample_rate: SampleRate,

    /// The unit of the rise times, flattops and decay constant.
    #[clap(long, value_enum, default_value_t)]
    #[serde(default)]
    pub time_unit: TimeUnit,

    /// The trigger filter shape, given as "rise_time,flattop,threshold".
    #[clap(long)]
    pub trigger: TriggerShapeWrapper,

    /// The energy filter shape, given as "rise_time,flattop,decay_constant".
    #[clap(long)]
    pub energy: EnergyShapeWrapper,

    #[clap(flatten)]
    #[serde(default)]
    pub settings: TraceFilterSettings,

    /// Report the result of every filter stage at info level.
    #[clap(long)]
    #[serde(default)]
    pub verbose: bool,
}

impl TraceFilterParameters {
    pub fn build(&self) -> TraceFilter {
        let mut filter = TraceFilter::new(
            self.sample_rate,
            FilterShape {
                shape: self.trigger.0,
                unit: self.time_unit,
            },
            FilterShape {
                shape: self.energy.0,
                unit: self.time_unit,
            },
        )
        .with_settings(self.settings);
        filter.set_verbose(self.verbose);
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        parameters: TraceFilterParameters,
    }

    #[test]
    fn parse_trigger_shape() {
        let shape = TriggerShapeWrapper::from_str("16, 8,100").unwrap().0;
        assert_eq!(
            shape,
            TriggerShape {
                rise_time: 16.0,
                flattop: 8.0,
                threshold: 100.0
            }
        );
    }

    #[test]
    fn parse_energy_shape_wrong_count() {
        assert!(EnergyShapeWrapper::from_str("16,8").is_err());
        assert!(EnergyShapeWrapper::from_str("16,8,50,2").is_err());
        assert!(EnergyShapeWrapper::from_str("16,eight,50").is_err());
    }

    #[test]
    fn setters_only_touch_their_role() {
        let mut trigger = TriggerShape::default();
        trigger.set_rise_time(4.0);
        trigger.set_flattop(2.0);
        trigger.set_threshold(10.0);
        assert_eq!((trigger.rise_time(), trigger.flattop()), (4.0, 2.0));
        assert_eq!(trigger.threshold, 10.0);

        let mut energy = EnergyShape::default();
        energy.set_decay_constant(50.0);
        assert_eq!(energy.decay_constant, 50.0);
        assert_eq!(energy.rise_time(), 0.0);
    }

    #[test]
    fn command_line() {
        let cli = Cli::parse_from([
            "host",
            "--sample-rate",
            "250000000",
            "--trigger",
            "16,8,100",
            "--energy",
            "400,200,50000",
            "--baseline-guard",
            "7",
            "--pretrigger-offset",
            "3",
        ]);
        let parameters = cli.parameters;
        assert_eq!(parameters.sample_rate, 250_000_000);
        assert_eq!(parameters.time_unit, TimeUnit::Nanoseconds);
        assert_eq!(parameters.energy.0.decay_constant, 50000.0);
        assert_eq!(parameters.settings.baseline_guard, 7);
        assert_eq!(parameters.settings.min_baseline_samples, 1);
        assert_eq!(parameters.settings.pretrigger_offset, Some(3));
        assert!(!parameters.verbose);
    }

    #[test]
    fn config_file() {
        let json = r#"{
            "sample-rate": 100000000,
            "time-unit": "ticks",
            "trigger": { "rise-time": 4, "flattop": 2, "threshold": 100 },
            "energy": { "rise-time": 4, "flattop": 2, "decay-constant": 50 },
            "settings": { "min-baseline-samples": 10 }
        }"#;
        let parameters: TraceFilterParameters = serde_json::from_str(json).unwrap();
        assert_eq!(parameters.time_unit, TimeUnit::Ticks);
        assert_eq!(parameters.trigger.0.threshold, 100.0);
        assert_eq!(parameters.settings.baseline_guard, 5);
        assert_eq!(parameters.settings.min_baseline_samples, 10);
        assert_eq!(parameters.settings.pretrigger_offset, None);

        let filter = parameters.build();
        assert_eq!(filter.state(), crate::PipelineState::Uninitialized);
    }

    #[test]
    fn default_pretrigger_offset_ends_gap_on_trigger() {
        let energy = ShapeTicks {
            rise_time: 10,
            flattop: 6,
        };
        let mut settings = TraceFilterSettings::default();
        assert_eq!(settings.resolve_pretrigger_offset(&energy), 5);
        settings.pretrigger_offset = Some(10);
        assert_eq!(settings.resolve_pretrigger_offset(&energy), 10);
    }
}
