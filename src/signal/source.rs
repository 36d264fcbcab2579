use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::core::TickCtx;
use crate::foundation::error::{PropdriveError, PropdriveResult};
use crate::foundation::math::Rng64;
use crate::mapping::curve::{Curve1D, CurveKey};
use crate::mapping::range::RangeCurve;
use crate::signal::bus::{SignalBus, SignalKey};
use crate::signal::track::TrackId;

/// Which signal source variant currently drives a binding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DriveMode {
    /// Follow a value published on the external signal bus.
    #[default]
    ExternalSignal,
    /// React to discrete event-track triggers or time-indexed payloads.
    EventDriven,
    /// A caller-settable scalar passed through the range/curve mapper.
    Manual,
    /// Free-running oscillator `base + shape(phase) * amplitude`.
    Oscillator,
}

/// Parameters for [`DriveMode::ExternalSignal`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExternalSignalConfig {
    /// Bus key to follow; `None` falls back to the manual computation.
    #[serde(default)]
    pub key: Option<SignalKey>,
    /// Constant multiplier applied to the bus value when no multiplier
    /// signal is assigned.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Optional secondary bus key whose value drives the multiplier.
    #[serde(default)]
    pub multiply_by: Option<SignalKey>,
    /// Curve resolving the multiplier signal into the effective multiplier.
    #[serde(default)]
    pub multiply_curve: Curve1D,
}

fn default_multiplier() -> f64 {
    1.0
}

impl Default for ExternalSignalConfig {
    fn default() -> Self {
        Self {
            key: None,
            multiplier: 1.0,
            multiply_by: None,
            multiply_curve: Curve1D::linear(),
        }
    }
}

/// Parameters for [`DriveMode::EventDriven`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EventDrivenConfig {
    /// Event-track channel to subscribe to.
    #[serde(default)]
    pub track: Option<TrackId>,
    /// Subscribe in time-indexed form instead of one-shot form.
    #[serde(default)]
    pub listen_to_time: bool,
    /// Exponential relaxation rate (per second) back toward the range
    /// minimum after a one-shot trigger. Zero disables relaxation: the
    /// trigger writes the maximum once and stops.
    #[serde(default = "default_relax_rate")]
    pub relax_rate: f64,
}

fn default_relax_rate() -> f64 {
    0.5
}

impl Default for EventDrivenConfig {
    fn default() -> Self {
        Self {
            track: None,
            listen_to_time: false,
            relax_rate: 0.5,
        }
    }
}

/// Parameters for [`DriveMode::Oscillator`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OscillatorConfig {
    /// Output offset.
    #[serde(default)]
    pub base: f64,
    /// Oscillation frequency in cycles per second.
    #[serde(default = "default_frequency")]
    pub frequency: f64,
    /// Scale applied to the shape output.
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
    /// Draw a deterministic per-activation phase offset instead of 0.
    #[serde(default)]
    pub random_seed: bool,
    /// Waveform over one normalized cycle; defaults to a triangle-like
    /// wave through (0,1), (0.5,-1), (1,1).
    #[serde(default = "default_oscillator_shape")]
    pub shape: Curve1D,
}

fn default_frequency() -> f64 {
    0.25
}

fn default_amplitude() -> f64 {
    1.0
}

/// Default oscillator waveform: 1 at phase 0, -1 at phase 0.5, 1 at phase 1.
pub fn default_oscillator_shape() -> Curve1D {
    Curve1D::Points(vec![
        CurveKey::new(0.0, 1.0),
        CurveKey::new(0.5, -1.0),
        CurveKey::new(1.0, 1.0),
    ])
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            base: 0.0,
            frequency: 0.25,
            amplitude: 1.0,
            random_seed: false,
            shape: default_oscillator_shape(),
        }
    }
}

/// Complete signal source configuration: the active mode plus the parameters
/// of all four variants. Inactive variants keep their configuration so a
/// mode switch resumes from it.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SourceConfig {
    /// Active drive mode.
    #[serde(default)]
    pub mode: DriveMode,
    /// External-signal parameters.
    #[serde(default)]
    pub external: ExternalSignalConfig,
    /// Event-driven parameters.
    #[serde(default)]
    pub event: EventDrivenConfig,
    /// Oscillator parameters.
    #[serde(default)]
    pub oscillator: OscillatorConfig,
    /// Manual drive value (also the external-signal fallback input).
    #[serde(default)]
    pub manual_value: f64,
}

impl SourceConfig {
    /// Validate all variant parameters.
    pub fn validate(&self) -> PropdriveResult<()> {
        self.external.multiply_curve.validate()?;
        self.oscillator.shape.validate()?;
        if self.event.relax_rate < 0.0 {
            return Err(PropdriveError::validation("relax_rate must be >= 0"));
        }
        if !(self.oscillator.frequency.is_finite() && self.oscillator.amplitude.is_finite()) {
            return Err(PropdriveError::validation(
                "oscillator frequency and amplitude must be finite",
            ));
        }
        Ok(())
    }
}

/// Mailbox filled by event-track handlers and drained on the next tick.
#[derive(Debug, Default)]
pub(crate) struct EventInbox {
    pub(crate) one_shot: bool,
    pub(crate) time_sample: Option<f64>,
}

/// Runtime state of a binding's active signal source.
///
/// Owns the transient state that is not part of configuration: the
/// per-activation oscillator phase seed, the in-flight one-shot relaxation
/// level, and the event mailbox shared with track handlers.
pub struct SignalSource {
    mode: DriveMode,
    phase_seed: f64,
    relax: Option<f64>,
    inbox: Rc<RefCell<EventInbox>>,
}

const RELAX_EPSILON: f64 = 1e-4;

impl SignalSource {
    /// Create runtime state for a configuration, drawing the oscillator
    /// phase seed deterministically from `seed` when requested.
    pub(crate) fn new(config: &SourceConfig, seed: u64) -> Self {
        let phase_seed = if config.oscillator.random_seed {
            Rng64::new(seed).next_f64_01()
        } else {
            0.0
        };
        Self {
            mode: config.mode,
            phase_seed,
            relax: None,
            inbox: Rc::new(RefCell::new(EventInbox::default())),
        }
    }

    /// Switch modes, dropping transient state belonging to the old one.
    pub(crate) fn set_mode(&mut self, mode: DriveMode) {
        self.mode = mode;
        self.clear_transients();
    }

    /// Shared mailbox handle for event-track handlers.
    pub(crate) fn inbox(&self) -> Rc<RefCell<EventInbox>> {
        Rc::clone(&self.inbox)
    }

    /// Whether a one-shot relaxation is in flight.
    pub(crate) fn relaxing(&self) -> bool {
        self.relax.is_some()
    }

    /// Drop any in-flight one-shot relaxation and pending events.
    pub(crate) fn clear_transients(&mut self) {
        self.relax = None;
        let mut inbox = self.inbox.borrow_mut();
        inbox.one_shot = false;
        inbox.time_sample = None;
    }

    /// Produce this tick's output value, already range-mapped where the mode
    /// calls for it. `None` means the source has nothing to write this tick.
    pub(crate) fn produce(
        &mut self,
        config: &SourceConfig,
        range: &RangeCurve,
        bus: &dyn SignalBus,
        ctx: TickCtx,
    ) -> Option<f64> {
        let (fired, time_sample) = {
            let mut inbox = self.inbox.borrow_mut();
            (
                std::mem::take(&mut inbox.one_shot),
                inbox.time_sample.take(),
            )
        };

        if fired {
            if config.event.relax_rate > 0.0 {
                self.relax = Some(range.max);
            } else {
                // No relaxation configured: flash once and stop.
                self.relax = None;
                return Some(range.max);
            }
        }

        // An in-flight flash-and-decay takes precedence over the base mode.
        if let Some(level) = self.relax {
            let next = relax_step(level, range.min, config.event.relax_rate, ctx.dt);
            self.relax = if (next - range.min).abs() <= RELAX_EPSILON {
                None
            } else {
                Some(next)
            };
            return Some(level);
        }

        match self.mode {
            DriveMode::ExternalSignal => match &config.external.key {
                Some(key) => {
                    let multiplier = match &config.external.multiply_by {
                        Some(mk) => config.external.multiply_curve.eval(bus.value(mk)),
                        None => config.external.multiplier,
                    };
                    Some(range.map(bus.value(key) * multiplier))
                }
                None => Some(range.map(config.manual_value)),
            },
            DriveMode::Manual => Some(range.map(config.manual_value)),
            DriveMode::Oscillator => {
                let osc = &config.oscillator;
                let phase = (ctx.time * osc.frequency + self.phase_seed).rem_euclid(1.0);
                Some(osc.base + osc.shape.eval(phase) * osc.amplitude)
            }
            DriveMode::EventDriven => time_sample.map(|s| range.lerp(s)),
        }
    }
}

fn relax_step(level: f64, floor: f64, rate: f64, dt: f64) -> f64 {
    floor + (level - floor) * (-rate * dt.max(0.0)).exp()
}

#[cfg(test)]
#[path = "../../tests/unit/signal/source.rs"]
mod tests;
