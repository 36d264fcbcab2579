use crate::binding::config::BindingConfig;
use crate::foundation::error::PropdriveResult;
use crate::mapping::curve::Curve1D;
use crate::reflect::path::PropertyPath;
use crate::signal::bus::SignalKey;
use crate::signal::source::DriveMode;
use crate::signal::track::TrackId;
use crate::value::gradient::Gradient;

/// Consuming builder for [`BindingConfig`].
pub struct BindingConfigBuilder {
    config: BindingConfig,
}

impl BindingConfigBuilder {
    /// Start from a target path with all other settings at their defaults.
    pub fn new(path: PropertyPath) -> Self {
        Self {
            config: BindingConfig::new(path),
        }
    }

    /// Select the drive mode.
    pub fn mode(mut self, mode: DriveMode) -> Self {
        self.config.source.mode = mode;
        self
    }

    /// Set the output range.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.config.range.min = min;
        self.config.range.max = max;
        self
    }

    /// Set the range mapping curve.
    pub fn curve(mut self, curve: Curve1D) -> Self {
        self.config.range.curve = curve;
        self
    }

    /// Follow a signal bus key in external-signal mode.
    pub fn signal_key(mut self, key: SignalKey) -> Self {
        self.config.source.external.key = Some(key);
        self
    }

    /// Set the constant multiplier for external-signal mode.
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.config.source.external.multiplier = multiplier;
        self
    }

    /// Drive the multiplier from a secondary bus key through a curve.
    pub fn multiply_by(mut self, key: SignalKey, curve: Curve1D) -> Self {
        self.config.source.external.multiply_by = Some(key);
        self.config.source.external.multiply_curve = curve;
        self
    }

    /// Subscribe to an event-track channel in event-driven mode.
    pub fn event_track(mut self, track: TrackId) -> Self {
        self.config.source.event.track = Some(track);
        self
    }

    /// Subscribe in time-indexed form instead of one-shot form.
    pub fn listen_to_time(mut self, listen: bool) -> Self {
        self.config.source.event.listen_to_time = listen;
        self
    }

    /// Set the one-shot relaxation rate.
    pub fn relax_rate(mut self, rate: f64) -> Self {
        self.config.source.event.relax_rate = rate;
        self
    }

    /// Set oscillator base, frequency and amplitude.
    pub fn oscillator(mut self, base: f64, frequency: f64, amplitude: f64) -> Self {
        self.config.source.oscillator.base = base;
        self.config.source.oscillator.frequency = frequency;
        self.config.source.oscillator.amplitude = amplitude;
        self
    }

    /// Set the oscillator waveform.
    pub fn oscillator_shape(mut self, shape: Curve1D) -> Self {
        self.config.source.oscillator.shape = shape;
        self
    }

    /// Draw a per-activation phase offset instead of starting at phase 0.
    pub fn oscillator_random_seed(mut self, random: bool) -> Self {
        self.config.source.oscillator.random_seed = random;
        self
    }

    /// Set the manual drive value.
    pub fn manual_value(mut self, value: f64) -> Self {
        self.config.source.manual_value = value;
        self
    }

    /// Route scalar productions into color members through a gradient.
    pub fn gradient(mut self, gradient: Gradient) -> Self {
        self.config.gradient = Some(gradient);
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> PropdriveResult<BindingConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
