use crate::binding::config::BindingConfig;
use crate::foundation::core::{BindingId, TickCtx};
use crate::foundation::error::{PropdriveError, PropdriveResult};
use crate::foundation::math::stable_hash64;
use crate::reflect::path::ResolvedTarget;
use crate::reflect::store::PropertyStore;
use crate::signal::bus::SignalBus;
use crate::signal::source::{DriveMode, SignalSource};
use crate::signal::track::EventTrack;
use crate::value::compound::{CompoundValue, ShapeTag};

/// One configured binding driving a single target property from a signal
/// source.
///
/// Created at activation, re-configured in place, destroyed (unregistered
/// from bus and track) at teardown. The host scheduler calls [`tick`]
/// exactly once per frame, strictly after all signal producers for that
/// frame have published.
///
/// A binding never propagates per-tick failures to the scheduler: failures
/// are logged once and either skipped (shape mismatches) or permanently
/// disable the binding (everything else).
///
/// [`tick`]: Binding::tick
pub struct Binding {
    id: BindingId,
    config: BindingConfig,
    seed: u64,
    target: Option<ResolvedTarget>,
    source: SignalSource,
    enabled: bool,
    fault: Option<PropdriveError>,
    shape_warned: bool,
}

impl Binding {
    /// Activate a binding: validate the configuration, resolve the target
    /// path and register with the bus/track as the mode requires.
    ///
    /// Activation never fails the caller. A path that does not resolve (or
    /// an invalid configuration) leaves the binding permanently disabled
    /// with the error recorded in [`fault`](Binding::fault); subsequent
    /// ticks produce no writes.
    #[tracing::instrument(skip_all, fields(binding = id.0))]
    pub fn activate(
        id: BindingId,
        config: BindingConfig,
        store: &dyn PropertyStore,
        bus: &mut dyn SignalBus,
        track: &mut dyn EventTrack,
        seed: u64,
    ) -> Self {
        let source = SignalSource::new(&config.source, stable_hash64(seed, config.path.member()));
        let mut binding = Self {
            id,
            config,
            seed,
            target: None,
            source,
            enabled: true,
            fault: None,
            shape_warned: false,
        };
        binding.resolve_and_register(store, bus, track);
        binding
    }

    /// Binding identity used for bus/track registrations.
    pub fn id(&self) -> BindingId {
        self.id
    }

    /// Whether the binding is still writing.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The permanent fault that disabled this binding, if any.
    pub fn fault(&self) -> Option<&PropdriveError> {
        self.fault.as_ref()
    }

    /// Current configuration.
    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// The resolved target, when activation succeeded.
    pub fn target(&self) -> Option<&ResolvedTarget> {
        self.target.as_ref()
    }

    /// Set the manual drive value (also the external-signal fallback input).
    pub fn set_manual_value(&mut self, value: f64) {
        self.config.source.manual_value = value;
    }

    /// Switch the active drive mode, moving registrations accordingly.
    ///
    /// No value is written until the new mode's first production; transient
    /// state of the old mode (in-flight relaxation, pending events) is
    /// dropped.
    pub fn set_mode(&mut self, mode: DriveMode, bus: &mut dyn SignalBus, track: &mut dyn EventTrack) {
        if self.config.source.mode == mode {
            return;
        }
        bus.unregister_all(self.id);
        track.unregister_all(self.id);
        self.config.source.mode = mode;
        self.source.set_mode(mode);
        if self.enabled {
            self.register(bus, track);
        }
    }

    /// Replace the configuration in place: re-resolve the path, re-register
    /// subscriptions and re-enable or disable accordingly.
    pub fn reconfigure(
        &mut self,
        config: BindingConfig,
        store: &dyn PropertyStore,
        bus: &mut dyn SignalBus,
        track: &mut dyn EventTrack,
    ) {
        bus.unregister_all(self.id);
        track.unregister_all(self.id);

        self.source = SignalSource::new(
            &config.source,
            stable_hash64(self.seed, config.path.member()),
        );
        self.config = config;
        self.target = None;
        self.enabled = true;
        self.fault = None;
        self.shape_warned = false;

        self.resolve_and_register(store, bus, track);
    }

    /// Produce and write this tick's value.
    #[tracing::instrument(skip_all, fields(binding = self.id.0))]
    pub fn tick(&mut self, store: &mut dyn PropertyStore, bus: &dyn SignalBus, ctx: TickCtx) {
        if !self.enabled {
            return;
        }
        let Some(value) = self
            .source
            .produce(&self.config.source, &self.config.range, bus, ctx)
        else {
            return;
        };
        self.apply(store, value);
    }

    /// Unconditionally unregister from bus and track and stop writing.
    ///
    /// Clears any in-flight one-shot relaxation so a destroyed target is not
    /// left mid-decay.
    pub fn teardown(&mut self, bus: &mut dyn SignalBus, track: &mut dyn EventTrack) {
        bus.unregister_all(self.id);
        track.unregister_all(self.id);
        if self.source.relaxing() {
            tracing::debug!(binding = self.id.0, "teardown cancels in-flight relaxation");
        }
        self.source.clear_transients();
        self.enabled = false;
    }

    fn resolve_and_register(
        &mut self,
        store: &dyn PropertyStore,
        bus: &mut dyn SignalBus,
        track: &mut dyn EventTrack,
    ) {
        if let Err(err) = self.config.validate() {
            self.disable(err);
            return;
        }
        match self.config.path.resolve(store) {
            Ok(target) => {
                self.target = Some(target);
                self.register(bus, track);
            }
            Err(err) => self.disable(err),
        }
    }

    fn register(&mut self, bus: &mut dyn SignalBus, track: &mut dyn EventTrack) {
        match self.config.source.mode {
            DriveMode::ExternalSignal => {
                if let Some(key) = &self.config.source.external.key {
                    bus.register_callback(key, self.id);
                    if let Some(multiply_by) = &self.config.source.external.multiply_by {
                        bus.register_callback(multiply_by, self.id);
                    }
                }
            }
            DriveMode::EventDriven => {
                if let Some(track_id) = &self.config.source.event.track {
                    let inbox = self.source.inbox();
                    if self.config.source.event.listen_to_time {
                        track.register_time_indexed(
                            track_id,
                            self.id,
                            Box::new(move |event, sample_time, _sample_delta| {
                                if let Some(payload) = &event.payload {
                                    inbox.borrow_mut().time_sample =
                                        Some(payload.value_at(event.progress_at(sample_time)));
                                }
                            }),
                        );
                    } else {
                        track.register_one_shot(
                            track_id,
                            self.id,
                            Box::new(move |_event| {
                                inbox.borrow_mut().one_shot = true;
                            }),
                        );
                    }
                }
            }
            DriveMode::Manual | DriveMode::Oscillator => {}
        }
    }

    fn apply(&mut self, store: &mut dyn PropertyStore, value: f64) {
        let Some(target) = self.target.clone() else {
            return;
        };
        match self.write_value(store, &target, value) {
            Ok(()) => {}
            Err(PropdriveError::ShapeMismatch(msg)) => {
                if !self.shape_warned {
                    tracing::warn!(
                        binding = self.id.0,
                        path = %target.path(),
                        %msg,
                        "value write skipped: shape mismatch"
                    );
                    self.shape_warned = true;
                }
            }
            Err(err) => self.disable(err),
        }
    }

    fn write_value(
        &self,
        store: &mut dyn PropertyStore,
        target: &ResolvedTarget,
        value: f64,
    ) -> PropdriveResult<()> {
        // The live tag decides the write shape, not the tag cached at
        // resolution.
        let live_tag = store.get(target.path().member())?.tag();
        let incoming = if live_tag == ShapeTag::Color && target.path().sub_member().is_none() {
            match &self.config.gradient {
                Some(gradient) => CompoundValue::Color(gradient.sample(value)),
                None => CompoundValue::Float(value),
            }
        } else {
            CompoundValue::Float(value)
        };
        target.write(store, &incoming)
    }

    fn disable(&mut self, err: PropdriveError) {
        tracing::warn!(
            binding = self.id.0,
            path = %self.config.path,
            error = %err,
            "binding disabled"
        );
        self.enabled = false;
        self.fault = Some(err);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/binding/driver.rs"]
mod tests;
