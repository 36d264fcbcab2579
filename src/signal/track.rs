use crate::foundation::core::BindingId;
use crate::mapping::curve::Curve1D;

/// Identifier of one event-track channel.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a track identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Track name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Continuous time-indexed payload carried by an event, sampled by offset.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurvePayload {
    /// Payload curve over the event's normalized playback offset.
    pub curve: Curve1D,
}

impl CurvePayload {
    /// Sample the payload at a normalized offset in `[0, 1]`.
    pub fn value_at(&self, offset: f64) -> f64 {
        self.curve.eval(offset)
    }
}

/// A discrete event delivered on a track channel.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrackEvent {
    /// Event start time in seconds.
    pub start: f64,
    /// Event end time in seconds (equal to `start` for instantaneous events).
    pub end: f64,
    /// Optional continuous payload for time-indexed delivery.
    pub payload: Option<CurvePayload>,
}

impl TrackEvent {
    /// Normalized progress of `time` through the event span, clamped to
    /// `[0, 1]`. Instantaneous events report 1.
    pub fn progress_at(&self, time: f64) -> f64 {
        let span = self.end - self.start;
        if span <= f64::EPSILON {
            return 1.0;
        }
        ((time - self.start) / span).clamp(0.0, 1.0)
    }
}

/// Handler invoked for one-shot event triggers.
pub type OneShotHandler = Box<dyn FnMut(&TrackEvent)>;

/// Handler invoked for time-indexed events with sample time and delta.
pub type TimeIndexedHandler = Box<dyn FnMut(&TrackEvent, f64, f64)>;

/// Discrete-event source consumed by event-driven bindings.
///
/// A subscriber registers exactly one form per channel (one-shot or
/// time-indexed, mutually exclusive); re-registering replaces the previous
/// handler rather than duplicating it, and unregistering a subscriber that
/// was never registered is a no-op. Events must be delivered on the
/// scheduler thread, before binding ticks for the same frame.
pub trait EventTrack {
    /// Register for discrete triggers on a channel.
    fn register_one_shot(&mut self, track: &TrackId, subscriber: BindingId, handler: OneShotHandler);

    /// Register for continuous time-indexed delivery on a channel.
    fn register_time_indexed(
        &mut self,
        track: &TrackId,
        subscriber: BindingId,
        handler: TimeIndexedHandler,
    );

    /// Drop all registrations held by a subscriber.
    fn unregister_all(&mut self, subscriber: BindingId);
}

enum Registration {
    OneShot(OneShotHandler),
    TimeIndexed(TimeIndexedHandler),
}

/// Single-threaded in-memory [`EventTrack`] driven by the host.
#[derive(Default)]
pub struct MemoryEventTrack {
    registrations: Vec<(TrackId, BindingId, Registration)>,
}

impl MemoryEventTrack {
    /// Create an empty track source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a one-shot trigger to all one-shot subscribers of a channel.
    pub fn fire(&mut self, track: &TrackId, event: &TrackEvent) {
        for (id, _, registration) in &mut self.registrations {
            if id == track
                && let Registration::OneShot(handler) = registration
            {
                handler(event);
            }
        }
    }

    /// Advance time-indexed subscribers of a channel to `sample_time`.
    pub fn advance(&mut self, track: &TrackId, event: &TrackEvent, sample_time: f64, sample_delta: f64) {
        for (id, _, registration) in &mut self.registrations {
            if id == track
                && let Registration::TimeIndexed(handler) = registration
            {
                handler(event, sample_time, sample_delta);
            }
        }
    }

    /// Number of registrations held by a subscriber.
    pub fn registration_count(&self, subscriber: BindingId) -> usize {
        self.registrations
            .iter()
            .filter(|(_, s, _)| *s == subscriber)
            .count()
    }

    fn register(&mut self, track: &TrackId, subscriber: BindingId, registration: Registration) {
        // One registration per (channel, subscriber); re-register replaces.
        self.registrations
            .retain(|(t, s, _)| !(t == track && *s == subscriber));
        self.registrations
            .push((track.clone(), subscriber, registration));
    }
}

impl EventTrack for MemoryEventTrack {
    fn register_one_shot(&mut self, track: &TrackId, subscriber: BindingId, handler: OneShotHandler) {
        self.register(track, subscriber, Registration::OneShot(handler));
    }

    fn register_time_indexed(
        &mut self,
        track: &TrackId,
        subscriber: BindingId,
        handler: TimeIndexedHandler,
    ) {
        self.register(track, subscriber, Registration::TimeIndexed(handler));
    }

    fn unregister_all(&mut self, subscriber: BindingId) {
        self.registrations.retain(|(_, s, _)| *s != subscriber);
    }
}
