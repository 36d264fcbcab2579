//! Propdrive drives arbitrary object properties from live signal sources.
//!
//! One [`Binding`] connects a named (possibly nested) property of a target
//! object to one of four interchangeable drive modes, recomputed once per
//! host tick:
//!
//! 1. **Resolve**: `PropertyPath + PropertyStore -> ResolvedTarget` (once, at
//!    activation; failure disables the binding without failing the host)
//! 2. **Produce**: the active [`DriveMode`] turns bus values, event triggers,
//!    a manual scalar or an oscillator phase into this tick's scalar
//! 3. **Map**: [`RangeCurve`] remaps the scalar into the configured range
//! 4. **Write**: the value shape codec merges the result into the member,
//!    shape-aware (scalar broadcast into vectors, component writes that
//!    leave siblings untouched, scalar-to-color via [`Gradient`])
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: no ambient randomness; oscillator phase
//!   seeds derive from an explicit activation seed.
//! - **No globals**: the signal bus, event track and property store are
//!   injected at the call site, never looked up.
//! - **Tick isolation**: a broken binding logs once and goes inert; it never
//!   stalls or fails the host scheduler.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod binding;
mod foundation;
mod mapping;
mod reflect;
mod signal;
mod value;

pub use binding::config::BindingConfig;
pub use binding::driver::Binding;
pub use binding::dsl::BindingConfigBuilder;
pub use foundation::core::{BindingId, ColorRgba, TickCtx, Vec2, Vec3, Vec4};
pub use foundation::error::{PropdriveError, PropdriveResult};
pub use mapping::curve::{Curve1D, CurveKey};
pub use mapping::ease::Ease;
pub use mapping::range::RangeCurve;
pub use reflect::path::{PropertyPath, ResolvedTarget};
pub use reflect::store::{MapStore, MemberInfo, PropertyStore};
pub use signal::bus::{MemorySignalBus, SignalBus, SignalKey};
pub use signal::source::{
    DriveMode, EventDrivenConfig, ExternalSignalConfig, OscillatorConfig, SourceConfig,
    default_oscillator_shape,
};
pub use signal::track::{
    CurvePayload, EventTrack, MemoryEventTrack, OneShotHandler, TimeIndexedHandler, TrackEvent,
    TrackId,
};
pub use value::compound::{CompoundValue, ShapeTag};
pub use value::gradient::{Gradient, GradientStop};
