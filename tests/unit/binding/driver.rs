use super::*;
use crate::binding::dsl::BindingConfigBuilder;
use crate::foundation::core::{ColorRgba, Vec3};
use crate::reflect::path::PropertyPath;
use crate::reflect::store::MapStore;
use crate::signal::bus::{MemorySignalBus, SignalKey};
use crate::signal::track::{CurvePayload, MemoryEventTrack, TrackEvent, TrackId};
use crate::value::gradient::Gradient;
use crate::mapping::curve::Curve1D;

fn ctx(time: f64) -> TickCtx {
    TickCtx { time, dt: 0.1 }
}

fn store() -> MapStore {
    MapStore::new()
        .with("my_float", CompoundValue::Float(0.0))
        .with("position", CompoundValue::Vec3(Vec3::new(1.0, 2.0, 3.0)))
        .with("tint", CompoundValue::Color(ColorRgba::new(1.0, 0.0, 0.0, 1.0)))
}

struct Harness {
    store: MapStore,
    bus: MemorySignalBus,
    track: MemoryEventTrack,
}

impl Harness {
    fn new() -> Self {
        Self {
            store: store(),
            bus: MemorySignalBus::new(),
            track: MemoryEventTrack::new(),
        }
    }

    fn activate(&mut self, config: BindingConfig) -> Binding {
        Binding::activate(
            BindingId(1),
            config,
            &self.store,
            &mut self.bus,
            &mut self.track,
            0,
        )
    }
}

#[test]
fn manual_mode_drives_a_float_member() {
    let mut h = Harness::new();
    let config = BindingConfigBuilder::new(PropertyPath::parse("my_float").unwrap())
        .mode(DriveMode::Manual)
        .range(0.0, 10.0)
        .manual_value(0.5)
        .build()
        .unwrap();
    let mut binding = h.activate(config);
    assert!(binding.is_enabled());

    binding.tick(&mut h.store, &h.bus, ctx(0.0));
    assert_eq!(h.store.get("my_float").unwrap(), CompoundValue::Float(5.0));
}

#[test]
fn unresolvable_path_disables_the_binding() {
    let mut h = Harness::new();
    let config = BindingConfig::new(PropertyPath::parse("does_not_exist").unwrap());
    let mut binding = h.activate(config);

    assert!(!binding.is_enabled());
    assert!(matches!(
        binding.fault(),
        Some(PropdriveError::MemberNotFound(_))
    ));

    let before = h.store.clone();
    binding.tick(&mut h.store, &h.bus, ctx(0.0));
    binding.tick(&mut h.store, &h.bus, ctx(0.1));
    assert_eq!(h.store, before, "a disabled binding must not write");
}

#[test]
fn component_path_writes_only_the_named_component() {
    let mut h = Harness::new();
    let config = BindingConfigBuilder::new(PropertyPath::parse("position.y").unwrap())
        .mode(DriveMode::Manual)
        .range(0.0, 1.0)
        .manual_value(0.25)
        .build()
        .unwrap();
    let mut binding = h.activate(config);

    binding.tick(&mut h.store, &h.bus, ctx(0.0));
    assert_eq!(
        h.store.get("position").unwrap(),
        CompoundValue::Vec3(Vec3::new(1.0, 0.25, 3.0))
    );
}

#[test]
fn color_channel_scenario_leaves_other_channels() {
    let mut h = Harness::new();
    let config = BindingConfigBuilder::new(PropertyPath::parse("tint.g").unwrap())
        .mode(DriveMode::Manual)
        .range(0.0, 1.0)
        .manual_value(0.8)
        .build()
        .unwrap();
    let mut binding = h.activate(config);

    binding.tick(&mut h.store, &h.bus, ctx(0.0));
    assert_eq!(
        h.store.get("tint").unwrap(),
        CompoundValue::Color(ColorRgba::new(1.0, 0.8, 0.0, 1.0))
    );
}

#[test]
fn scalar_into_whole_color_routes_through_the_gradient() {
    let mut h = Harness::new();
    let config = BindingConfigBuilder::new(PropertyPath::parse("tint").unwrap())
        .mode(DriveMode::Manual)
        .manual_value(0.5)
        .gradient(Gradient::between(
            ColorRgba::new(0.0, 0.0, 0.0, 1.0),
            ColorRgba::new(1.0, 1.0, 1.0, 1.0),
        ))
        .build()
        .unwrap();
    let mut binding = h.activate(config);

    binding.tick(&mut h.store, &h.bus, ctx(0.0));
    let CompoundValue::Color(c) = h.store.get("tint").unwrap() else {
        panic!("tint must stay a color");
    };
    assert!((c.r - 0.5).abs() < 1e-12);
    assert!((c.g - 0.5).abs() < 1e-12);
    assert!((c.a - 1.0).abs() < 1e-12);
}

#[test]
fn scalar_into_whole_color_without_gradient_skips_but_stays_enabled() {
    let mut h = Harness::new();
    let config = BindingConfigBuilder::new(PropertyPath::parse("tint").unwrap())
        .mode(DriveMode::Manual)
        .manual_value(0.5)
        .build()
        .unwrap();
    let mut binding = h.activate(config);

    binding.tick(&mut h.store, &h.bus, ctx(0.0));
    assert_eq!(
        h.store.get("tint").unwrap(),
        CompoundValue::Color(ColorRgba::new(1.0, 0.0, 0.0, 1.0)),
        "mismatched write must be skipped"
    );
    assert!(binding.is_enabled(), "shape mismatch is not fatal");
}

#[test]
fn external_signal_mode_registers_and_follows_the_bus() {
    let mut h = Harness::new();
    let key = SignalKey::new("energy");
    let config = BindingConfigBuilder::new(PropertyPath::parse("my_float").unwrap())
        .mode(DriveMode::ExternalSignal)
        .signal_key(key.clone())
        .range(0.0, 2.0)
        .build()
        .unwrap();
    let mut binding = h.activate(config);
    assert_eq!(h.bus.subscriber_count(&key), 1);

    h.bus.publish(&key, 0.5);
    binding.tick(&mut h.store, &h.bus, ctx(0.0));
    assert_eq!(h.store.get("my_float").unwrap(), CompoundValue::Float(1.0));

    // Late-tick ordering: the tick reads the current frame's publish.
    h.bus.publish(&key, 1.0);
    binding.tick(&mut h.store, &h.bus, ctx(0.1));
    assert_eq!(h.store.get("my_float").unwrap(), CompoundValue::Float(2.0));
}

#[test]
fn one_shot_event_flashes_and_relaxes_through_ticks() {
    let mut h = Harness::new();
    let channel = TrackId::new("kick");
    let config = BindingConfigBuilder::new(PropertyPath::parse("my_float").unwrap())
        .mode(DriveMode::EventDriven)
        .event_track(channel.clone())
        .range(0.0, 8.0)
        .relax_rate(5.0)
        .build()
        .unwrap();
    let mut binding = h.activate(config);
    assert_eq!(h.track.registration_count(binding.id()), 1);

    // No event yet: nothing written.
    binding.tick(&mut h.store, &h.bus, ctx(0.0));
    assert_eq!(h.store.get("my_float").unwrap(), CompoundValue::Float(0.0));

    let event = TrackEvent {
        start: 0.1,
        end: 0.1,
        payload: None,
    };
    h.track.fire(&channel, &event);
    binding.tick(&mut h.store, &h.bus, ctx(0.1));
    assert_eq!(h.store.get("my_float").unwrap(), CompoundValue::Float(8.0));

    binding.tick(&mut h.store, &h.bus, ctx(0.2));
    let CompoundValue::Float(relaxed) = h.store.get("my_float").unwrap() else {
        panic!("shape changed");
    };
    assert!(relaxed < 8.0);
    assert!(relaxed > 0.0);
}

#[test]
fn time_indexed_event_samples_its_payload_curve() {
    let mut h = Harness::new();
    let channel = TrackId::new("sweep");
    let config = BindingConfigBuilder::new(PropertyPath::parse("my_float").unwrap())
        .mode(DriveMode::EventDriven)
        .event_track(channel.clone())
        .listen_to_time(true)
        .range(0.0, 10.0)
        .build()
        .unwrap();
    let mut binding = h.activate(config);

    let event = TrackEvent {
        start: 0.0,
        end: 2.0,
        payload: Some(CurvePayload {
            curve: Curve1D::linear(),
        }),
    };
    // Halfway through the event span, a linear payload samples 0.5.
    h.track.advance(&channel, &event, 1.0, 0.1);
    binding.tick(&mut h.store, &h.bus, ctx(1.0));
    assert_eq!(h.store.get("my_float").unwrap(), CompoundValue::Float(5.0));
}

#[test]
fn mode_switch_writes_nothing_until_the_new_mode_produces() {
    let mut h = Harness::new();
    let channel = TrackId::new("kick");
    let config = BindingConfigBuilder::new(PropertyPath::parse("my_float").unwrap())
        .mode(DriveMode::Manual)
        .range(0.0, 10.0)
        .manual_value(0.7)
        .event_track(channel.clone())
        .build()
        .unwrap();
    let mut binding = h.activate(config);

    binding.tick(&mut h.store, &h.bus, ctx(0.0));
    assert_eq!(h.store.get("my_float").unwrap(), CompoundValue::Float(7.0));

    binding.set_mode(DriveMode::EventDriven, &mut h.bus, &mut h.track);
    assert_eq!(h.track.registration_count(binding.id()), 1);

    // Event-driven produces nothing until an event arrives; the target keeps
    // the last written value.
    binding.tick(&mut h.store, &h.bus, ctx(0.1));
    assert_eq!(h.store.get("my_float").unwrap(), CompoundValue::Float(7.0));
}

#[test]
fn teardown_unregisters_and_clears_inflight_relaxation() {
    let mut h = Harness::new();
    let channel = TrackId::new("kick");
    let key = SignalKey::new("energy");
    let config = BindingConfigBuilder::new(PropertyPath::parse("my_float").unwrap())
        .mode(DriveMode::EventDriven)
        .event_track(channel.clone())
        .range(0.0, 8.0)
        .build()
        .unwrap();
    let mut binding = h.activate(config);
    h.bus.register_callback(&key, binding.id());

    let event = TrackEvent {
        start: 0.0,
        end: 0.0,
        payload: None,
    };
    h.track.fire(&channel, &event);
    binding.tick(&mut h.store, &h.bus, ctx(0.0));
    assert_eq!(h.store.get("my_float").unwrap(), CompoundValue::Float(8.0));

    binding.teardown(&mut h.bus, &mut h.track);
    assert!(!binding.is_enabled());
    assert_eq!(h.track.registration_count(binding.id()), 0);
    assert_eq!(h.bus.subscriber_count(&key), 0);

    // No dangling decay after teardown.
    binding.tick(&mut h.store, &h.bus, ctx(0.1));
    assert_eq!(h.store.get("my_float").unwrap(), CompoundValue::Float(8.0));

    // Tearing down twice is a no-op.
    binding.teardown(&mut h.bus, &mut h.track);
}

#[test]
fn midflight_store_failure_disables_after_one_report() {
    let mut h = Harness::new();
    let config = BindingConfigBuilder::new(PropertyPath::parse("my_float").unwrap())
        .mode(DriveMode::Manual)
        .manual_value(0.5)
        .build()
        .unwrap();
    let mut binding = h.activate(config);
    binding.tick(&mut h.store, &h.bus, ctx(0.0));
    assert!(binding.is_enabled());

    h.store.remove("my_float");
    binding.tick(&mut h.store, &h.bus, ctx(0.1));
    assert!(!binding.is_enabled());
    assert!(matches!(
        binding.fault(),
        Some(PropdriveError::MemberNotFound(_))
    ));

    // Restoring the member does not revive the binding: no retry per tick.
    h.store.insert("my_float", CompoundValue::Float(0.0));
    binding.tick(&mut h.store, &h.bus, ctx(0.2));
    assert_eq!(h.store.get("my_float").unwrap(), CompoundValue::Float(0.0));
}

#[test]
fn store_reporting_unsupported_type_disables_at_activation() {
    struct OpaqueStore;

    impl crate::reflect::store::PropertyStore for OpaqueStore {
        fn list_writable_members(&self) -> Vec<crate::reflect::store::MemberInfo> {
            Vec::new()
        }

        fn get(&self, member: &str) -> PropdriveResult<CompoundValue> {
            Err(PropdriveError::unsupported_type(member))
        }

        fn set(&mut self, _member: &str, _value: CompoundValue) -> PropdriveResult<()> {
            Ok(())
        }
    }

    let mut bus = MemorySignalBus::new();
    let mut track = MemoryEventTrack::new();
    let config = BindingConfig::new(PropertyPath::parse("matrix").unwrap());
    let binding = Binding::activate(
        BindingId(1),
        config,
        &OpaqueStore,
        &mut bus,
        &mut track,
        0,
    );
    assert!(!binding.is_enabled());
    assert!(matches!(
        binding.fault(),
        Some(PropdriveError::UnsupportedType(_))
    ));
}

#[test]
fn reconfigure_rebinds_and_reenables_in_place() {
    let mut h = Harness::new();
    let config = BindingConfig::new(PropertyPath::parse("does_not_exist").unwrap());
    let mut binding = h.activate(config);
    assert!(!binding.is_enabled());

    let fixed = BindingConfigBuilder::new(PropertyPath::parse("my_float").unwrap())
        .mode(DriveMode::Manual)
        .range(0.0, 4.0)
        .manual_value(1.0)
        .build()
        .unwrap();
    binding.reconfigure(fixed, &h.store, &mut h.bus, &mut h.track);
    assert!(binding.is_enabled());
    assert!(binding.fault().is_none());

    binding.tick(&mut h.store, &h.bus, ctx(0.0));
    assert_eq!(h.store.get("my_float").unwrap(), CompoundValue::Float(4.0));
}

#[test]
fn identical_oscillator_bindings_write_identical_values() {
    let make = |h: &mut Harness, id: u64| {
        let config = BindingConfigBuilder::new(PropertyPath::parse("my_float").unwrap())
            .mode(DriveMode::Oscillator)
            .oscillator(0.0, 2.0, 1.0)
            .build()
            .unwrap();
        Binding::activate(BindingId(id), config, &h.store, &mut h.bus, &mut h.track, 0)
    };

    let mut h = Harness::new();
    let mut a = make(&mut h, 1);
    let mut b = make(&mut h, 2);

    for i in 0..10 {
        let t = f64::from(i) * 0.05;
        a.tick(&mut h.store, &h.bus, ctx(t));
        let va = h.store.get("my_float").unwrap();
        b.tick(&mut h.store, &h.bus, ctx(t));
        let vb = h.store.get("my_float").unwrap();
        assert_eq!(va, vb);
    }
}

#[test]
fn set_manual_value_takes_effect_next_tick() {
    let mut h = Harness::new();
    let config = BindingConfigBuilder::new(PropertyPath::parse("my_float").unwrap())
        .mode(DriveMode::Manual)
        .range(0.0, 10.0)
        .build()
        .unwrap();
    let mut binding = h.activate(config);

    binding.tick(&mut h.store, &h.bus, ctx(0.0));
    assert_eq!(h.store.get("my_float").unwrap(), CompoundValue::Float(0.0));

    binding.set_manual_value(1.0);
    binding.tick(&mut h.store, &h.bus, ctx(0.1));
    assert_eq!(h.store.get("my_float").unwrap(), CompoundValue::Float(10.0));
}

#[test]
fn scalar_broadcast_into_vector_member() {
    let mut h = Harness::new();
    let config = BindingConfigBuilder::new(PropertyPath::parse("position").unwrap())
        .mode(DriveMode::Manual)
        .range(0.0, 6.0)
        .manual_value(0.5)
        .build()
        .unwrap();
    let mut binding = h.activate(config);

    binding.tick(&mut h.store, &h.bus, ctx(0.0));
    assert_eq!(
        h.store.get("position").unwrap(),
        CompoundValue::Vec3(Vec3::splat(3.0))
    );
}
