use super::*;
use crate::mapping::curve::{Curve1D, CurveKey};
use crate::signal::bus::SignalKey;
use crate::signal::source::DriveMode;
use crate::signal::track::TrackId;
use crate::value::gradient::Gradient;
use crate::foundation::core::ColorRgba;

#[test]
fn config_round_trips_through_json() {
    let mut config = BindingConfig::new(PropertyPath::with_sub("position", "y"));
    config.range = RangeCurve {
        min: -1.0,
        max: 1.0,
        curve: Curve1D::Points(vec![CurveKey::new(0.0, 0.0), CurveKey::new(1.0, 1.0)]),
    };
    config.source.mode = DriveMode::EventDriven;
    config.source.external.key = Some(SignalKey::new("energy"));
    config.source.event.track = Some(TrackId::new("kick"));
    config.source.event.relax_rate = 2.0;
    config.source.oscillator.random_seed = true;
    config.gradient = Some(Gradient::between(
        ColorRgba::new(0.0, 0.0, 0.0, 1.0),
        ColorRgba::WHITE,
    ));

    let json = serde_json::to_string_pretty(&config).unwrap();
    let back: BindingConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn config_deserializes_with_defaults_from_a_bare_path() {
    let config: BindingConfig =
        serde_json::from_str(r#"{ "path": { "member": "intensity" } }"#).unwrap();
    assert_eq!(config.path.member(), "intensity");
    assert_eq!(config.path.sub_member(), None);
    assert_eq!(config.source.mode, DriveMode::ExternalSignal);
    assert_eq!(config.range.min, 0.0);
    assert_eq!(config.range.max, 1.0);
    assert!(config.gradient.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn validate_covers_nested_configuration() {
    let mut config = BindingConfig::new(PropertyPath::new("intensity"));
    config.source.oscillator.shape = Curve1D::Points(vec![]);
    assert!(config.validate().is_err());

    let mut config = BindingConfig::new(PropertyPath::new("intensity"));
    config.gradient = Some(Gradient { stops: vec![] });
    assert!(config.validate().is_err());
}
