use kernelfem::settings::{AssemblySettings, ExecutionPolicy, ReductionOp};

#[test]
fn settings_json_roundtrip() {
    let settings = AssemblySettings::default()
        .with_policy(ExecutionPolicy::Colored)
        .with_reduction(ReductionOp::Sum);
    let json = serde_json::to_string(&settings).unwrap();
    let deserialized: AssemblySettings = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, settings);
}

#[test]
fn missing_settings_fields_take_defaults() {
    let settings: AssemblySettings = serde_json::from_str(r#"{ "policy": "Serial" }"#).unwrap();
    assert_eq!(settings.policy, ExecutionPolicy::Serial);
    assert_eq!(settings.reduction, ReductionOp::Max);
    assert_eq!(settings.min_elements_per_task, 64);
    assert!(settings.check_finite);
}

#[test]
fn max_reduction_propagates_nan() {
    let max = ReductionOp::Max;
    assert_eq!(max.combine(1.0, 3.0), 3.0);
    assert!(max.combine(f64::NAN, 3.0).is_nan());
    assert!(max.combine(3.0, f64::NAN).is_nan());
    assert_eq!(max.identity::<f64>(), 0.0);
    assert_eq!(ReductionOp::Sum.combine(1.0, 3.0), 4.0);
}

#[test]
fn max_reduction_prefers_nan_over_infinity_in_any_order() {
    let max = ReductionOp::Max;
    assert!(max.combine(f64::INFINITY, f64::NAN).is_nan());
    assert!(max.combine(f64::NAN, f64::INFINITY).is_nan());
    assert!(max.combine(f64::NEG_INFINITY, f64::NAN).is_nan());
    assert_eq!(max.combine(f64::INFINITY, 2.0), f64::INFINITY);
    assert_eq!(max.combine(2.0, f64::INFINITY), f64::INFINITY);
}
