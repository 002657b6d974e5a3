use cert_core::{
    calculate_coordination_effect, measure_coordination, patterns, CertError, CoordinationInput,
    ImpactClassification,
};

fn classify(a: f64, b: f64, observed: f64) -> ImpactClassification {
    calculate_coordination_effect(a, b, observed, patterns::SEQUENTIAL)
        .unwrap()
        .impact_classification
}

// ---- worked examples ----

#[test]
fn synergy_example_is_highly_beneficial() {
    let r = calculate_coordination_effect(0.85, 0.80, 0.88, patterns::SEQUENTIAL).unwrap();

    assert!((r.expected_performance - 0.68).abs() < 1e-9);
    assert!((r.coordination_effect - 1.294).abs() < 1e-3);
    assert_eq!(
        r.impact_classification,
        ImpactClassification::HighlyBeneficial
    );
    assert!((r.performance_change_percent - 29.4).abs() < 0.05);
    assert_eq!(r.observed_performance, 0.88);
}

#[test]
fn interference_example_is_severely_degraded() {
    let r = calculate_coordination_effect(0.87, 0.89, 0.61, patterns::PARALLEL).unwrap();

    assert!((r.expected_performance - 0.7743).abs() < 1e-9);
    assert!((r.coordination_effect - 0.788).abs() < 1e-3);
    assert_eq!(
        r.impact_classification,
        ImpactClassification::SeverelyDegraded
    );
    assert!(r.performance_change_percent < 0.0);
}

// ---- classification boundaries ----

#[test]
fn gamma_exactly_one_point_two_is_beneficial() {
    assert_eq!(classify(1.0, 1.0, 1.2), ImpactClassification::Beneficial);
}

#[test]
fn gamma_just_above_one_point_two_is_highly_beneficial() {
    assert_eq!(
        classify(1.0, 1.0, 1.2000001),
        ImpactClassification::HighlyBeneficial
    );
}

#[test]
fn gamma_exactly_one_is_degraded() {
    assert_eq!(classify(1.0, 1.0, 1.0), ImpactClassification::Degraded);
    assert_eq!(
        classify(1.0, 1.0, 1.0000001),
        ImpactClassification::Beneficial
    );
}

#[test]
fn gamma_exactly_point_eight_is_severely_degraded() {
    assert_eq!(
        classify(1.0, 1.0, 0.8),
        ImpactClassification::SeverelyDegraded
    );
    assert_eq!(classify(1.0, 1.0, 0.8000001), ImpactClassification::Degraded);
}

#[test]
fn negative_gamma_is_severely_degraded() {
    assert_eq!(
        classify(0.5, 0.5, -0.1),
        ImpactClassification::SeverelyDegraded
    );
}

// ---- zero baselines ----

#[test]
fn zero_baseline_a_is_rejected() {
    let err = calculate_coordination_effect(0.0, 0.9, 0.5, patterns::SEQUENTIAL).unwrap_err();
    assert_eq!(err, CertError::ZeroBaseline);
    assert_eq!(
        err.to_string(),
        "cannot calculate coordination effect with zero baseline"
    );
}

#[test]
fn zero_baseline_b_is_rejected() {
    let err = calculate_coordination_effect(0.9, -0.0, 0.5, patterns::SEQUENTIAL).unwrap_err();
    assert_eq!(err, CertError::ZeroBaseline);
}

// ---- interaction pattern ----

#[test]
fn interaction_pattern_is_stored_verbatim() {
    for label in [
        "",
        "group_chat",
        "Forecaster_to_Optimizer_handoff",
        "débat à trois ✨",
    ] {
        let r = calculate_coordination_effect(0.8, 0.9, 0.75, label).unwrap();
        assert_eq!(r.interaction_pattern, label);
    }
}

#[test]
fn measure_from_input_matches_direct_call() {
    let input = CoordinationInput::new(0.8, 0.9, 0.75, patterns::ENSEMBLE).with_agents("a", "b");
    let via_input = measure_coordination(&input).unwrap();
    let direct = calculate_coordination_effect(0.8, 0.9, 0.75, patterns::ENSEMBLE).unwrap();

    assert_eq!(via_input.coordination_effect, direct.coordination_effect);
    assert_eq!(via_input.impact_classification, direct.impact_classification);
    assert_eq!(via_input.interaction_pattern, "ensemble");
}

// ---- wire shape ----

#[test]
fn result_serializes_with_wire_field_names() {
    let r = calculate_coordination_effect(0.8, 0.9, 0.75, patterns::SEQUENTIAL).unwrap();
    let json = serde_json::to_value(&r).unwrap();

    for field in [
        "agent_a_baseline",
        "agent_b_baseline",
        "expected_performance",
        "observed_performance",
        "coordination_effect",
        "impact_classification",
        "interaction_pattern",
        "performance_change_percent",
        "timestamp",
    ] {
        assert!(json.get(field).is_some(), "missing {field}");
    }
    // 0.75 / 0.72 ≈ 1.042
    assert_eq!(json["impact_classification"], "beneficial");
}
