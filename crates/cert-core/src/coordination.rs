//! Coordination effect engine.
//!
//! `γ = observed / (baseline_a * baseline_b)`. The product of the two
//! independent baselines is the performance expected if the agents did not
//! interact; γ > 1 indicates synergy, γ < 1 interference.

use chrono::Utc;
use tracing::debug;

use crate::domain::{
    CertError, CoordinationInput, CoordinationResult, ImpactClassification, Result,
};
use crate::metrics::METRICS;
use crate::obs;

/// Calculate the coordination effect for one pair of agents.
///
/// `interaction_pattern` is stored verbatim; any label is accepted.
pub fn calculate_coordination_effect(
    agent_a_baseline: f64,
    agent_b_baseline: f64,
    coordinated_performance: f64,
    interaction_pattern: &str,
) -> Result<CoordinationResult> {
    match compute(
        agent_a_baseline,
        agent_b_baseline,
        coordinated_performance,
        interaction_pattern,
    ) {
        Ok(result) => {
            obs::emit_coordination_measured(&result);
            METRICS.inc_coordination();
            Ok(result)
        }
        Err(err) => {
            obs::emit_measurement_rejected("coordination", &err);
            METRICS.inc_rejected();
            Err(err)
        }
    }
}

/// Calculate the coordination effect from a request-shaped input.
pub fn measure_coordination(input: &CoordinationInput) -> Result<CoordinationResult> {
    debug!(
        agent_a = input.agent_a_id.as_deref().unwrap_or("-"),
        agent_b = input.agent_b_id.as_deref().unwrap_or("-"),
        "measuring coordination effect"
    );
    calculate_coordination_effect(
        input.agent_a_baseline,
        input.agent_b_baseline,
        input.coordinated_performance,
        &input.interaction_pattern,
    )
}

fn compute(
    agent_a_baseline: f64,
    agent_b_baseline: f64,
    coordinated_performance: f64,
    interaction_pattern: &str,
) -> Result<CoordinationResult> {
    require_finite("agent_a_baseline", agent_a_baseline)?;
    require_finite("agent_b_baseline", agent_b_baseline)?;
    require_finite("coordinated_performance", coordinated_performance)?;

    let expected = agent_a_baseline * agent_b_baseline;
    if expected == 0.0 {
        return Err(CertError::ZeroBaseline);
    }

    let gamma = coordinated_performance / expected;
    if !gamma.is_finite() {
        return Err(CertError::Validation(format!(
            "coordination effect is not finite (observed {coordinated_performance}, expected {expected})"
        )));
    }

    Ok(CoordinationResult {
        agent_a_baseline,
        agent_b_baseline,
        expected_performance: expected,
        observed_performance: coordinated_performance,
        coordination_effect: gamma,
        impact_classification: ImpactClassification::from_gamma(gamma),
        interaction_pattern: interaction_pattern.to_string(),
        performance_change_percent: (gamma - 1.0) * 100.0,
        timestamp: Utc::now(),
    })
}

fn require_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CertError::Validation(format!(
            "{field} must be a finite number"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gamma_is_ratio_to_product() {
        let r = calculate_coordination_effect(0.5, 0.5, 0.5, "sequential").unwrap();
        assert_eq!(r.expected_performance, 0.25);
        assert_eq!(r.coordination_effect, 2.0);
        assert_eq!(r.performance_change_percent, 100.0);
    }

    #[test]
    fn test_zero_product_underflow_is_zero_baseline() {
        let err = calculate_coordination_effect(1e-200, 1e-200, 0.5, "parallel").unwrap_err();
        assert_eq!(err, CertError::ZeroBaseline);
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let err = calculate_coordination_effect(f64::NAN, 0.8, 0.5, "x").unwrap_err();
        assert!(matches!(err, CertError::Validation(_)));
    }

    #[test]
    fn test_overflowing_gamma_rejected() {
        let err = calculate_coordination_effect(1e-160, 1e-160, 1e10, "x").unwrap_err();
        assert!(matches!(err, CertError::Validation(_)));
    }

    #[test]
    fn test_negative_baselines_are_accepted() {
        let r = calculate_coordination_effect(-0.5, -0.5, 0.25, "x").unwrap();
        assert_eq!(r.coordination_effect, 1.0);
        assert_eq!(r.impact_classification, ImpactClassification::Degraded);
    }
}
