//! Coordination effect value objects and classification thresholds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// γ strictly above this is [`ImpactClassification::HighlyBeneficial`].
pub const HIGHLY_BENEFICIAL_THRESHOLD: f64 = 1.2;
/// γ strictly above this (and at most the threshold above) is beneficial.
pub const BENEFICIAL_THRESHOLD: f64 = 1.0;
/// γ strictly above this (and at most 1.0) is degraded; at or below it is
/// severely degraded.
pub const DEGRADED_THRESHOLD: f64 = 0.8;

/// Interaction-pattern labels used by the bundled integrations.
///
/// The label is an open taxonomy: any string is accepted and stored verbatim.
pub mod patterns {
    pub const SEQUENTIAL: &str = "sequential";
    pub const PARALLEL: &str = "parallel";
    pub const ENSEMBLE: &str = "ensemble";
    pub const GROUP_CHAT: &str = "group_chat";
    pub const HANDOFF: &str = "handoff";

    /// Label for a handoff between two named agents, e.g. `planner_to_coder_handoff`.
    pub fn handoff_between(from: &str, to: &str) -> String {
        format!("{from}_to_{to}_{HANDOFF}")
    }
}

/// Categorical impact of coordination, partitioning the real line by γ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ImpactClassification {
    HighlyBeneficial,
    Beneficial,
    Degraded,
    SeverelyDegraded,
}

impl ImpactClassification {
    /// Classify γ top-down; upper bounds are inclusive, lower bounds exclusive.
    pub fn from_gamma(gamma: f64) -> Self {
        if gamma > HIGHLY_BENEFICIAL_THRESHOLD {
            Self::HighlyBeneficial
        } else if gamma > BENEFICIAL_THRESHOLD {
            Self::Beneficial
        } else if gamma > DEGRADED_THRESHOLD {
            Self::Degraded
        } else {
            Self::SeverelyDegraded
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighlyBeneficial => "highly_beneficial",
            Self::Beneficial => "beneficial",
            Self::Degraded => "degraded",
            Self::SeverelyDegraded => "severely_degraded",
        }
    }
}

impl std::fmt::Display for ImpactClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs to a coordination measurement, as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoordinationInput {
    pub agent_a_baseline: f64,
    pub agent_b_baseline: f64,
    pub coordinated_performance: f64,
    pub interaction_pattern: String,
    /// Optional agent labels; used for log context only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_a_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_b_id: Option<String>,
}

impl CoordinationInput {
    pub fn new(
        agent_a_baseline: f64,
        agent_b_baseline: f64,
        coordinated_performance: f64,
        interaction_pattern: impl Into<String>,
    ) -> Self {
        Self {
            agent_a_baseline,
            agent_b_baseline,
            coordinated_performance,
            interaction_pattern: interaction_pattern.into(),
            agent_a_id: None,
            agent_b_id: None,
        }
    }

    /// Attach agent labels for log context.
    pub fn with_agents(mut self, agent_a: impl Into<String>, agent_b: impl Into<String>) -> Self {
        self.agent_a_id = Some(agent_a.into());
        self.agent_b_id = Some(agent_b.into());
        self
    }
}

/// Outcome of a coordination measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoordinationResult {
    pub agent_a_baseline: f64,
    pub agent_b_baseline: f64,
    /// Product of the two baselines (independence assumption).
    pub expected_performance: f64,
    pub observed_performance: f64,
    /// γ = observed / expected.
    pub coordination_effect: f64,
    pub impact_classification: ImpactClassification,
    pub interaction_pattern: String,
    /// `(γ - 1) * 100`.
    pub performance_change_percent: f64,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_upper_inclusive() {
        assert_eq!(
            ImpactClassification::from_gamma(1.2),
            ImpactClassification::Beneficial
        );
        assert_eq!(
            ImpactClassification::from_gamma(1.0),
            ImpactClassification::Degraded
        );
        assert_eq!(
            ImpactClassification::from_gamma(0.8),
            ImpactClassification::SeverelyDegraded
        );
    }

    #[test]
    fn test_extremes() {
        assert_eq!(
            ImpactClassification::from_gamma(f64::MAX),
            ImpactClassification::HighlyBeneficial
        );
        assert_eq!(
            ImpactClassification::from_gamma(-3.0),
            ImpactClassification::SeverelyDegraded
        );
    }

    #[test]
    fn test_classification_serializes_snake_case() {
        let json = serde_json::to_string(&ImpactClassification::SeverelyDegraded).unwrap();
        assert_eq!(json, "\"severely_degraded\"");
        assert_eq!(
            ImpactClassification::HighlyBeneficial.to_string(),
            "highly_beneficial"
        );
    }

    #[test]
    fn test_input_agent_ids_optional() {
        let input: CoordinationInput = serde_json::from_value(serde_json::json!({
            "agent_a_baseline": 0.8,
            "agent_b_baseline": 0.9,
            "coordinated_performance": 0.75,
            "interaction_pattern": "sequential"
        }))
        .unwrap();
        assert!(input.agent_a_id.is_none());
        assert_eq!(input.interaction_pattern, patterns::SEQUENTIAL);
    }

    #[test]
    fn test_handoff_label() {
        assert_eq!(
            patterns::handoff_between("forecaster", "optimizer"),
            "forecaster_to_optimizer_handoff"
        );
    }
}
