//! In-process agent instrumentation.
//!
//! [`AgentObserver`] collects each agent's recent responses and measures
//! consistency once a full window is available, and measures coordination
//! on handoffs between agents using per-agent baselines. Measurements go
//! through a [`Measurer`]: either a remote [`CertClient`] or the local
//! engines via [`LocalMeasurer`].
//!
//! Windows and baselines live only as long as the observer.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use cert_core::{
    measure_coordination, patterns, ConsistencyEngine, ConsistencyResult, CoordinationInput,
    CoordinationResult,
};
use tracing::{info, warn};

use crate::client::CertClient;
use crate::error::Result;

/// Something that can perform CERT measurements.
#[async_trait]
pub trait Measurer: Send + Sync {
    async fn consistency(
        &self,
        agent_id: &str,
        prompt: &str,
        responses: &[String],
    ) -> Result<ConsistencyResult>;

    async fn coordination(&self, input: &CoordinationInput) -> Result<CoordinationResult>;
}

#[async_trait]
impl Measurer for CertClient {
    async fn consistency(
        &self,
        agent_id: &str,
        prompt: &str,
        responses: &[String],
    ) -> Result<ConsistencyResult> {
        self.measure_consistency(agent_id, prompt, responses).await
    }

    async fn coordination(&self, input: &CoordinationInput) -> Result<CoordinationResult> {
        self.measure_coordination(input).await
    }
}

/// Measures in-process with the `cert-core` engines.
#[derive(Clone)]
pub struct LocalMeasurer {
    engine: ConsistencyEngine,
}

impl LocalMeasurer {
    pub fn new(engine: ConsistencyEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Measurer for LocalMeasurer {
    async fn consistency(
        &self,
        agent_id: &str,
        prompt: &str,
        responses: &[String],
    ) -> Result<ConsistencyResult> {
        Ok(self
            .engine
            .measure_consistency(agent_id, prompt, responses)
            .await?)
    }

    async fn coordination(&self, input: &CoordinationInput) -> Result<CoordinationResult> {
        Ok(measure_coordination(input)?)
    }
}

/// Observer thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverConfig {
    /// Responses per agent kept for consistency measurement.
    pub window: usize,
    /// Consistency scores below this are logged as warnings.
    pub low_consistency: f64,
    /// Baseline assumed for agents without one.
    pub default_baseline: f64,
    /// γ below this is logged as coordination degradation.
    pub degradation_below: f64,
    /// γ above this is logged as coordination benefit.
    pub benefit_above: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            window: 3,
            low_consistency: 0.7,
            default_baseline: 0.8,
            degradation_below: 0.9,
            benefit_above: 1.1,
        }
    }
}

/// Rolling per-agent observer.
pub struct AgentObserver<M> {
    measurer: M,
    config: ObserverConfig,
    windows: HashMap<String, VecDeque<String>>,
    baselines: HashMap<String, f64>,
}

impl<M: Measurer> AgentObserver<M> {
    pub fn new(measurer: M) -> Self {
        Self::with_config(measurer, ObserverConfig::default())
    }

    /// A window smaller than two is raised to two, the minimum a
    /// consistency measurement accepts.
    pub fn with_config(measurer: M, mut config: ObserverConfig) -> Self {
        config.window = config.window.max(cert_core::MIN_RESPONSES);
        Self {
            measurer,
            config,
            windows: HashMap::new(),
            baselines: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    /// Record an agent's independent performance, used for handoffs.
    pub fn set_baseline(&mut self, agent_id: &str, baseline: f64) {
        self.baselines.insert(agent_id.to_string(), baseline);
    }

    pub fn baseline(&self, agent_id: &str) -> f64 {
        self.baselines
            .get(agent_id)
            .copied()
            .unwrap_or(self.config.default_baseline)
    }

    /// The agent's current window, oldest first.
    pub fn recent_responses(&self, agent_id: &str) -> Vec<String> {
        self.windows
            .get(agent_id)
            .map(|w| w.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Forget an agent's collected responses.
    pub fn clear(&mut self, agent_id: &str) {
        self.windows.remove(agent_id);
    }

    /// Add a response to the agent's window.
    ///
    /// Returns a measurement over the most recent responses once the window
    /// is full, `None` before that.
    pub async fn record_response(
        &mut self,
        agent_id: &str,
        prompt: &str,
        response: &str,
    ) -> Result<Option<ConsistencyResult>> {
        let window = self.config.window;
        let responses = self.windows.entry(agent_id.to_string()).or_default();
        responses.push_back(response.to_string());
        while responses.len() > window {
            responses.pop_front();
        }
        if responses.len() < window {
            return Ok(None);
        }

        let batch: Vec<String> = responses.iter().cloned().collect();
        let result = self.measurer.consistency(agent_id, prompt, &batch).await?;

        if result.consistency_score < self.config.low_consistency {
            warn!(
                agent_id,
                consistency_score = result.consistency_score,
                threshold = self.config.low_consistency,
                "low behavioral consistency"
            );
        } else {
            info!(
                agent_id,
                consistency_score = result.consistency_score,
                "agent consistency"
            );
        }
        Ok(Some(result))
    }

    /// Measure the coordination effect of a handoff from `from` to `to`.
    pub async fn record_handoff(
        &self,
        from: &str,
        to: &str,
        coordinated_performance: f64,
    ) -> Result<CoordinationResult> {
        let input = CoordinationInput::new(
            self.baseline(from),
            self.baseline(to),
            coordinated_performance,
            patterns::handoff_between(from, to),
        )
        .with_agents(from, to);

        let result = self.measurer.coordination(&input).await?;
        let gamma = result.coordination_effect;

        if gamma < self.config.degradation_below {
            warn!(from, to, gamma, "coordination degradation detected");
        } else if gamma > self.config.benefit_above {
            info!(from, to, gamma, "coordination benefit detected");
        }
        Ok(result)
    }
}
