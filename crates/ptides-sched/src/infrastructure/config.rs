//! Platform Configuration
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::error::SchedulingError;
use crate::domain::simulation::{SimulationLimits, DEFAULT_MAX_STEPS};
use crate::domain::strategy::{DeadlineConflictPolicy, ExecutionStrategy, StrategyKind};
use crate::domain::time::Time;

/// Configuration of one platform processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Execution strategy: `basic_non_preemptive`, `basic_preemptive` or `edf`
    ///
    /// Default: `basic_non_preemptive`
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Handling of simultaneous real-time deadlines
    ///
    /// Default: `fail`
    #[serde(default)]
    pub deadline_conflict: DeadlineConflictPolicy,

    /// Maximum scheduler invocations per simulation run
    ///
    /// Default: 100000
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Physical time (seconds) after which a run stops; unbounded if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon: Option<Time>,
}

fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            deadline_conflict: DeadlineConflictPolicy::default(),
            max_steps: default_max_steps(),
            horizon: None,
        }
    }
}

impl PlatformConfig {
    /// Load from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchedulingError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SchedulingError::InvalidScenario(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// Parse from JSON text
    pub fn from_json(text: &str) -> Result<Self, SchedulingError> {
        serde_json::from_str(text)
            .map_err(|e| SchedulingError::InvalidScenario(format!("platform config: {e}")))
    }

    /// Configured execution strategy
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::new(self.strategy, self.deadline_conflict)
    }

    /// Configured run bounds
    pub fn limits(&self) -> SimulationLimits {
        SimulationLimits {
            max_steps: self.max_steps,
            horizon: self.horizon.unwrap_or(Time::POSITIVE_INFINITY),
        }
    }
}
