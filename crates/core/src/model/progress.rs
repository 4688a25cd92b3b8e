use serde::{Deserialize, Serialize};

use crate::model::ids::ScenarioId;

/// Outcome of one finished scenario. Written once, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub scenario_id: ScenarioId,
    pub correct_on_first_attempt: bool,
}

impl ScenarioResult {
    #[must_use]
    pub fn new(scenario_id: ScenarioId, correct_on_first_attempt: bool) -> Self {
        Self {
            scenario_id,
            correct_on_first_attempt,
        }
    }
}

/// Durable record of exercise progress.
///
/// `completed_scenarios` is in completion order. `current_scenario_index`
/// points at the scenario that is active next; once every scenario is done it
/// equals the scenario count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    pub completed_scenarios: Vec<ScenarioResult>,
    pub current_scenario_index: usize,
}

impl ProgressState {
    /// Appends a result and moves the pointer to `next_index`.
    pub fn record(&mut self, result: ScenarioResult, next_index: usize) {
        self.completed_scenarios.push(result);
        self.current_scenario_index = next_index;
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed_scenarios.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed_scenarios.is_empty() && self.current_scenario_index == 0
    }
}
