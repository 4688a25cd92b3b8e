use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ids::{ScenarioId, TechniqueId};

/// Optional bonus exercise attached to a scenario: improve a weak prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRewrite {
    pub original_prompt: String,
    pub sample_improved_prompt: String,
}

/// A quiz item: a described situation and the technique it illustrates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: ScenarioId,
    pub description: String,
    pub correct_technique_id: TechniqueId,
    /// Wrong answers offered alongside the correct one, in authoring order.
    pub distractor_technique_ids: Vec<TechniqueId>,
    /// Shown once the correct technique is picked.
    pub feedback: String,
    /// Per-distractor explanation; entries may be missing.
    #[serde(default)]
    pub incorrect_hints: HashMap<TechniqueId, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_rewrite: Option<PromptRewrite>,
}

impl Scenario {
    /// The correct technique followed by the distractors, unshuffled.
    #[must_use]
    pub fn option_ids(&self) -> Vec<TechniqueId> {
        let mut ids = Vec::with_capacity(self.distractor_technique_ids.len() + 1);
        ids.push(self.correct_technique_id.clone());
        ids.extend(self.distractor_technique_ids.iter().cloned());
        ids
    }

    /// Hint for a wrong pick, if the author wrote one.
    #[must_use]
    pub fn hint_for(&self, technique_id: &TechniqueId) -> Option<&str> {
        self.incorrect_hints.get(technique_id).map(String::as_str)
    }
}
