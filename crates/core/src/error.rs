use thiserror::Error;

use crate::model::{ScenarioId, TechniqueId};

/// Errors raised while loading or validating a content catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate technique id: {0}")]
    DuplicateTechnique(TechniqueId),

    #[error("duplicate scenario id: {0}")]
    DuplicateScenario(ScenarioId),

    #[error("scenario {scenario} lists its correct technique {technique} as a distractor")]
    CorrectAsDistractor {
        scenario: ScenarioId,
        technique: TechniqueId,
    },

    #[error("scenario {scenario} lists distractor {technique} more than once")]
    DuplicateDistractor {
        scenario: ScenarioId,
        technique: TechniqueId,
    },

    #[error("scenario {scenario} references unknown technique {technique}")]
    UnknownTechnique {
        scenario: ScenarioId,
        technique: TechniqueId,
    },
}
