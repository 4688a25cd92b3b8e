use serde::{Deserialize, Serialize};

/// A general strategy for reducing hallucinations, with an example prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MitigationStrategy {
    pub title: String,
    pub description: String,
    pub example: String,
}
