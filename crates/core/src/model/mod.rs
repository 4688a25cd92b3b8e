mod ids;
mod mitigation;
mod progress;
mod rewrite;
mod scenario;
mod technique;

pub use ids::{ScenarioId, TechniqueId};
pub use mitigation::MitigationStrategy;
pub use progress::{ProgressState, ScenarioResult};
pub use rewrite::RewriteExercise;
pub use scenario::{PromptRewrite, Scenario};
pub use technique::{BadgeVariant, RiskBadge, RiskEmphasis, RiskLevel, Technique};
