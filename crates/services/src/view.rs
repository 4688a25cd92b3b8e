//! Render-ready snapshots of workshop state.

use serde::Serialize;

use workshop_core::model::Technique;
use workshop_core::results::percentage;
use workshop_core::{Catalog, ScenarioEvaluator, SelectionOutcome, WorkshopResults};

/// "N of M completed" bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressIndicator {
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

impl ProgressIndicator {
    #[must_use]
    pub fn new(completed: usize, total: usize) -> Self {
        Self {
            completed,
            total,
            percentage: percentage(completed, total),
        }
    }
}

/// Button shown once a scenario is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdvanceAffordance {
    NextScenario,
    FinishWorkshop,
}

impl AdvanceAffordance {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AdvanceAffordance::NextScenario => "Next Scenario",
            AdvanceAffordance::FinishWorkshop => "Finish Workshop",
        }
    }
}

/// One technique button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub technique_id: String,
    pub name: String,
    pub selected: bool,
    /// `Some(true)` on a correct pick, `Some(false)` on the current wrong pick.
    pub verdict: Option<bool>,
    /// Correct answer shown after solving, when it wasn't the final pick.
    pub reveal_correct: bool,
}

/// Feedback under the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackView {
    pub correct: bool,
    pub message: String,
}

/// Bonus rewrite panel, once the scenario is answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteView {
    pub original_prompt: String,
    pub draft: String,
    pub sample_improved_prompt: Option<String>,
}

/// Everything needed to draw the active scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioView {
    pub scenario_id: String,
    pub description: String,
    pub options: Vec<OptionView>,
    pub feedback: Option<FeedbackView>,
    pub answered: bool,
    /// Link target for "View <technique>" once solved.
    pub correct_technique: Option<(String, String)>,
    pub rewrite: Option<RewriteView>,
    pub advance: Option<AdvanceAffordance>,
}

impl ScenarioView {
    #[must_use]
    pub fn build(evaluator: &ScenarioEvaluator, catalog: &Catalog, is_last: bool) -> Self {
        let answered = evaluator.is_answered();
        let selected = evaluator.selected();
        let verdict = evaluator.last_outcome().map(SelectionOutcome::is_correct);
        let correct_id = evaluator.correct_technique_id();

        let options = evaluator
            .display_options(catalog)
            .into_iter()
            .map(|technique| {
                let is_selected = selected == Some(&technique.id);
                OptionView {
                    technique_id: technique.id.to_string(),
                    name: technique.name.clone(),
                    selected: is_selected,
                    verdict: if is_selected { verdict } else { None },
                    reveal_correct: answered && !is_selected && technique.id == *correct_id,
                }
            })
            .collect();

        let feedback = evaluator.last_outcome().map(|outcome| FeedbackView {
            correct: outcome.is_correct(),
            message: outcome.message().to_owned(),
        });

        let correct_technique = if answered {
            catalog
                .technique(correct_id.as_str())
                .map(|t| (t.id.to_string(), t.name.clone()))
        } else {
            None
        };

        let rewrite = evaluator.rewrite().map(|rw| RewriteView {
            original_prompt: rw.original_prompt().to_owned(),
            draft: rw.draft().to_owned(),
            sample_improved_prompt: rw.sample_improved_prompt().map(str::to_owned),
        });

        let advance = answered.then_some(if is_last {
            AdvanceAffordance::FinishWorkshop
        } else {
            AdvanceAffordance::NextScenario
        });

        Self {
            scenario_id: evaluator.scenario().id.to_string(),
            description: evaluator.scenario().description.clone(),
            options,
            feedback,
            answered,
            correct_technique,
            rewrite,
            advance,
        }
    }
}

/// A technique listed on the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechniqueChip {
    pub technique_id: String,
    pub name: String,
}

/// Results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
    pub identified: Vec<TechniqueChip>,
    pub needs_review: Vec<TechniqueChip>,
    pub perfect: bool,
}

impl From<&WorkshopResults<'_>> for ResultsView {
    fn from(results: &WorkshopResults<'_>) -> Self {
        let chips = |list: &[&Technique]| {
            list.iter()
                .map(|t| TechniqueChip {
                    technique_id: t.id.to_string(),
                    name: t.name.clone(),
                })
                .collect::<Vec<_>>()
        };
        Self {
            correct: results.score.correct,
            total: results.score.total,
            percentage: results.score.percentage(),
            identified: chips(&results.identified),
            needs_review: chips(&results.missed),
            perfect: results.is_perfect(),
        }
    }
}
