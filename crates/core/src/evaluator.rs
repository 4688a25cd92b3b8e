//! Per-scenario answer evaluation.

use crate::catalog::Catalog;
use crate::model::{RewriteExercise, Scenario, ScenarioResult, Technique, TechniqueId};
use crate::shuffle::shuffle_with_seed;

/// Shown for a wrong pick when the scenario has no hint for it.
pub const FALLBACK_HINT: &str = "That's not the best fit. Try another technique.";

/// Feedback for a single selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The scenario is now answered. Produced once per evaluator.
    Correct {
        feedback: String,
        correct_on_first_attempt: bool,
    },
    /// Wrong pick; the user may try again.
    Incorrect { hint: String },
}

impl SelectionOutcome {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, SelectionOutcome::Correct { .. })
    }

    /// Text to show under the options.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            SelectionOutcome::Correct { feedback, .. } => feedback,
            SelectionOutcome::Incorrect { hint } => hint,
        }
    }
}

/// State of one scenario instance while the user picks techniques.
///
/// Starts unanswered with the first-attempt flag set. Any wrong pick clears
/// the flag for good; the first correct pick answers the scenario, after
/// which further selections are ignored.
#[derive(Debug, Clone)]
pub struct ScenarioEvaluator {
    scenario: Scenario,
    option_ids: Vec<TechniqueId>,
    selected: Option<TechniqueId>,
    last_outcome: Option<SelectionOutcome>,
    first_attempt: bool,
    answered: bool,
    rewrite: Option<RewriteExercise>,
}

impl ScenarioEvaluator {
    #[must_use]
    pub fn new(scenario: &Scenario) -> Self {
        let option_ids = shuffle_with_seed(&scenario.option_ids(), scenario.id.as_str());
        Self {
            scenario: scenario.clone(),
            option_ids,
            selected: None,
            last_outcome: None,
            first_attempt: true,
            answered: false,
            rewrite: scenario.prompt_rewrite.as_ref().map(RewriteExercise::new),
        }
    }

    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Option ids in display order.
    #[must_use]
    pub fn option_ids(&self) -> &[TechniqueId] {
        &self.option_ids
    }

    /// Options resolved against `catalog`; ids missing from it are skipped.
    #[must_use]
    pub fn display_options<'c>(&self, catalog: &'c Catalog) -> Vec<&'c Technique> {
        self.option_ids
            .iter()
            .filter_map(|id| catalog.technique(id.as_str()))
            .collect()
    }

    /// Records a pick.
    ///
    /// Returns `None` once the scenario is answered.
    pub fn select(&mut self, technique_id: &TechniqueId) -> Option<SelectionOutcome> {
        if self.answered {
            return None;
        }

        self.selected = Some(technique_id.clone());
        let outcome = if *technique_id == self.scenario.correct_technique_id {
            self.answered = true;
            SelectionOutcome::Correct {
                feedback: self.scenario.feedback.clone(),
                correct_on_first_attempt: self.first_attempt,
            }
        } else {
            self.first_attempt = false;
            let hint = self
                .scenario
                .hint_for(technique_id)
                .unwrap_or(FALLBACK_HINT)
                .to_owned();
            SelectionOutcome::Incorrect { hint }
        };

        self.last_outcome = Some(outcome.clone());
        Some(outcome)
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.answered
    }

    /// True until the first wrong pick.
    #[must_use]
    pub fn is_first_attempt(&self) -> bool {
        self.first_attempt
    }

    #[must_use]
    pub fn selected(&self) -> Option<&TechniqueId> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn last_outcome(&self) -> Option<&SelectionOutcome> {
        self.last_outcome.as_ref()
    }

    #[must_use]
    pub fn correct_technique_id(&self) -> &TechniqueId {
        &self.scenario.correct_technique_id
    }

    /// The result to persist, once answered.
    #[must_use]
    pub fn result(&self) -> Option<ScenarioResult> {
        self.answered
            .then(|| ScenarioResult::new(self.scenario.id.clone(), self.first_attempt))
    }

    /// The bonus rewrite exercise, available only after answering.
    #[must_use]
    pub fn rewrite(&self) -> Option<&RewriteExercise> {
        self.rewrite.as_ref().filter(|_| self.answered)
    }

    pub fn rewrite_mut(&mut self) -> Option<&mut RewriteExercise> {
        if self.answered {
            self.rewrite.as_mut()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PromptRewrite;
    use std::collections::HashMap;

    fn scenario() -> Scenario {
        let mut hints = HashMap::new();
        hints.insert(TechniqueId::new("one-shot"), "One-Shot needs an example.".to_owned());
        Scenario {
            id: "scenario-1".into(),
            description: "Summarize this PR.".into(),
            correct_technique_id: "zero-shot".into(),
            distractor_technique_ids: vec![
                "instruction-based".into(),
                "one-shot".into(),
                "structured-output".into(),
            ],
            feedback: "Zero-Shot: no examples.".into(),
            incorrect_hints: hints,
            prompt_rewrite: Some(PromptRewrite {
                original_prompt: "before".into(),
                sample_improved_prompt: "after".into(),
            }),
        }
    }

    #[test]
    fn correct_first_pick_counts_as_first_attempt() {
        let mut eval = ScenarioEvaluator::new(&scenario());
        let outcome = eval.select(&"zero-shot".into()).unwrap();
        assert_eq!(
            outcome,
            SelectionOutcome::Correct {
                feedback: "Zero-Shot: no examples.".into(),
                correct_on_first_attempt: true,
            }
        );
        assert!(eval.is_answered());
        assert_eq!(
            eval.result(),
            Some(ScenarioResult::new("scenario-1".into(), true))
        );
    }

    #[test]
    fn wrong_then_right_is_not_first_attempt() {
        let mut eval = ScenarioEvaluator::new(&scenario());
        let wrong = eval.select(&"one-shot".into()).unwrap();
        assert_eq!(wrong.message(), "One-Shot needs an example.");
        assert!(!eval.is_first_attempt());
        assert!(eval.result().is_none());

        let right = eval.select(&"zero-shot".into()).unwrap();
        assert!(matches!(
            right,
            SelectionOutcome::Correct { correct_on_first_attempt: false, .. }
        ));
    }

    #[test]
    fn missing_hint_uses_fallback() {
        let mut eval = ScenarioEvaluator::new(&scenario());
        let outcome = eval.select(&"structured-output".into()).unwrap();
        assert_eq!(outcome, SelectionOutcome::Incorrect { hint: FALLBACK_HINT.into() });
    }

    #[test]
    fn answered_scenario_ignores_further_picks() {
        let mut eval = ScenarioEvaluator::new(&scenario());
        eval.select(&"zero-shot".into()).unwrap();

        assert!(eval.select(&"one-shot".into()).is_none());
        assert!(eval.select(&"zero-shot".into()).is_none());
        assert_eq!(eval.selected(), Some(&"zero-shot".into()));
        assert!(eval.is_first_attempt());
        assert!(eval.last_outcome().unwrap().is_correct());
    }

    #[test]
    fn options_contain_each_id_once_in_seeded_order() {
        let eval = ScenarioEvaluator::new(&scenario());
        let mut sorted: Vec<_> = eval.option_ids().to_vec();
        sorted.sort();
        let mut expected = scenario().option_ids();
        expected.sort();
        assert_eq!(sorted, expected);

        let again = ScenarioEvaluator::new(&scenario());
        assert_eq!(eval.option_ids(), again.option_ids());
    }

    #[test]
    fn builtin_scenario_order_is_stable() {
        let catalog = Catalog::builtin();
        let eval = ScenarioEvaluator::new(catalog.scenario("scenario-2").unwrap());
        let names: Vec<&str> = eval.option_ids().iter().map(TechniqueId::as_str).collect();
        assert_eq!(names, ["one-shot", "template", "structured-output", "few-shot"]);
    }

    #[test]
    fn display_skips_techniques_missing_from_catalog() {
        let catalog = Catalog::builtin();
        let mut broken = scenario();
        broken.distractor_technique_ids.push("ghost".into());
        let eval = ScenarioEvaluator::new(&broken);

        assert_eq!(eval.option_ids().len(), 5);
        let shown = eval.display_options(catalog);
        assert_eq!(shown.len(), 4);
        assert!(shown.iter().all(|t| t.id.as_str() != "ghost"));
    }

    #[test]
    fn rewrite_unlocks_after_answer() {
        let mut eval = ScenarioEvaluator::new(&scenario());
        assert!(eval.rewrite().is_none());
        assert!(eval.rewrite_mut().is_none());

        eval.select(&"zero-shot".into());
        let rewrite = eval.rewrite_mut().unwrap();
        rewrite.set_draft("mine");
        rewrite.reveal();
        assert_eq!(eval.rewrite().unwrap().sample_improved_prompt(), Some("after"));
    }
}
