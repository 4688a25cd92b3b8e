use std::sync::Arc;

use workshop_core::model::{ScenarioResult, TechniqueId};
use workshop_core::{Catalog, ScenarioEvaluator, SelectionOutcome};

/// Where the exercise stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseState {
    /// Index points past the scenario list; nothing to show.
    Empty,
    /// Current scenario not solved yet.
    Answering,
    /// Solved, waiting for the user to advance.
    Answered,
    /// Advanced past the last scenario.
    Finished,
}

/// Emitted when the user advances past an answered scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Record `result` and continue at `next_index`.
    Next {
        result: ScenarioResult,
        next_index: usize,
    },
    /// Record `result`; it was the last scenario. Produced once.
    Finished { result: ScenarioResult },
}

impl Advance {
    #[must_use]
    pub fn result(&self) -> &ScenarioResult {
        match self {
            Advance::Next { result, .. } | Advance::Finished { result } => result,
        }
    }
}

/// Steps through the catalog's scenarios one at a time.
///
/// Holds the evaluator for the current scenario and the result it produced
/// until the user advances. Results are handed out through [`Advance`] and
/// never kept or re-emitted.
pub struct ExerciseController {
    catalog: Arc<Catalog>,
    index: usize,
    evaluator: Option<ScenarioEvaluator>,
    pending: Option<ScenarioResult>,
    finished: bool,
}

impl ExerciseController {
    /// Starts at `index`. Out-of-range indices give an [`ExerciseState::Empty`] controller.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, index: usize) -> Self {
        let evaluator = catalog.scenario_at(index).map(ScenarioEvaluator::new);
        Self {
            catalog,
            index,
            evaluator,
            pending: None,
            finished: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> ExerciseState {
        if self.finished {
            ExerciseState::Finished
        } else if self.evaluator.is_none() {
            ExerciseState::Empty
        } else if self.pending.is_some() {
            ExerciseState::Answered
        } else {
            ExerciseState::Answering
        }
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.catalog.scenario_count()
    }

    #[must_use]
    pub fn is_last_scenario(&self) -> bool {
        self.index.saturating_add(1) >= self.total()
    }

    /// Evaluator for the scenario on screen, unless empty or finished.
    #[must_use]
    pub fn evaluator(&self) -> Option<&ScenarioEvaluator> {
        if self.finished {
            return None;
        }
        self.evaluator.as_ref()
    }

    pub fn evaluator_mut(&mut self) -> Option<&mut ScenarioEvaluator> {
        if self.finished {
            return None;
        }
        self.evaluator.as_mut()
    }

    /// Forwards a pick to the current scenario; a correct pick stores its result.
    pub fn select(&mut self, technique_id: &TechniqueId) -> Option<SelectionOutcome> {
        let evaluator = self.evaluator_mut()?;
        let outcome = evaluator.select(technique_id)?;
        let result = evaluator.result();
        if outcome.is_correct() {
            self.pending = result;
        }
        Some(outcome)
    }

    /// Hands out the stored result and moves on.
    ///
    /// Returns `None` when nothing has been answered yet.
    pub fn advance(&mut self) -> Option<Advance> {
        let result = self.pending.take()?;

        if self.is_last_scenario() {
            self.finished = true;
            tracing::info!(scenario = %result.scenario_id, "exercise finished");
            return Some(Advance::Finished { result });
        }

        let next_index = self.index + 1;
        self.index = next_index;
        self.evaluator = self.catalog.scenario_at(next_index).map(ScenarioEvaluator::new);
        Some(Advance::Next { result, next_index })
    }
}
