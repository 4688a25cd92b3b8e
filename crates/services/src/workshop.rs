use std::sync::Arc;

use storage::ProgressStore;
use workshop_core::model::{ProgressState, Technique, TechniqueId};
use workshop_core::{Catalog, SelectionOutcome, WorkshopResults, aggregate_results};

use crate::error::WorkshopError;
use crate::exercise::{Advance, ExerciseController};
use crate::view::{ProgressIndicator, ResultsView, ScenarioView};

/// Top-level tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkshopView {
    #[default]
    Reference,
    Practice,
}

/// What an advance did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Result saved; the next scenario is active.
    Progressed { next_index: usize },
    /// Last result saved; the workshop is complete. Emitted once per run.
    Completed,
}

/// Page-level orchestrator: progress persistence, exercise flow, results,
/// and which tab / technique the user is looking at.
///
/// Every recorded result is saved right away, so quitting between scenarios
/// loses nothing.
pub struct WorkshopSession {
    catalog: Arc<Catalog>,
    store: ProgressStore,
    progress: ProgressState,
    exercise: ExerciseController,
    workshop_complete: bool,
    active_view: WorkshopView,
    expanded_technique: Option<TechniqueId>,
}

impl WorkshopSession {
    /// Opens a session, resuming whatever `store` holds.
    #[must_use]
    pub fn open(catalog: Arc<Catalog>, store: ProgressStore) -> Self {
        let progress = store.load();
        tracing::debug!(
            completed = progress.completed_count(),
            index = progress.current_scenario_index,
            "workshop progress loaded"
        );
        let exercise = ExerciseController::new(Arc::clone(&catalog), progress.current_scenario_index);
        Self {
            catalog,
            store,
            progress,
            exercise,
            workshop_complete: false,
            active_view: WorkshopView::default(),
            expanded_technique: None,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    #[must_use]
    pub fn exercise(&self) -> &ExerciseController {
        &self.exercise
    }

    pub fn exercise_mut(&mut self) -> &mut ExerciseController {
        &mut self.exercise
    }

    /// Results replace the exercise once the run is finished or every
    /// scenario already has a result.
    #[must_use]
    pub fn show_results(&self) -> bool {
        self.workshop_complete || self.progress.completed_count() >= self.catalog.scenario_count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.workshop_complete
    }

    /// Picks a technique for the active scenario.
    pub fn select(&mut self, technique_id: &TechniqueId) -> Option<SelectionOutcome> {
        if self.show_results() {
            return None;
        }
        self.exercise.select(technique_id)
    }

    /// Records the answered scenario and moves on.
    ///
    /// Returns `None` if the active scenario is not answered yet.
    pub fn advance(&mut self) -> Option<SessionEvent> {
        match self.exercise.advance()? {
            Advance::Next { result, next_index } => {
                self.progress.record(result, next_index);
                self.store.save(&self.progress);
                Some(SessionEvent::Progressed { next_index })
            }
            Advance::Finished { result } => {
                let past_end = self.catalog.scenario_count();
                self.progress.record(result, past_end);
                self.store.save(&self.progress);
                self.workshop_complete = true;
                tracing::info!(
                    completed = self.progress.completed_count(),
                    "workshop complete"
                );
                Some(SessionEvent::Completed)
            }
        }
    }

    /// Clears saved progress and starts over at the first scenario.
    pub fn restart(&mut self) {
        self.store.reset();
        self.progress = ProgressState::default();
        self.workshop_complete = false;
        self.exercise = ExerciseController::new(Arc::clone(&self.catalog), 0);
        tracing::info!("workshop restarted");
    }

    #[must_use]
    pub fn results(&self) -> WorkshopResults<'_> {
        aggregate_results(&self.progress.completed_scenarios, &self.catalog)
    }

    #[must_use]
    pub fn results_view(&self) -> ResultsView {
        ResultsView::from(&self.results())
    }

    /// Counts come from saved results, not from the active scenario's state.
    #[must_use]
    pub fn progress_indicator(&self) -> ProgressIndicator {
        ProgressIndicator::new(self.progress.completed_count(), self.catalog.scenario_count())
    }

    /// Snapshot of the active scenario; `None` when there is nothing to show.
    #[must_use]
    pub fn scenario_view(&self) -> Option<ScenarioView> {
        if self.show_results() {
            return None;
        }
        let evaluator = self.exercise.evaluator()?;
        Some(ScenarioView::build(
            evaluator,
            &self.catalog,
            self.exercise.is_last_scenario(),
        ))
    }

    #[must_use]
    pub fn active_view(&self) -> WorkshopView {
        self.active_view
    }

    pub fn set_view(&mut self, view: WorkshopView) {
        self.active_view = view;
    }

    #[must_use]
    pub fn expanded_technique(&self) -> Option<&TechniqueId> {
        self.expanded_technique.as_ref()
    }

    /// Jumps to a technique's reference entry: expands it and switches to the
    /// reference tab.
    ///
    /// # Errors
    ///
    /// Returns `WorkshopError::UnknownTechnique` if the id is not in the
    /// catalog; the view is left unchanged.
    pub fn view_technique(&mut self, technique_id: &TechniqueId) -> Result<&Technique, WorkshopError> {
        let technique = self
            .catalog
            .technique(technique_id.as_str())
            .ok_or_else(|| WorkshopError::UnknownTechnique(technique_id.clone()))?;
        self.expanded_technique = Some(technique_id.clone());
        self.active_view = WorkshopView::Reference;
        Ok(technique)
    }
}
