use std::sync::Arc;

use services::{ExerciseState, SessionEvent, WorkshopSession, WorkshopView};
use storage::{FileStore, InMemoryStore, ProgressStore};
use workshop_core::model::{ProgressState, ScenarioId, ScenarioResult, TechniqueId};
use workshop_core::{Catalog, SelectionOutcome};

const THREE_SCENARIOS: &str = r#"{
    "techniques": [
        { "id": "persona", "name": "Persona", "description": "", "example": "",
          "mitigatedExample": "", "riskLevel": "Medium", "primaryVulnerability": "" },
        { "id": "template", "name": "Template", "description": "", "example": "",
          "mitigatedExample": "", "riskLevel": "Low", "primaryVulnerability": "" },
        { "id": "react", "name": "ReAct", "description": "", "example": "",
          "mitigatedExample": "", "riskLevel": "Low-Medium", "primaryVulnerability": "" }
    ],
    "scenarios": [
        { "id": "first", "description": "1", "correctTechniqueId": "persona",
          "distractorTechniqueIds": ["template", "react"], "feedback": "yes: persona",
          "incorrectHints": { "template": "no placeholders here" } },
        { "id": "second", "description": "2", "correctTechniqueId": "template",
          "distractorTechniqueIds": ["persona"], "feedback": "yes: template",
          "incorrectHints": {} },
        { "id": "third", "description": "3", "correctTechniqueId": "react",
          "distractorTechniqueIds": ["persona", "template"], "feedback": "yes: react",
          "incorrectHints": {},
          "promptRewrite": { "originalPrompt": "fix the bug", "sampleImprovedPrompt": "read the logs first" } }
    ]
}"#;

fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_json(THREE_SCENARIOS).expect("test catalog"))
}

fn id(raw: &str) -> TechniqueId {
    TechniqueId::new(raw)
}

#[test]
fn full_run_records_results_in_order_and_completes_once() {
    let backend = InMemoryStore::new();
    let mut session = WorkshopSession::open(catalog(), ProgressStore::new(Arc::new(backend.clone())));
    session.set_view(WorkshopView::Practice);

    // scenario 1: wrong, then right
    let wrong = session.select(&id("template")).unwrap();
    assert_eq!(wrong, SelectionOutcome::Incorrect { hint: "no placeholders here".into() });
    assert!(session.advance().is_none());
    let right = session.select(&id("persona")).unwrap();
    assert!(matches!(right, SelectionOutcome::Correct { correct_on_first_attempt: false, .. }));
    assert_eq!(session.advance(), Some(SessionEvent::Progressed { next_index: 1 }));

    // scenario 2: right
    session.select(&id("template")).unwrap();
    assert_eq!(session.advance(), Some(SessionEvent::Progressed { next_index: 2 }));

    // scenario 3: right
    session.select(&id("react")).unwrap();
    assert!(session.scenario_view().unwrap().rewrite.is_some());
    assert_eq!(session.advance(), Some(SessionEvent::Completed));
    assert!(session.advance().is_none());
    assert_eq!(session.exercise().state(), ExerciseState::Finished);

    let expected = ProgressState {
        completed_scenarios: vec![
            ScenarioResult::new(ScenarioId::new("first"), false),
            ScenarioResult::new(ScenarioId::new("second"), true),
            ScenarioResult::new(ScenarioId::new("third"), true),
        ],
        current_scenario_index: 3,
    };
    assert_eq!(session.progress(), &expected);
    assert!(session.is_complete());
    assert!(session.show_results());
    assert!(session.scenario_view().is_none());

    let results = session.results();
    assert_eq!((results.score.correct, results.score.total), (2, 3));
    assert_eq!(results.score.percentage(), 67);
    let missed: Vec<&str> = results.missed.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(missed, ["persona"]);

    // persisted copy matches the in-memory state
    let reopened = ProgressStore::new(Arc::new(backend));
    assert_eq!(reopened.load(), expected);
}

#[test]
fn reopening_resumes_at_saved_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let open = || {
        let backend = FileStore::open(dir.path()).unwrap();
        WorkshopSession::open(catalog(), ProgressStore::new(Arc::new(backend)))
    };

    {
        let mut session = open();
        session.select(&id("persona")).unwrap();
        session.advance().unwrap();
    }

    let session = open();
    assert_eq!(session.progress().current_scenario_index, 1);
    assert_eq!(session.progress_indicator().completed, 1);
    let view = session.scenario_view().unwrap();
    assert_eq!(view.scenario_id, "second");
    assert!(!view.answered);
}

#[test]
fn answered_but_not_advanced_is_not_saved() {
    let backend = InMemoryStore::new();
    {
        let mut session =
            WorkshopSession::open(catalog(), ProgressStore::new(Arc::new(backend.clone())));
        session.select(&id("persona")).unwrap();
    }

    let session = WorkshopSession::open(catalog(), ProgressStore::new(Arc::new(backend)));
    assert!(session.progress().is_empty());
    assert_eq!(session.exercise().state(), ExerciseState::Answering);
}

#[test]
fn restart_clears_saved_and_live_state() {
    let backend = InMemoryStore::new();
    let mut session = WorkshopSession::open(catalog(), ProgressStore::new(Arc::new(backend.clone())));
    for pick in ["persona", "template", "react"] {
        session.select(&id(pick)).unwrap();
        session.advance().unwrap();
    }
    assert!(session.show_results());

    session.restart();
    assert!(!session.show_results());
    assert!(!session.is_complete());
    assert!(session.progress().is_empty());
    assert_eq!(session.exercise().current_index(), 0);
    assert_eq!(ProgressStore::new(Arc::new(backend)).load(), ProgressState::default());

    // a fresh run can complete again
    for pick in ["persona", "template", "react"] {
        session.select(&id(pick)).unwrap();
        session.advance().unwrap();
    }
    assert!(session.results().is_perfect());
}

#[test]
fn finished_progress_opens_on_results() {
    let backend = InMemoryStore::new();
    let store = ProgressStore::new(Arc::new(backend));
    store.save(&ProgressState {
        completed_scenarios: vec![
            ScenarioResult::new(ScenarioId::new("first"), true),
            ScenarioResult::new(ScenarioId::new("second"), true),
            ScenarioResult::new(ScenarioId::new("third"), false),
        ],
        current_scenario_index: 3,
    });

    let mut session = WorkshopSession::open(catalog(), store);
    assert!(session.show_results());
    assert!(!session.is_complete());
    assert_eq!(session.exercise().state(), ExerciseState::Empty);
    assert!(session.select(&id("persona")).is_none());

    let view = session.results_view();
    assert_eq!(view.percentage, 67);
    assert_eq!(view.needs_review.len(), 1);
    assert_eq!(view.needs_review[0].name, "ReAct");
    assert!(!view.perfect);
}

#[test]
fn unavailable_storage_still_runs_the_exercise() {
    let mut session = WorkshopSession::open(catalog(), ProgressStore::unavailable());
    for pick in ["persona", "template", "react"] {
        session.select(&id(pick)).unwrap();
        session.advance().unwrap();
    }
    assert!(session.is_complete());
    assert_eq!(session.results().score.correct, 3);
}

#[test]
fn out_of_range_saved_index_renders_nothing() {
    let store = ProgressStore::new(Arc::new(InMemoryStore::new()));
    store.save(&ProgressState {
        completed_scenarios: Vec::new(),
        current_scenario_index: 9,
    });

    let mut session = WorkshopSession::open(catalog(), store);
    assert!(!session.show_results());
    assert!(session.scenario_view().is_none());
    assert!(session.advance().is_none());
}
