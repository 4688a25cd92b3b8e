#![forbid(unsafe_code)]

pub mod error;
pub mod exercise;
pub mod view;
pub mod workshop;

pub use error::WorkshopError;
pub use exercise::{Advance, ExerciseController, ExerciseState};
pub use view::{
    AdvanceAffordance, FeedbackView, OptionView, ProgressIndicator, ResultsView, RewriteView,
    ScenarioView, TechniqueChip,
};
pub use workshop::{SessionEvent, WorkshopSession, WorkshopView};
