use crate::model::scenario::PromptRewrite;

/// Ungraded "rewrite this prompt" exercise.
///
/// The user's draft is free text and never checked. The sample answer stays
/// hidden until [`RewriteExercise::reveal`] is called; revealing cannot be undone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteExercise {
    original_prompt: String,
    sample_improved_prompt: String,
    draft: String,
    revealed: bool,
}

impl RewriteExercise {
    #[must_use]
    pub fn new(rewrite: &PromptRewrite) -> Self {
        Self {
            original_prompt: rewrite.original_prompt.clone(),
            sample_improved_prompt: rewrite.sample_improved_prompt.clone(),
            draft: String::new(),
            revealed: false,
        }
    }

    #[must_use]
    pub fn original_prompt(&self) -> &str {
        &self.original_prompt
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Shows the sample answer. Calling again has no effect.
    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// The sample answer, once revealed.
    #[must_use]
    pub fn sample_improved_prompt(&self) -> Option<&str> {
        self.revealed.then_some(self.sample_improved_prompt.as_str())
    }
}
