//! Score and per-technique breakdown of a finished workshop.

use crate::catalog::Catalog;
use crate::model::{ScenarioResult, Technique, TechniqueId};

/// First-attempt score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    #[must_use]
    pub fn from_results(results: &[ScenarioResult]) -> Self {
        Self {
            correct: results.iter().filter(|r| r.correct_on_first_attempt).count(),
            total: results.len(),
        }
    }

    /// Whole-number percentage, half rounded up; 0 when nothing was answered.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        percentage(self.correct, self.total)
    }
}

/// `round(part / whole * 100)`, or 0 when `whole` is 0.
#[must_use]
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = ((part as f64 / whole as f64) * 100.0).round() as u32;
    pct
}

/// Aggregated outcome of a workshop run.
///
/// A technique lands in `missed` if any of its scenarios was missed on the
/// first attempt, and in `identified` only if none were. Each technique
/// appears at most once, in order of first appearance in the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkshopResults<'c> {
    pub score: Score,
    pub identified: Vec<&'c Technique>,
    pub missed: Vec<&'c Technique>,
}

impl WorkshopResults<'_> {
    /// Every technique identified on the first try, with at least one result.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.missed.is_empty() && self.score.total > 0
    }
}

/// Computes score and identified/missed partition.
///
/// Results for unknown scenarios still count toward the score but are left out
/// of the partition, as are techniques missing from the catalog.
#[must_use]
pub fn aggregate_results<'c>(results: &[ScenarioResult], catalog: &'c Catalog) -> WorkshopResults<'c> {
    let mut identified_ids: Vec<&TechniqueId> = Vec::new();
    let mut missed_ids: Vec<&TechniqueId> = Vec::new();

    for result in results {
        let Some(scenario) = catalog.scenario(result.scenario_id.as_str()) else {
            continue;
        };
        let bucket = if result.correct_on_first_attempt {
            &mut identified_ids
        } else {
            &mut missed_ids
        };
        if !bucket.contains(&&scenario.correct_technique_id) {
            bucket.push(&scenario.correct_technique_id);
        }
    }

    // missed wins over identified
    identified_ids.retain(|id| !missed_ids.contains(id));

    let resolve = |ids: Vec<&TechniqueId>| -> Vec<&'c Technique> {
        ids.into_iter()
            .filter_map(|id| catalog.technique(id.as_str()))
            .collect()
    };

    WorkshopResults {
        score: Score::from_results(results),
        identified: resolve(identified_ids),
        missed: resolve(missed_ids),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiskLevel, Scenario, ScenarioId};

    fn result(id: &str, first: bool) -> ScenarioResult {
        ScenarioResult::new(ScenarioId::new(id), first)
    }

    fn ids<'a>(techniques: &[&'a Technique]) -> Vec<&'a str> {
        techniques.iter().map(|t| t.id.as_str()).collect()
    }

    fn technique(id: &str) -> Technique {
        Technique {
            id: id.into(),
            name: id.to_uppercase(),
            description: String::new(),
            example: String::new(),
            mitigated_example: String::new(),
            risk_level: RiskLevel::Medium,
            primary_vulnerability: String::new(),
        }
    }

    fn scenario(id: &str, correct: &str) -> Scenario {
        Scenario {
            id: id.into(),
            description: String::new(),
            correct_technique_id: correct.into(),
            distractor_technique_ids: Vec::new(),
            feedback: String::new(),
            incorrect_hints: Default::default(),
            prompt_rewrite: None,
        }
    }

    /// Two scenarios share technique `x`; one scenario maps to `y`.
    fn shared_catalog() -> Catalog {
        Catalog::new(
            vec![technique("x"), technique("y")],
            vec![scenario("s1", "x"), scenario("s2", "x"), scenario("s3", "y")],
            vec![],
            vec![],
        )
    }

    #[test]
    fn score_rounds_to_whole_percent() {
        let score = Score::from_results(&[result("a", true), result("b", false), result("c", true)]);
        assert_eq!(score, Score { correct: 2, total: 3 });
        assert_eq!(score.percentage(), 67);
    }

    #[test]
    fn empty_results_score_zero() {
        let score = Score::from_results(&[]);
        assert_eq!(score, Score { correct: 0, total: 0 });
        assert_eq!(score.percentage(), 0);
    }

    #[test]
    fn half_percent_rounds_up() {
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 200), 1);
    }

    #[test]
    fn missed_takes_priority_over_identified() {
        let catalog = shared_catalog();
        let out = aggregate_results(&[result("s1", true), result("s2", false), result("s3", true)], &catalog);
        assert_eq!(ids(&out.identified), ["y"]);
        assert_eq!(ids(&out.missed), ["x"]);
        assert!(!out.is_perfect());
    }

    #[test]
    fn each_technique_listed_once() {
        let catalog = shared_catalog();
        let out = aggregate_results(&[result("s1", true), result("s2", true)], &catalog);
        assert_eq!(ids(&out.identified), ["x"]);
        assert!(out.missed.is_empty());
        assert!(out.is_perfect());
    }

    #[test]
    fn no_results_is_not_perfect() {
        let catalog = shared_catalog();
        let out = aggregate_results(&[], &catalog);
        assert!(out.identified.is_empty() && out.missed.is_empty());
        assert!(!out.is_perfect());
    }

    #[test]
    fn unknown_scenarios_count_in_score_only() {
        let catalog = shared_catalog();
        let out = aggregate_results(&[result("gone", false), result("s3", true)], &catalog);
        assert_eq!(out.score, Score { correct: 1, total: 2 });
        assert!(out.missed.is_empty());
        assert_eq!(ids(&out.identified), ["y"]);
    }

    #[test]
    fn builtin_partition_uses_correct_techniques() {
        let catalog = Catalog::builtin();
        let out = aggregate_results(
            &[result("scenario-1", false), result("scenario-2", true)],
            catalog,
        );
        assert_eq!(ids(&out.missed), ["zero-shot"]);
        assert_eq!(ids(&out.identified), ["few-shot"]);
    }
}
