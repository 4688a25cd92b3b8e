//! Static content catalog: techniques, scenarios and mitigation strategies.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use crate::error::ContentError;
use crate::model::{
    MitigationStrategy, RiskBadge, RiskLevel, Scenario, ScenarioId, Technique, TechniqueId,
};

const BUNDLED_CATALOG: &str = include_str!("../data/workshop.json");

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    Catalog::from_json(BUNDLED_CATALOG).expect("bundled workshop catalog should be valid")
});

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCatalog {
    techniques: Vec<Technique>,
    scenarios: Vec<Scenario>,
    #[serde(default)]
    mitigation_strategies: Vec<MitigationStrategy>,
    #[serde(default)]
    cross_provider_consensus: Vec<String>,
}

/// One line of the hallucination risk summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskSummaryRow<'a> {
    pub technique_id: &'a TechniqueId,
    pub name: &'a str,
    pub risk_level: RiskLevel,
    pub badge: RiskBadge,
    pub primary_vulnerability: &'a str,
}

/// Immutable catalog of workshop content.
///
/// Order of techniques and scenarios is authoring order and is preserved by
/// every accessor.
#[derive(Debug, Clone)]
pub struct Catalog {
    techniques: Vec<Technique>,
    scenarios: Vec<Scenario>,
    mitigation_strategies: Vec<MitigationStrategy>,
    cross_provider_consensus: Vec<String>,
    technique_index: HashMap<TechniqueId, usize>,
    scenario_index: HashMap<ScenarioId, usize>,
}

impl Catalog {
    /// Builds a catalog without validating references.
    ///
    /// On duplicate ids, lookups resolve to the first occurrence.
    #[must_use]
    pub fn new(
        techniques: Vec<Technique>,
        scenarios: Vec<Scenario>,
        mitigation_strategies: Vec<MitigationStrategy>,
        cross_provider_consensus: Vec<String>,
    ) -> Self {
        let mut technique_index = HashMap::with_capacity(techniques.len());
        for (i, technique) in techniques.iter().enumerate() {
            technique_index.entry(technique.id.clone()).or_insert(i);
        }
        let mut scenario_index = HashMap::with_capacity(scenarios.len());
        for (i, scenario) in scenarios.iter().enumerate() {
            scenario_index.entry(scenario.id.clone()).or_insert(i);
        }

        Self {
            techniques,
            scenarios,
            mitigation_strategies,
            cross_provider_consensus,
            technique_index,
            scenario_index,
        }
    }

    /// Parses and validates a catalog from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Parse` for malformed JSON and the other
    /// `ContentError` variants when [`Catalog::validate`] fails.
    pub fn from_json(text: &str) -> Result<Self, ContentError> {
        let raw: RawCatalog = serde_json::from_str(text)?;
        let catalog = Self::new(
            raw.techniques,
            raw.scenarios,
            raw.mitigation_strategies,
            raw.cross_provider_consensus,
        );
        catalog.validate()?;
        tracing::debug!(
            techniques = catalog.techniques.len(),
            scenarios = catalog.scenarios.len(),
            "loaded workshop catalog"
        );
        Ok(catalog)
    }

    /// The catalog bundled with the crate, parsed on first use.
    ///
    /// # Panics
    ///
    /// Panics if the bundled JSON is invalid, which the crate's tests rule out.
    #[must_use]
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Checks id uniqueness and that every scenario references known,
    /// distinct techniques.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in authoring order.
    pub fn validate(&self) -> Result<(), ContentError> {
        let mut seen = HashSet::new();
        for technique in &self.techniques {
            if !seen.insert(&technique.id) {
                return Err(ContentError::DuplicateTechnique(technique.id.clone()));
            }
        }

        let mut seen_scenarios = HashSet::new();
        for scenario in &self.scenarios {
            if !seen_scenarios.insert(&scenario.id) {
                return Err(ContentError::DuplicateScenario(scenario.id.clone()));
            }

            let mut distractors = HashSet::new();
            for distractor in &scenario.distractor_technique_ids {
                if *distractor == scenario.correct_technique_id {
                    return Err(ContentError::CorrectAsDistractor {
                        scenario: scenario.id.clone(),
                        technique: distractor.clone(),
                    });
                }
                if !distractors.insert(distractor) {
                    return Err(ContentError::DuplicateDistractor {
                        scenario: scenario.id.clone(),
                        technique: distractor.clone(),
                    });
                }
            }

            for referenced in scenario.option_ids() {
                if !self.technique_index.contains_key(&referenced) {
                    return Err(ContentError::UnknownTechnique {
                        scenario: scenario.id.clone(),
                        technique: referenced,
                    });
                }
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn techniques(&self) -> &[Technique] {
        &self.techniques
    }

    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    #[must_use]
    pub fn mitigation_strategies(&self) -> &[MitigationStrategy] {
        &self.mitigation_strategies
    }

    #[must_use]
    pub fn cross_provider_consensus(&self) -> &[String] {
        &self.cross_provider_consensus
    }

    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }

    #[must_use]
    pub fn technique(&self, id: &str) -> Option<&Technique> {
        self.technique_index.get(id).map(|&i| &self.techniques[i])
    }

    #[must_use]
    pub fn scenario(&self, id: &str) -> Option<&Scenario> {
        self.scenario_index.get(id).map(|&i| &self.scenarios[i])
    }

    #[must_use]
    pub fn scenario_at(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    /// Rows for the risk summary table, one per technique.
    pub fn risk_summary(&self) -> impl Iterator<Item = RiskSummaryRow<'_>> {
        self.techniques.iter().map(|t| RiskSummaryRow {
            technique_id: &t.id,
            name: &t.name,
            risk_level: t.risk_level,
            badge: t.risk_level.badge(),
            primary_vulnerability: &t.primary_vulnerability,
        })
    }
}
