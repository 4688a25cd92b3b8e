use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::TechniqueId;

//
// ─── RISK LEVEL ───────────────────────────────────────────────────────────────
//

/// Hallucination risk of a technique, from least to most exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    #[serde(rename = "Low-Medium")]
    LowMedium,
    Medium,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    High,
}

/// Base badge style a presentation layer should use for a risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeVariant {
    Default,
    Secondary,
    Destructive,
    Outline,
}

/// Extra tint applied on top of the base variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskEmphasis {
    None,
    Orange,
}

/// Display treatment for a risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskBadge {
    pub variant: BadgeVariant,
    pub emphasis: RiskEmphasis,
}

impl RiskLevel {
    /// Label as shown to users and stored in the catalog.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::LowMedium => "Low-Medium",
            RiskLevel::Medium => "Medium",
            RiskLevel::MediumHigh => "Medium-High",
            RiskLevel::High => "High",
        }
    }

    /// Badge treatment for this level.
    #[must_use]
    pub fn badge(self) -> RiskBadge {
        let (variant, emphasis) = match self {
            RiskLevel::High => (BadgeVariant::Destructive, RiskEmphasis::None),
            RiskLevel::MediumHigh => (BadgeVariant::Destructive, RiskEmphasis::Orange),
            RiskLevel::Medium => (BadgeVariant::Secondary, RiskEmphasis::None),
            RiskLevel::LowMedium => (BadgeVariant::Outline, RiskEmphasis::None),
            RiskLevel::Low => (BadgeVariant::Default, RiskEmphasis::None),
        };
        RiskBadge { variant, emphasis }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── TECHNIQUE ────────────────────────────────────────────────────────────────
//

/// A named prompt-engineering strategy with a risk profile and example prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technique {
    pub id: TechniqueId,
    pub name: String,
    pub description: String,
    pub example: String,
    /// The example rewritten with hallucination mitigations applied.
    pub mitigated_example: String,
    pub risk_level: RiskLevel,
    pub primary_vulnerability: String,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphenated_levels_use_catalog_labels() {
        let level: RiskLevel = serde_json::from_str("\"Medium-High\"").unwrap();
        assert_eq!(level, RiskLevel::MediumHigh);
        assert_eq!(serde_json::to_string(&RiskLevel::LowMedium).unwrap(), "\"Low-Medium\"");
        assert_eq!(RiskLevel::LowMedium.to_string(), "Low-Medium");
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(serde_json::from_str::<RiskLevel>("\"Extreme\"").is_err());
    }

    #[test]
    fn badge_lookup_matches_reference_styling() {
        assert_eq!(
            RiskLevel::High.badge(),
            RiskBadge { variant: BadgeVariant::Destructive, emphasis: RiskEmphasis::None }
        );
        assert_eq!(RiskLevel::MediumHigh.badge().emphasis, RiskEmphasis::Orange);
        assert_eq!(RiskLevel::Medium.badge().variant, BadgeVariant::Secondary);
        assert_eq!(RiskLevel::LowMedium.badge().variant, BadgeVariant::Outline);
        assert_eq!(RiskLevel::Low.badge().variant, BadgeVariant::Default);
    }

    #[test]
    fn levels_order_by_exposure() {
        assert!(RiskLevel::Low < RiskLevel::LowMedium);
        assert!(RiskLevel::MediumHigh < RiskLevel::High);
    }
}
