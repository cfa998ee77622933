pub mod blast_radius;
pub mod classification;
pub mod recommendations;

use serde::{Deserialize, Serialize};

use crate::config::RiskPolicy;
use crate::core::{clamp01, ChangeType, Component, Criticality};

/// Effective scores cap here; the delete multiplier can push an intrinsic
/// score past 1.0.
pub const MAX_EFFECTIVE_SCORE: f64 = 1.5;

/// Risk attributed to a single component within one assessment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRisk {
    #[serde(rename = "id")]
    pub component_id: String,
    pub change_type: ChangeType,
    pub intrinsic_score: f64,
    pub multiplier: f64,
    pub effective_score: f64,
    pub criticality: Criticality,
}

/// Computes intrinsic component risk and applies change-type multipliers.
pub struct ComponentRiskScorer {
    policy: RiskPolicy,
}

impl ComponentRiskScorer {
    pub fn new(policy: RiskPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    /// Weighted combination of the normalized risk factors.
    pub fn intrinsic_score(&self, component: &Component) -> f64 {
        let weights = &self.policy.weights;
        let normalization = &self.policy.normalization;
        let criticality = self
            .policy
            .criticality_for(&component.id, component.criticality);

        let dependency_factor =
            normalization.normalized_dependency_count(component.dependency_count);
        let criticality_factor = normalization.criticality_weights.weight_for(criticality);

        let score = weights.change_frequency * clamp01(component.change_frequency)
            + weights.dependencies * dependency_factor
            + weights.complexity * clamp01(component.complexity)
            + weights.criticality * criticality_factor
            + weights.recent_changes * clamp01(component.recent_changes);

        log::debug!(
            "intrinsic score for {}: {:.4} (dependencies {:.2}, criticality {:.2})",
            component.id,
            score,
            dependency_factor,
            criticality_factor
        );

        score
    }

    /// Score a component carrying a direct change record.
    pub fn score(&self, component: &Component, change_type: ChangeType) -> ComponentRisk {
        let criticality = self
            .policy
            .criticality_for(&component.id, component.criticality);
        self.build(
            component.id.clone(),
            self.intrinsic_score(component),
            change_type,
            change_type.multiplier(),
            criticality,
        )
    }

    /// Score an affected component with no direct change record. Impact
    /// reaches it only through the dependency graph, so the configured
    /// indirect multiplier applies instead of the change-type table.
    pub fn score_indirect(&self, component: &Component) -> ComponentRisk {
        let criticality = self
            .policy
            .criticality_for(&component.id, component.criticality);
        self.build(
            component.id.clone(),
            self.intrinsic_score(component),
            ChangeType::NoChange,
            self.policy.indirect_multiplier,
            criticality,
        )
    }

    /// Score a changed component the graph knows nothing about. Default
    /// attributes stand in for the missing record.
    pub fn score_unknown(&self, component_id: &str, change_type: ChangeType) -> ComponentRisk {
        let placeholder = Component::new(component_id);
        self.score(&placeholder, change_type)
    }

    fn build(
        &self,
        component_id: String,
        intrinsic_score: f64,
        change_type: ChangeType,
        multiplier: f64,
        criticality: Criticality,
    ) -> ComponentRisk {
        let effective_score = (intrinsic_score * multiplier).clamp(0.0, MAX_EFFECTIVE_SCORE);
        ComponentRisk {
            component_id,
            change_type,
            intrinsic_score,
            multiplier,
            effective_score,
            criticality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> ComponentRiskScorer {
        ComponentRiskScorer::new(RiskPolicy::default())
    }

    fn component(criticality: Criticality) -> Component {
        Component {
            id: "db".to_string(),
            criticality,
            dependency_count: 5,
            change_frequency: 0.4,
            complexity: 0.6,
            recent_changes: 0.2,
        }
    }

    #[test]
    fn intrinsic_score_combines_weighted_factors() {
        let score = scorer().intrinsic_score(&component(Criticality::Medium));
        // 0.3*0.4 + 0.25*0.5 + 0.2*0.6 + 0.15*0.5 + 0.1*0.2
        assert!((score - 0.46).abs() < 1e-9);
    }

    #[test]
    fn default_component_scores_at_complexity_and_criticality_floor() {
        let score = scorer().intrinsic_score(&Component::new("anything"));
        // 0.2*0.5 + 0.15*0.5
        assert!((score - 0.175).abs() < 1e-9);
    }

    #[test]
    fn effective_score_applies_change_multiplier() {
        let scorer = scorer();
        let component = component(Criticality::Medium);

        let delete = scorer.score(&component, ChangeType::Delete);
        assert!((delete.effective_score - 0.46 * 1.5).abs() < 1e-9);

        let create = scorer.score(&component, ChangeType::Create);
        assert!((create.effective_score - 0.46 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn no_change_scores_zero_regardless_of_intrinsic_risk() {
        let risk = scorer().score(&component(Criticality::Critical), ChangeType::NoChange);
        assert!(risk.intrinsic_score > 0.0);
        assert_eq!(risk.effective_score, 0.0);
    }

    #[test]
    fn multiplier_ordering_holds_for_identical_intrinsic_score() {
        let scorer = scorer();
        let component = component(Criticality::High);

        let delete = scorer.score(&component, ChangeType::Delete).effective_score;
        let replace = scorer
            .score(&component, ChangeType::Replace)
            .effective_score;
        let update = scorer.score(&component, ChangeType::Update).effective_score;
        let create = scorer.score(&component, ChangeType::Create).effective_score;
        let no_change = scorer
            .score(&component, ChangeType::NoChange)
            .effective_score;

        assert!(delete > replace);
        assert!(replace > update);
        assert!(update > create);
        assert!(create > no_change);
        assert_eq!(no_change, 0.0);
    }

    #[test]
    fn effective_score_is_capped() {
        let scorer = scorer();

        let maxed = Component {
            id: "hub".to_string(),
            criticality: Criticality::Critical,
            dependency_count: 100,
            change_frequency: 1.0,
            complexity: 1.0,
            recent_changes: 1.0,
        };
        let risk = scorer.score(&maxed, ChangeType::Delete);
        assert_eq!(risk.effective_score, MAX_EFFECTIVE_SCORE);
    }

    #[test]
    fn indirect_scoring_uses_policy_multiplier() {
        let mut policy = RiskPolicy::default();
        policy.indirect_multiplier = 0.5;
        let scorer = ComponentRiskScorer::new(policy);
        let component = component(Criticality::Medium);

        let risk = scorer.score_indirect(&component);
        assert_eq!(risk.change_type, ChangeType::NoChange);
        assert!((risk.effective_score - 0.46 * 0.5).abs() < 1e-9);
    }

    #[test]
    fn criticality_override_feeds_the_score() {
        let mut policy = RiskPolicy::default();
        policy
            .criticality
            .insert("db".to_string(), Criticality::Critical);
        let scorer = ComponentRiskScorer::new(policy);

        let risk = scorer.score(&component(Criticality::Low), ChangeType::Update);
        assert_eq!(risk.criticality, Criticality::Critical);
        // 0.3*0.4 + 0.25*0.5 + 0.2*0.6 + 0.15*1.0 + 0.1*0.2
        assert!((risk.intrinsic_score - 0.535).abs() < 1e-9);
    }

    #[test]
    fn unknown_component_scores_from_defaults() {
        let risk = scorer().score_unknown("ghost", ChangeType::Delete);
        assert!((risk.intrinsic_score - 0.175).abs() < 1e-9);
        assert!((risk.effective_score - 0.2625).abs() < 1e-9);
    }
}
