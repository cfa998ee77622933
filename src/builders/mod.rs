//! Assembles the assessment pipeline: score, propagate, classify,
//! recommend. Each run is a pure function of one graph snapshot and one
//! change set; nothing is mutated and nothing persists between runs.

use std::cmp::Ordering;

use im::HashSet;
use rayon::prelude::*;

use crate::config::RiskPolicy;
use crate::core::{ChangeSet, ChangeType};
use crate::errors::{AssessmentWarning, PolicyError};
use crate::graph::DependencyGraph;
use crate::risk::blast_radius;
use crate::risk::classification::{aggregate, AggregateStats, ChangeAssessment, RiskLevel};
use crate::risk::recommendations::generate_recommendations;
use crate::risk::{ComponentRisk, ComponentRiskScorer};

pub struct ChangeRiskAnalyzer {
    scorer: ComponentRiskScorer,
}

impl ChangeRiskAnalyzer {
    /// Validates the policy once up front; an invalid policy is a
    /// configuration error, not a per-run warning.
    pub fn new(policy: RiskPolicy) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self {
            scorer: ComponentRiskScorer::new(policy),
        })
    }

    pub fn policy(&self) -> &RiskPolicy {
        self.scorer.policy()
    }

    /// Assess one change set against one graph snapshot.
    pub fn assess(&self, graph: &DependencyGraph, changes: &ChangeSet) -> ChangeAssessment {
        let mut warnings: Vec<AssessmentWarning> = changes.warnings().to_vec();

        // Split direct changes into graph-known and unknown ids. Unknown
        // ids still count as changed, but have no edges to traverse.
        let mut known_changed: HashSet<String> = HashSet::new();
        let mut unknown_changed: Vec<(String, ChangeType)> = Vec::new();
        for (component_id, change_type) in changes.directly_changed() {
            if graph.contains(&component_id) {
                known_changed.insert(component_id);
            } else {
                warnings.push(AssessmentWarning::UnknownComponent {
                    component_id: component_id.clone(),
                });
                unknown_changed.push((component_id, change_type));
            }
        }

        // An empty graph has nothing to propagate over; the assessment is
        // defined as zero risk.
        if graph.is_empty() {
            return self.zeroed_assessment(warnings);
        }

        let blast = blast_radius::propagate(graph, &known_changed);

        let mut scores: Vec<ComponentRisk> = Vec::with_capacity(blast.affected.len());
        for component_id in blast.affected.iter() {
            let Some(component) = graph.component(component_id) else {
                continue;
            };
            let change_type = changes.change_for(component_id);
            let risk = if change_type.is_direct() {
                self.scorer.score(component, change_type)
            } else {
                self.scorer.score_indirect(component)
            };
            scores.push(risk);
        }
        for (component_id, change_type) in &unknown_changed {
            scores.push(self.scorer.score_unknown(component_id, *change_type));
        }

        // Deterministic report order: highest effective score first, then
        // id. Aggregation runs over the sorted list so float reduction
        // order is stable across runs.
        scores.sort_by(|a, b| {
            b.effective_score
                .partial_cmp(&a.effective_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.component_id.cmp(&b.component_id))
        });

        let total_components = graph.component_count() + unknown_changed.len();
        let stats = aggregate(&scores, total_components);
        let risk_level = RiskLevel::from_score(stats.final_score, &self.policy().thresholds);
        let delete_count = scores
            .iter()
            .filter(|score| score.change_type == ChangeType::Delete)
            .count();
        let recommendations = generate_recommendations(risk_level, delete_count);

        log::info!(
            "assessed {} changed / {} affected of {} components: final score {:.3} ({})",
            known_changed.len() + unknown_changed.len(),
            scores.len(),
            total_components,
            stats.final_score,
            risk_level.label()
        );
        if !warnings.is_empty() {
            log::warn!("{} warning(s) attached to assessment", warnings.len());
        }

        ChangeAssessment {
            risk_level,
            itil_change_type: risk_level.itil_change_type(),
            approval_required: risk_level.approval_level(),
            final_score: stats.final_score,
            avg_risk: stats.avg_risk,
            max_risk: stats.max_risk,
            blast_radius_factor: stats.blast_radius_factor,
            total_components,
            affected_components: scores.len(),
            components: scores,
            recommendations,
            warnings,
        }
    }

    /// Assess several plans against one snapshot in parallel. Each run
    /// reads only immutable data, so plain data parallelism is enough and
    /// result order follows input order.
    pub fn assess_plans(
        &self,
        graph: &DependencyGraph,
        plans: &[ChangeSet],
    ) -> Vec<ChangeAssessment> {
        plans.par_iter().map(|plan| self.assess(graph, plan)).collect()
    }

    fn zeroed_assessment(&self, warnings: Vec<AssessmentWarning>) -> ChangeAssessment {
        let stats = AggregateStats::default();
        ChangeAssessment {
            risk_level: RiskLevel::Low,
            itil_change_type: RiskLevel::Low.itil_change_type(),
            approval_required: RiskLevel::Low.approval_level(),
            final_score: stats.final_score,
            avg_risk: stats.avg_risk,
            max_risk: stats.max_risk,
            blast_radius_factor: stats.blast_radius_factor,
            total_components: 0,
            affected_components: 0,
            components: Vec::new(),
            recommendations: generate_recommendations(RiskLevel::Low, 0),
            warnings,
        }
    }
}
