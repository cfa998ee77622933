//! Aggregate risk classification.
//!
//! Reduces the affected-set scores to one final score and maps it through
//! the configured thresholds to a risk level, an ITIL v4 change type, and
//! an approval requirement. The four risk levels are totally ordered and
//! mutually exclusive; each assessment run lands in exactly one.

use serde::{Deserialize, Serialize};

use crate::config::RiskThresholds;
use crate::errors::AssessmentWarning;
use crate::risk::ComponentRisk;

const AVG_RISK_WEIGHT: f64 = 0.6;
const MAX_RISK_WEIGHT: f64 = 0.3;
const BLAST_RADIUS_WEIGHT: f64 = 0.1;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Map a final score through the threshold cut points. A score equal
    /// to a cut point lands in the higher bucket; anything at or above the
    /// critical threshold (including scores past 1.0) is critical.
    pub fn from_score(score: f64, thresholds: &RiskThresholds) -> Self {
        if score >= thresholds.critical {
            RiskLevel::Critical
        } else if score >= thresholds.high {
            RiskLevel::High
        } else if score >= thresholds.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// ITIL v4 change classification, driven purely by risk level.
    pub fn itil_change_type(self) -> ItilChangeType {
        match self {
            RiskLevel::Low => ItilChangeType::Standard,
            RiskLevel::Medium | RiskLevel::High => ItilChangeType::Normal,
            RiskLevel::Critical => ItilChangeType::Emergency,
        }
    }

    pub fn approval_level(self) -> ApprovalLevel {
        match self {
            RiskLevel::Low => ApprovalLevel::Automated,
            RiskLevel::Medium => ApprovalLevel::TeamLead,
            RiskLevel::High => ApprovalLevel::SeniorManagement,
            RiskLevel::Critical => ApprovalLevel::ChangeAdvisoryBoard,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItilChangeType {
    Standard,
    Normal,
    Emergency,
}

impl ItilChangeType {
    pub fn label(&self) -> &'static str {
        match self {
            ItilChangeType::Standard => "standard",
            ItilChangeType::Normal => "normal",
            ItilChangeType::Emergency => "emergency",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalLevel {
    Automated,
    TeamLead,
    SeniorManagement,
    ChangeAdvisoryBoard,
}

impl ApprovalLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ApprovalLevel::Automated => "automated",
            ApprovalLevel::TeamLead => "team lead",
            ApprovalLevel::SeniorManagement => "senior management",
            ApprovalLevel::ChangeAdvisoryBoard => "change advisory board",
        }
    }
}

/// Affected-set statistics reduced to one number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub avg_risk: f64,
    pub max_risk: f64,
    pub blast_radius_factor: f64,
    pub final_score: f64,
}

/// Reduce per-component scores to aggregate statistics.
///
/// A `total_components` of zero yields all-zero statistics by convention
/// rather than a division error.
pub fn aggregate(scores: &[ComponentRisk], total_components: usize) -> AggregateStats {
    if scores.is_empty() || total_components == 0 {
        return AggregateStats::default();
    }

    let sum: f64 = scores.iter().map(|score| score.effective_score).sum();
    let avg_risk = sum / scores.len() as f64;
    let max_risk = scores
        .iter()
        .map(|score| score.effective_score)
        .fold(0.0, f64::max);
    let blast_radius_factor = scores.len() as f64 / total_components as f64;

    let final_score = avg_risk * AVG_RISK_WEIGHT
        + max_risk * MAX_RISK_WEIGHT
        + blast_radius_factor * BLAST_RADIUS_WEIGHT;

    AggregateStats {
        avg_risk,
        max_risk,
        blast_radius_factor,
        final_score,
    }
}

/// Full assessment emitted for the reporting layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeAssessment {
    pub risk_level: RiskLevel,
    pub itil_change_type: ItilChangeType,
    pub approval_required: ApprovalLevel,
    pub final_score: f64,
    pub avg_risk: f64,
    pub max_risk: f64,
    pub blast_radius_factor: f64,
    pub total_components: usize,
    pub affected_components: usize,
    pub components: Vec<ComponentRisk>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<AssessmentWarning>,
}
