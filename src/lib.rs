// Export modules for library usage
pub mod builders;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod graph;
pub mod io;
pub mod risk;

// Re-export commonly used types
pub use crate::builders::ChangeRiskAnalyzer;
pub use crate::config::{
    CriticalityWeights, NormalizationConfig, RiskPolicy, RiskThresholds, ScoringWeights,
};
pub use crate::core::{Change, ChangeSet, ChangeType, Component, Criticality, DependencyEdge};
pub use crate::errors::{AssessmentWarning, ParseChangeTypeError, PolicyError};
pub use crate::graph::DependencyGraph;
pub use crate::io::output::{create_writer, AssessmentRun, OutputFormat, OutputWriter};
pub use crate::risk::blast_radius::{propagate, BlastRadius};
pub use crate::risk::classification::{
    aggregate, AggregateStats, ApprovalLevel, ChangeAssessment, ItilChangeType, RiskLevel,
};
pub use crate::risk::recommendations::generate_recommendations;
pub use crate::risk::{ComponentRisk, ComponentRiskScorer, MAX_EFFECTIVE_SCORE};
