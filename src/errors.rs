//! Error taxonomy for the assessment engine.
//!
//! Per-component problems (a bad change type, a change aimed at a component
//! the graph does not know) are recovered locally and surfaced as
//! [`AssessmentWarning`]s attached to the assessment output. Only missing
//! inputs and invalid policy configuration are fatal.

use serde::Serialize;
use thiserror::Error;

/// Configuration problems detected when a [`crate::config::RiskPolicy`] is
/// validated at engine construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("{name} weight must be between 0.0 and 1.0, got {value}")]
    WeightOutOfRange { name: &'static str, value: f64 },

    #[error("scoring weights must sum to 1.0, but sum to {sum:.3}")]
    WeightSum { sum: f64 },

    #[error(
        "risk thresholds must be strictly ascending within (0.0, 1.0], \
         got medium={medium}, high={high}, critical={critical}"
    )]
    ThresholdOrder {
        medium: f64,
        high: f64,
        critical: f64,
    },

    #[error("dependency normalization cap must be at least 1")]
    ZeroDependencyCap,

    #[error("indirect impact multiplier must be between 0.0 and 1.5, got {value}")]
    IndirectMultiplierOutOfRange { value: f64 },
}

/// A change record referenced a value outside the closed change-type enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized change type `{value}`")]
pub struct ParseChangeTypeError {
    pub value: String,
}

/// Recoverable per-component problems, reported on the assessment output.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssessmentWarning {
    /// The record was dropped; the component never joins the changed set.
    #[error("change for `{component_id}` has unrecognized change type `{value}`; record skipped")]
    InvalidChangeType { component_id: String, value: String },

    /// The component still counts as changed for blast-radius purposes but
    /// contributes no dependency propagation.
    #[error(
        "change references `{component_id}` which is absent from the dependency graph; \
         scored with default attributes, no propagation"
    )]
    UnknownComponent { component_id: String },
}
