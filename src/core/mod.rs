use im::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{AssessmentWarning, ParseChangeTypeError};

/// Organizational importance of a component. Supplied by configuration or
/// inferred as `Medium` when unknown.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Criticality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criticality::Low => "low",
            Criticality::Medium => "medium",
            Criticality::High => "high",
            Criticality::Critical => "critical",
        }
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed taxonomy of planned resource changes. Values outside this enum
/// are rejected at parse time, not coerced to `Update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Create,
    Update,
    Delete,
    Replace,
    NoChange,
}

impl ChangeType {
    /// Fixed multiplier scaling intrinsic risk by how destructive the
    /// change is.
    pub fn multiplier(self) -> f64 {
        match self {
            ChangeType::Delete => 1.5,
            ChangeType::Replace => 1.3,
            ChangeType::Update => 1.0,
            ChangeType::Create => 0.8,
            ChangeType::NoChange => 0.0,
        }
    }

    /// Whether this change actually touches the component.
    pub fn is_direct(self) -> bool {
        !matches!(self, ChangeType::NoChange)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Create => "create",
            ChangeType::Update => "update",
            ChangeType::Delete => "delete",
            ChangeType::Replace => "replace",
            ChangeType::NoChange => "no_change",
        }
    }
}

impl FromStr for ChangeType {
    type Err = ParseChangeTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(ChangeType::Create),
            "update" => Ok(ChangeType::Update),
            "delete" => Ok(ChangeType::Delete),
            "replace" => Ok(ChangeType::Replace),
            "no_change" => Ok(ChangeType::NoChange),
            other => Err(ParseChangeTypeError {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of infrastructure tracked as a graph node.
///
/// All normalized factors live in [0, 1]; out-of-range input is clamped at
/// ingestion via [`Component::clamped`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    #[serde(default)]
    pub criticality: Criticality,
    /// Number of components this component depends on.
    #[serde(default)]
    pub dependency_count: usize,
    /// Historical change rate, normalized.
    #[serde(default)]
    pub change_frequency: f64,
    /// Structural complexity, normalized.
    #[serde(default = "default_complexity")]
    pub complexity: f64,
    /// Recency signal, normalized.
    #[serde(default)]
    pub recent_changes: f64,
}

fn default_complexity() -> f64 {
    0.5
}

impl Component {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            criticality: Criticality::Medium,
            dependency_count: 0,
            change_frequency: 0.0,
            complexity: 0.5,
            recent_changes: 0.0,
        }
    }

    /// Clamp every normalized factor into [0, 1].
    pub fn clamped(mut self) -> Self {
        self.change_frequency = clamp01(self.change_frequency);
        self.complexity = clamp01(self.complexity);
        self.recent_changes = clamp01(self.recent_changes);
        self
    }
}

pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Directed edge meaning `dependent` requires `dependency`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub dependent: String,
    pub dependency: String,
}

/// A single planned change to one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub component_id: String,
    pub change_type: ChangeType,
}

/// Planned changes keyed by component id.
///
/// A component absent from the set is implicitly `NoChange`. Later records
/// for the same component override earlier ones. Records with unrecognized
/// change types are dropped and kept as warnings rather than coerced to
/// `Update`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    changes: HashMap<String, ChangeType>,
    warnings: Vec<AssessmentWarning>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_changes(changes: impl IntoIterator<Item = Change>) -> Self {
        let mut set = Self::new();
        for change in changes {
            set.record(change.component_id, change.change_type);
        }
        set
    }

    /// Build a change set from raw `(component_id, change_type)` string
    /// pairs, accumulating a warning for every unparseable change type.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut set = Self::new();
        for (component_id, raw) in entries {
            match raw.parse::<ChangeType>() {
                Ok(change_type) => set.record(component_id, change_type),
                Err(_) => set.warnings.push(AssessmentWarning::InvalidChangeType {
                    component_id,
                    value: raw,
                }),
            }
        }
        set
    }

    pub fn record(&mut self, component_id: impl Into<String>, change_type: ChangeType) {
        self.changes.insert(component_id.into(), change_type);
    }

    /// Change type for a component, defaulting to `NoChange` when absent.
    pub fn change_for(&self, component_id: &str) -> ChangeType {
        self.changes
            .get(component_id)
            .copied()
            .unwrap_or(ChangeType::NoChange)
    }

    /// All records that actually touch their component.
    pub fn directly_changed(&self) -> Vec<(String, ChangeType)> {
        self.changes
            .iter()
            .filter(|(_, change_type)| change_type.is_direct())
            .map(|(id, change_type)| (id.clone(), *change_type))
            .collect()
    }

    /// Ids of directly changed components.
    pub fn changed_ids(&self) -> HashSet<String> {
        self.changes
            .iter()
            .filter(|(_, change_type)| change_type.is_direct())
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Warnings accumulated while building the set.
    pub fn warnings(&self) -> &[AssessmentWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
