//! Snapshot ingestion.
//!
//! The graph extractor and the plan parser are external collaborators;
//! this module consumes their JSON artifacts at the interface boundary.
//! Change types stay strings in the raw plan so a bad value degrades to a
//! per-record warning instead of failing the whole file. Normalized
//! factors are clamped into [0, 1] here, at ingestion.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::core::{ChangeSet, Component, Criticality};
use crate::graph::DependencyGraph;

/// Graph snapshot as supplied by the infrastructure parser.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentRecord {
    pub id: String,
    #[serde(default)]
    pub criticality: Option<Criticality>,
    /// Omitted counts are derived from the snapshot's edge list.
    #[serde(default)]
    pub dependency_count: Option<usize>,
    #[serde(default)]
    pub change_frequency: Option<f64>,
    #[serde(default)]
    pub complexity: Option<f64>,
    #[serde(default)]
    pub recent_changes: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeRecord {
    pub dependent: String,
    pub dependency: String,
}

/// Change plan as supplied by the plan parser.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePlan {
    #[serde(default)]
    pub changes: Vec<ChangeRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRecord {
    pub component_id: String,
    pub change_type: String,
}

pub fn load_graph(path: &Path) -> Result<DependencyGraph> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph snapshot {}", path.display()))?;
    let snapshot: GraphSnapshot = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse graph snapshot {}", path.display()))?;
    Ok(graph_from_snapshot(snapshot))
}

pub fn graph_from_snapshot(snapshot: GraphSnapshot) -> DependencyGraph {
    let mut graph = DependencyGraph::new();

    for edge in &snapshot.edges {
        graph.add_dependency(edge.dependent.clone(), edge.dependency.clone());
    }

    for record in snapshot.components {
        let derived_count = graph.dependencies_of(&record.id).len();
        let component = Component {
            id: record.id,
            criticality: record.criticality.unwrap_or_default(),
            dependency_count: record.dependency_count.unwrap_or(derived_count),
            change_frequency: record.change_frequency.unwrap_or(0.0),
            complexity: record.complexity.unwrap_or(0.5),
            recent_changes: record.recent_changes.unwrap_or(0.0),
        }
        .clamped();
        graph.add_component(component);
    }

    // Edge endpoints without a component record get default attributes so
    // the radius never silently drops them.
    for edge in &snapshot.edges {
        for id in [&edge.dependent, &edge.dependency] {
            if !graph.contains(id) {
                let mut component = Component::new(id.clone());
                component.dependency_count = graph.dependencies_of(id).len();
                graph.add_component(component);
            }
        }
    }

    graph
}

pub fn load_change_plan(path: &Path) -> Result<ChangeSet> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read change plan {}", path.display()))?;
    let plan: ChangePlan = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse change plan {}", path.display()))?;
    Ok(change_set_from_plan(plan))
}

pub fn change_set_from_plan(plan: ChangePlan) -> ChangeSet {
    ChangeSet::from_entries(
        plan.changes
            .into_iter()
            .map(|record| (record.component_id, record.change_type)),
    )
}
