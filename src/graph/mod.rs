use im::{HashMap, HashSet, Vector};
use serde::{Deserialize, Serialize};

use crate::core::{Component, DependencyEdge};

/// Directed "depends-on" graph over infrastructure components.
///
/// Forward and reverse adjacency are indexed on insert so blast radius
/// propagation never rescans the edge list. The graph is acyclic in the
/// common case, but nothing here assumes it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    components: HashMap<String, Component>,
    edges: Vector<DependencyEdge>,
    // id -> the components it depends on
    dependency_index: HashMap<String, HashSet<String>>,
    // id -> the components that depend on it
    dependent_index: HashMap<String, HashSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        components: impl IntoIterator<Item = Component>,
        edges: impl IntoIterator<Item = DependencyEdge>,
    ) -> Self {
        let mut graph = Self::new();
        for component in components {
            graph.add_component(component);
        }
        for edge in edges {
            graph.add_dependency(edge.dependent, edge.dependency);
        }
        graph
    }

    pub fn add_component(&mut self, component: Component) {
        self.components.insert(component.id.clone(), component);
    }

    pub fn add_dependency(&mut self, dependent: impl Into<String>, dependency: impl Into<String>) {
        let dependent = dependent.into();
        let dependency = dependency.into();

        self.edges.push_back(DependencyEdge {
            dependent: dependent.clone(),
            dependency: dependency.clone(),
        });

        self.dependency_index
            .entry(dependent.clone())
            .or_default()
            .insert(dependency.clone());

        self.dependent_index
            .entry(dependency)
            .or_default()
            .insert(dependent);
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.components.contains_key(id)
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Components that directly depend on `id`.
    pub fn dependents_of(&self, id: &str) -> Vec<String> {
        self.dependent_index
            .get(id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Components `id` directly depends on.
    pub fn dependencies_of(&self, id: &str) -> Vec<String> {
        self.dependency_index
            .get(id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
