use im::{HashSet, Vector};

use crate::graph::DependencyGraph;

/// Result of impact propagation: the directly changed components and
/// everything that transitively depends on them.
#[derive(Debug, Clone, PartialEq)]
pub struct BlastRadius {
    pub changed: HashSet<String>,
    pub affected: HashSet<String>,
}

impl BlastRadius {
    /// Components impacted only through the graph, not changed themselves.
    pub fn indirect(&self) -> HashSet<String> {
        self.affected
            .iter()
            .filter(|id| !self.changed.contains(*id))
            .cloned()
            .collect()
    }
}

/// Reverse-reachability closure from the changed set.
///
/// Worklist BFS over the reverse-adjacency index with a visited set; a
/// component already in the affected set is never enqueued again, so
/// cycles terminate. The affected set always contains the changed set
/// itself.
pub fn propagate(graph: &DependencyGraph, changed: &HashSet<String>) -> BlastRadius {
    let mut affected = changed.clone();
    let mut queue: Vector<String> = changed.iter().cloned().collect();

    while let Some(current) = queue.pop_front() {
        for dependent in graph.dependents_of(&current) {
            if !affected.contains(&dependent) {
                affected.insert(dependent.clone());
                queue.push_back(dependent);
            }
        }
    }

    BlastRadius {
        changed: changed.clone(),
        affected,
    }
}
