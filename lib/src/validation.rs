//! Optional strict checks over a parsed task graph.
//!
//! Scheduling never fails on these conditions; it silently degrades instead.
//! Callers that want to refuse such inputs run `validate_task_graph` first.
use std::collections::HashSet;

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::dag_creator::TaskGraph;
use crate::graph_extension::GraphExtension;

pub type ValidationResult = Result<(), Vec<ValidationError>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The processor directive is missing or declares 0 cores.
    NoProcessors,
    /// A task name carries no usable duration suffix.
    MalformedDuration,
    /// The same dependency is declared more than once.
    DuplicateEdge,
    /// Tasks depend on each other in a loop.
    CyclicDependency,
    /// A task outside any cycle that waits on one and never becomes ready.
    UnreachableTask,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

pub fn validate_task_graph(task_graph: &TaskGraph) -> ValidationResult {
    let dag = &task_graph.dag;
    let mut errors = Vec::new();

    if task_graph.processor_count == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoProcessors,
            "No processor is declared",
        ));
    }

    for node_i in dag.node_indices() {
        if !dag[node_i].has_valid_duration {
            errors.push(ValidationError::new(
                ValidationErrorKind::MalformedDuration,
                format!("Task {} has no valid duration suffix", dag[node_i].name),
            ));
        }
    }

    let mut seen_edges = HashSet::new();
    let mut reported_edges = HashSet::new();
    for edge in dag.edge_references() {
        let endpoints = (edge.source(), edge.target());
        if !seen_edges.insert(endpoints) && reported_edges.insert(endpoints) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateEdge,
                format!(
                    "Dependency {} -> {} is declared more than once",
                    dag[edge.source()].name,
                    dag[edge.target()].name
                ),
            ));
        }
    }

    let mut cyclic_nodes = HashSet::new();
    for component in tarjan_scc(dag) {
        let is_cycle = component.len() > 1 || dag.contains_edge(component[0], component[0]);
        if !is_cycle {
            continue;
        }
        let mut names: Vec<&str> = component
            .iter()
            .map(|&node_i| dag[node_i].name.as_str())
            .collect();
        names.sort_unstable();
        errors.push(ValidationError::new(
            ValidationErrorKind::CyclicDependency,
            format!("Cyclic dependency among {}", names.join(", ")),
        ));
        cyclic_nodes.extend(component);
    }

    if !cyclic_nodes.is_empty() {
        let reachable = get_ready_reachable_nodes(task_graph);
        for node_i in dag.node_indices() {
            if !reachable.contains(&node_i) && !cyclic_nodes.contains(&node_i) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnreachableTask,
                    format!("Task {} waits on a cyclic dependency", dag[node_i].name),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Nodes whose unresolved-dependency count can reach 0 (Kahn's algorithm).
fn get_ready_reachable_nodes(task_graph: &TaskGraph) -> HashSet<NodeIndex> {
    let dag = &task_graph.dag;
    let mut pre_node_counts: Vec<usize> = dag
        .node_indices()
        .map(|node_i| dag.get_pre_node_count(node_i))
        .collect();
    let mut stack = dag.get_source_nodes();
    let mut reachable = HashSet::new();
    while let Some(node_i) = stack.pop() {
        reachable.insert(node_i);
        for suc_i in dag.get_suc_nodes(node_i) {
            pre_node_counts[suc_i.index()] -= 1;
            if pre_node_counts[suc_i.index()] == 0 {
                stack.push(suc_i);
            }
        }
    }
    reachable
}
