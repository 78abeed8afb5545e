//! Greedy list scheduling of a task DAG onto identical cores.
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt;
use std::str::FromStr;

use log::{debug, info, warn};
use petgraph::graph::{Graph, NodeIndex};
use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

use crate::dag_creator::TaskGraph;
use crate::graph_extension::{GraphExtension, NodeData};
use crate::homogeneous::HomogeneousProcessor;
use crate::processor::ProcessorBase;
use crate::schedule_log::{NodeLog, ProcessorLog};

/// Which ready task a free core takes first.
///
/// Ties on execution time are broken by ascending task name under both
/// policies, so `a_5` is dispatched before `b_5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    /// Shortest ready task first.
    Min,
    /// Longest ready task first.
    Max,
}

impl Policy {
    pub const ALL: [Policy; 2] = [Policy::Min, Policy::Max];

    /// Smaller keys are dispatched first. Execution times are never negative.
    pub fn priority_key(&self, execution_time: i64) -> i64 {
        match self {
            Policy::Min => execution_time,
            Policy::Max => -execution_time,
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Min => write!(f, "MIN"),
            Policy::Max => write!(f, "MAX"),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown scheduling policy: {0}")]
pub struct UnknownPolicyError(pub String);

impl FromStr for Policy {
    type Err = UnknownPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MIN" => Ok(Policy::Min),
            "MAX" => Ok(Policy::Max),
            _ => Err(UnknownPolicyError(s.to_string())),
        }
    }
}

/// When the successors of a dispatched task become ready.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseRule {
    /// Successors are released once the clock reaches the task's finish time.
    #[default]
    OnCompletion,
    /// Successors are released as soon as the task is dispatched, so a child
    /// may start on another core before its parent finishes. Kept to reproduce
    /// makespans reported by earlier tooling.
    OnDispatch,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub makespan: i64,
    pub completion_times: BTreeMap<String, i64>,
    pub scheduled_task_count: usize,
    pub total_task_count: usize,
    /// In dispatch order.
    pub node_logs: Vec<NodeLog>,
    pub processor_log: ProcessorLog,
}

impl ScheduleResult {
    /// False when some task never became ready (a cycle, or no cores at all).
    pub fn is_fully_scheduled(&self) -> bool {
        self.scheduled_task_count == self.total_task_count
    }
}

pub struct ListScheduler<'a, T>
where
    T: ProcessorBase + Clone,
{
    task_graph: &'a TaskGraph,
    processor: T,
    release_rule: ReleaseRule,
}

impl<'a, T> ListScheduler<'a, T>
where
    T: ProcessorBase + Clone,
{
    pub fn new(task_graph: &'a TaskGraph, processor: &T) -> Self {
        Self {
            task_graph,
            processor: processor.clone(),
            release_rule: ReleaseRule::default(),
        }
    }

    pub fn with_release_rule(mut self, release_rule: ReleaseRule) -> Self {
        self.release_rule = release_rule;
        self
    }

    /// Simulate the dispatch of every task under `policy`.
    ///
    /// Each round takes the earliest time any core is free, moves every
    /// released task into the ready queue and hands the best ready task to
    /// each core idle at that time, in core index order. When nothing is
    /// ready but tasks are still running, the clock jumps to the next finish.
    ///
    /// The graph is never modified; every call works on its own copy of the
    /// unresolved-dependency counts and of the processor, so repeated calls
    /// return identical results.
    pub fn schedule(&self, policy: Policy) -> ScheduleResult {
        let dag = &self.task_graph.dag;
        let mut processor = self.processor.clone();
        let mut pre_node_counts: Vec<usize> = dag
            .node_indices()
            .map(|node_i| dag.get_pre_node_count(node_i))
            .collect();
        let mut released_nodes: Vec<NodeIndex> = dag
            .node_indices()
            .filter(|node_i| pre_node_counts[node_i.index()] == 0)
            .collect();
        let mut ready_queue: BinaryHeap<Reverse<(i64, &str, NodeIndex)>> = BinaryHeap::new();
        let mut running_nodes: BinaryHeap<Reverse<(i64, NodeIndex)>> = BinaryHeap::new();
        let mut completion_times = BTreeMap::new();
        let mut node_logs = Vec::with_capacity(dag.node_count());

        'scheduling: while let Some(mut current_time) = processor.get_earliest_free_time() {
            loop {
                while let Some(&Reverse((finish_time, node_i))) = running_nodes.peek() {
                    if finish_time > current_time {
                        break;
                    }
                    running_nodes.pop();
                    release_suc_nodes(dag, node_i, &mut pre_node_counts, &mut released_nodes);
                }
                for node_i in released_nodes.drain(..) {
                    let node = &dag[node_i];
                    ready_queue.push(Reverse((
                        policy.priority_key(node.execution_time),
                        node.name.as_str(),
                        node_i,
                    )));
                }
                if !ready_queue.is_empty() {
                    break;
                }
                match running_nodes.peek() {
                    Some(&Reverse((finish_time, _))) => current_time = finish_time,
                    None => break 'scheduling,
                }
            }

            for core_id in processor.get_idle_core_indices(current_time) {
                let Some(Reverse((_, task_name, node_i))) = ready_queue.pop() else {
                    break;
                };
                let exec_time = dag[node_i].execution_time;
                let finish_time = processor.allocate(core_id, current_time, exec_time);
                debug!(
                    "[{}] {} starts on core {} at {} and finishes at {}",
                    policy, task_name, core_id, current_time, finish_time
                );
                completion_times.insert(task_name.to_string(), finish_time);
                node_logs.push(NodeLog {
                    core_id,
                    node_id: node_i.index(),
                    task_name: task_name.to_string(),
                    start_time: current_time,
                    finish_time,
                });
                match self.release_rule {
                    ReleaseRule::OnCompletion => running_nodes.push(Reverse((finish_time, node_i))),
                    ReleaseRule::OnDispatch => {
                        release_suc_nodes(dag, node_i, &mut pre_node_counts, &mut released_nodes)
                    }
                }
            }
        }

        let makespan = completion_times.values().copied().max().unwrap_or(0);
        let result = ScheduleResult {
            makespan,
            scheduled_task_count: completion_times.len(),
            total_task_count: dag.node_count(),
            completion_times,
            node_logs,
            processor_log: ProcessorLog::from_processor(&processor, makespan),
        };
        if !result.is_fully_scheduled() && processor.get_number_of_cores() > 0 {
            warn!(
                "[{}] {} of {} tasks never became ready. The graph is not acyclic.",
                policy,
                result.total_task_count - result.scheduled_task_count,
                result.total_task_count
            );
        }
        info!(
            "[{}] makespan {} on {} cores ({}/{} tasks scheduled)",
            policy,
            makespan,
            processor.get_number_of_cores(),
            result.scheduled_task_count,
            result.total_task_count
        );
        result
    }
}

fn release_suc_nodes(
    dag: &Graph<NodeData, ()>,
    node_i: NodeIndex,
    pre_node_counts: &mut [usize],
    released_nodes: &mut Vec<NodeIndex>,
) {
    for suc_i in dag.get_suc_nodes(node_i) {
        let pre_node_count = &mut pre_node_counts[suc_i.index()];
        *pre_node_count -= 1;
        if *pre_node_count == 0 {
            released_nodes.push(suc_i);
        }
    }
}

/// Makespan of `task_graph` on `processor_count` identical cores.
/// Zero cores or an empty graph yield 0.
pub fn schedule(task_graph: &TaskGraph, processor_count: usize, policy: Policy) -> i64 {
    schedule_with_rule(task_graph, processor_count, policy, ReleaseRule::default()).makespan
}

pub fn schedule_with_rule(
    task_graph: &TaskGraph,
    processor_count: usize,
    policy: Policy,
    release_rule: ReleaseRule,
) -> ScheduleResult {
    ListScheduler::new(task_graph, &HomogeneousProcessor::new(processor_count))
        .with_release_rule(release_rule)
        .schedule(policy)
}
