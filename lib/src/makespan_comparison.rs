//! MIN versus MAX makespan of task graph files, for report and chart tooling.
use std::path::Path;

use log::{error, info};
use serde_derive::{Deserialize, Serialize};

use crate::dag_creator::{create_task_graph_from_file, get_task_file_paths_from_dir, TaskGraph};
use crate::error::Result;
use crate::list_scheduler::{schedule_with_rule, Policy, ReleaseRule, ScheduleResult};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakespanComparison {
    pub file: String,
    pub processor_count: usize,
    pub task_count: usize,
    pub min_makespan: i64,
    pub max_makespan: i64,
    /// False when either run left tasks unscheduled.
    pub fully_scheduled: bool,
}

impl MakespanComparison {
    pub fn from_results(
        file: &str,
        task_graph: &TaskGraph,
        min_result: &ScheduleResult,
        max_result: &ScheduleResult,
    ) -> Self {
        Self {
            file: file.to_string(),
            processor_count: task_graph.processor_count,
            task_count: task_graph.task_count(),
            min_makespan: min_result.makespan,
            max_makespan: max_result.makespan,
            fully_scheduled: min_result.is_fully_scheduled() && max_result.is_fully_scheduled(),
        }
    }

    /// Negative when longest-task-first finishes earlier.
    pub fn difference(&self) -> i64 {
        self.max_makespan - self.min_makespan
    }
}

/// Schedule `task_graph` once per policy on its declared processor count.
pub fn compare_policies(
    file: &str,
    task_graph: &TaskGraph,
    release_rule: ReleaseRule,
) -> MakespanComparison {
    let processor_count = task_graph.processor_count;
    let min_result = schedule_with_rule(task_graph, processor_count, Policy::Min, release_rule);
    let max_result = schedule_with_rule(task_graph, processor_count, Policy::Max, release_rule);
    MakespanComparison::from_results(file, task_graph, &min_result, &max_result)
}

pub fn compare_policies_from_file(
    file_path: &Path,
    release_rule: ReleaseRule,
) -> Result<MakespanComparison> {
    let task_graph = create_task_graph_from_file(file_path)?;
    let file = file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.display().to_string());
    Ok(compare_policies(&file, &task_graph, release_rule))
}

/// Compare every `.txt` task graph of a directory, in file name order.
/// Files that cannot be read are logged and left out.
pub fn compare_policies_in_dir(
    dir_path: &Path,
    release_rule: ReleaseRule,
) -> Result<Vec<MakespanComparison>> {
    let mut comparisons = Vec::new();
    for file_path in get_task_file_paths_from_dir(dir_path)? {
        match compare_policies_from_file(&file_path, release_rule) {
            Ok(comparison) => {
                info!(
                    "{}: MIN {}, MAX {}",
                    comparison.file, comparison.min_makespan, comparison.max_makespan
                );
                comparisons.push(comparison);
            }
            Err(err) => error!("{}", err),
        }
    }
    Ok(comparisons)
}
