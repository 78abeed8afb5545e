use chrono::{DateTime, Utc};
use log::info;
use serde_derive::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;

use crate::dag_creator::TaskGraph;
use crate::error::{Result, SchedSimError};
use crate::graph_extension::GraphExtension;
use crate::list_scheduler::{Policy, ScheduleResult};
use crate::makespan_comparison::MakespanComparison;
use crate::schedule_log::{NodeLog, ProcessorLog};

#[derive(Serialize, Deserialize)]
struct TaskGraphInfo {
    task_count: usize,
    edge_count: usize,
    processor_count: usize,
    volume: i64,
    critical_path_length: Option<i64>,
}

#[derive(Serialize, Deserialize)]
struct ComparisonInfo {
    comparisons: Vec<MakespanComparison>,
}

#[derive(Serialize, Deserialize)]
struct ScheduleLogInfo {
    policy: Policy,
    makespan: i64,
    node_logs: Vec<NodeLog>,
    processor_log: ProcessorLog,
}

pub fn create_yaml_file(folder_path: &str, file_name: &str) -> Result<String> {
    if fs::metadata(folder_path).is_err() {
        fs::create_dir_all(folder_path).map_err(|err| SchedSimError::io(folder_path, err))?;
        info!("Created folder: {}", folder_path);
    }
    let file_path = format!("{}/{}.yaml", folder_path, file_name);
    fs::File::create(&file_path).map_err(|err| SchedSimError::io(file_path.as_str(), err))?;
    Ok(file_path)
}

/// Create an empty YAML file named after the current UTC time and the algorithm.
pub fn create_scheduler_log_yaml_file(folder_path: &str, alg_name: &str) -> Result<String> {
    let now: DateTime<Utc> = Utc::now();
    let date = now.format("%Y-%m-%d-%H-%M-%S").to_string();
    let file_name = format!("{}-{}-log", date, alg_name);
    create_yaml_file(folder_path, &file_name)
}

pub fn append_info_to_yaml(file_path: &str, info: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(file_path)
        .map_err(|err| SchedSimError::io(file_path, err))?;
    file.write_all(info.as_bytes())
        .map_err(|err| SchedSimError::io(file_path, err))
}

pub fn dump_task_graph_info_to_yaml(file_path: &str, task_graph: &TaskGraph) -> Result<()> {
    let task_graph_info = TaskGraphInfo {
        task_count: task_graph.task_count(),
        edge_count: task_graph.dag.edge_count(),
        processor_count: task_graph.processor_count,
        volume: task_graph.dag.get_volume(),
        critical_path_length: task_graph.dag.get_critical_path_length(),
    };
    append_info_to_yaml(file_path, &serde_yaml::to_string(&task_graph_info)?)
}

pub fn dump_comparisons_to_yaml(file_path: &str, comparisons: &[MakespanComparison]) -> Result<()> {
    let comparison_info = ComparisonInfo {
        comparisons: comparisons.to_vec(),
    };
    append_info_to_yaml(file_path, &serde_yaml::to_string(&comparison_info)?)
}

/// Append one document per policy run, so several runs can share a file.
pub fn dump_schedule_log_to_yaml(
    file_path: &str,
    policy: Policy,
    schedule_result: &ScheduleResult,
) -> Result<()> {
    let schedule_log_info = ScheduleLogInfo {
        policy,
        makespan: schedule_result.makespan,
        node_logs: schedule_result.node_logs.clone(),
        processor_log: schedule_result.processor_log.clone(),
    };
    let yaml = format!("---\n{}", serde_yaml::to_string(&schedule_log_info)?);
    append_info_to_yaml(file_path, &yaml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag_creator::create_task_graph_from_text;
    use crate::list_scheduler::{schedule_with_rule, ReleaseRule};
    use serde::Deserialize;
    use std::fs::remove_file;

    const FORK_JOIN_TEXT: &str =
        "# Proc 2\na_3 -> b_2\na_3 -> c_7\na_3 -> d_4\nb_2 -> e_6\nc_7 -> e_6\nd_4 -> e_6\n";

    #[test]
    fn test_dump_task_graph_info_to_yaml_normal() {
        let file_path = create_yaml_file("../outputs", "test_dump_task_graph_info").unwrap();
        let task_graph = create_task_graph_from_text(FORK_JOIN_TEXT);
        dump_task_graph_info_to_yaml(&file_path, &task_graph).unwrap();

        let file_contents = fs::read_to_string(&file_path).unwrap();
        let task_graph_info: TaskGraphInfo = serde_yaml::from_str(&file_contents).unwrap();

        assert_eq!(task_graph_info.task_count, 5);
        assert_eq!(task_graph_info.edge_count, 6);
        assert_eq!(task_graph_info.processor_count, 2);
        assert_eq!(task_graph_info.volume, 22);
        assert_eq!(task_graph_info.critical_path_length, Some(16));
        remove_file(file_path).unwrap();
    }

    #[test]
    fn test_dump_comparisons_to_yaml_normal() {
        let file_path = create_scheduler_log_yaml_file("../outputs", "test_comparisons").unwrap();
        let comparisons = vec![MakespanComparison {
            file: "case01.txt".to_string(),
            processor_count: 3,
            task_count: 4,
            min_makespan: 10,
            max_makespan: 10,
            fully_scheduled: true,
        }];
        dump_comparisons_to_yaml(&file_path, &comparisons).unwrap();

        let file_contents = fs::read_to_string(&file_path).unwrap();
        let comparison_info: ComparisonInfo = serde_yaml::from_str(&file_contents).unwrap();

        assert_eq!(comparison_info.comparisons, comparisons);
        assert!(file_path.ends_with("-test_comparisons-log.yaml"));
        remove_file(file_path).unwrap();
    }

    #[test]
    fn test_dump_schedule_log_to_yaml_multiple_documents() {
        let file_path = create_yaml_file("../outputs", "test_dump_schedule_log").unwrap();
        let task_graph = create_task_graph_from_text(FORK_JOIN_TEXT);
        for policy in Policy::ALL {
            let result = schedule_with_rule(&task_graph, 2, policy, ReleaseRule::OnCompletion);
            dump_schedule_log_to_yaml(&file_path, policy, &result).unwrap();
        }

        let file_contents = fs::read_to_string(&file_path).unwrap();
        let logs: Vec<ScheduleLogInfo> = serde_yaml::Deserializer::from_str(&file_contents)
            .map(|document| ScheduleLogInfo::deserialize(document).unwrap())
            .collect();

        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].policy, Policy::Min);
        assert_eq!(logs[0].makespan, 18);
        assert_eq!(logs[1].policy, Policy::Max);
        assert_eq!(logs[1].makespan, 16);
        assert_eq!(logs[1].node_logs.len(), 5);
        assert_eq!(logs[1].processor_log.core_logs.len(), 2);
        remove_file(file_path).unwrap();
    }

    #[test]
    fn test_append_info_to_yaml_missing_folder() {
        let result = append_info_to_yaml("../outputs/no_such_dir/sub/file.yaml", "a: 1\n");
        assert!(matches!(result, Err(SchedSimError::Io { .. })));
    }
}
