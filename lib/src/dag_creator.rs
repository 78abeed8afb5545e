//! Generate a task DAG from the textual edge-list format
//!
//! ```text
//! # Proc 5
//! ahei_490 -> cotov_474
//! cotov_474 -> err_92
//! ```
use crate::error::{Result, SchedSimError};
use crate::graph_extension::{GraphExtension, NodeData};

use log::{debug, warn};
use petgraph::graph::{Graph, NodeIndex};
use std::collections::HashMap;
use std::fs;
use std::num::IntErrorKind;
use std::path::{Path, PathBuf};

const PROCESSOR_DIRECTIVE: &str = "# Proc";
const EDGE_SEPARATOR: &str = "->";
const DURATION_SEPARATOR: char = '_';
const TASK_FILE_EXTENSION: &str = "txt";

/// A parsed task graph and the processor count its directive declared.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    pub processor_count: usize,
    pub dag: Graph<NodeData, ()>,
    node_indices: HashMap<String, NodeIndex>,
}

impl TaskGraph {
    pub fn task_count(&self) -> usize {
        self.dag.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.dag.node_count() == 0
    }

    pub fn find_node(&self, name: &str) -> Option<NodeIndex> {
        self.node_indices.get(name).copied()
    }

    pub fn get_execution_time(&self, name: &str) -> Option<i64> {
        self.find_node(name).map(|node_i| self.dag[node_i].execution_time)
    }

    pub fn get_pre_node_count(&self, name: &str) -> usize {
        self.find_node(name)
            .map(|node_i| self.dag.get_pre_node_count(node_i))
            .unwrap_or(0)
    }

    pub fn add_dependency(&mut self, parent: &str, child: &str) {
        let parent_i = self.add_task(parent);
        let child_i = self.add_task(child);
        self.dag.add_edge(parent_i, child_i, ());
    }

    /// Add a task if its name is new and return its node index.
    pub fn add_task(&mut self, name: &str) -> NodeIndex {
        if let Some(&node_i) = self.node_indices.get(name) {
            return node_i;
        }
        let (execution_time, has_valid_duration) = parse_execution_time(name);
        let node_i = self.dag.add_node(NodeData {
            id: self.dag.node_count() as i64,
            name: name.to_string(),
            execution_time,
            has_valid_duration,
        });
        self.node_indices.insert(name.to_string(), node_i);
        node_i
    }
}

/// Extract the duration encoded after the last `_` of a task name.
///
/// Returns the duration and whether the suffix was well formed. Anything
/// unusable yields 0.
pub fn parse_execution_time(name: &str) -> (i64, bool) {
    let Some((_, suffix)) = name.rsplit_once(DURATION_SEPARATOR) else {
        return (0, false);
    };
    match suffix.parse::<i64>() {
        Ok(execution_time) if execution_time >= 0 => (execution_time, true),
        Ok(execution_time) => {
            warn!(
                "Negative execution time {} in task {}. 0 is used instead.",
                execution_time, name
            );
            (0, false)
        }
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => {
            warn!(
                "Execution time of task {} exceeds {}. 0 is used instead.",
                name,
                i64::MAX
            );
            (0, false)
        }
        Err(_) => {
            debug!("Task {} has no numeric duration suffix", name);
            (0, false)
        }
    }
}

fn parse_processor_count(line: &str) -> usize {
    let token = line.split_whitespace().last().unwrap_or_default();
    token.parse::<usize>().unwrap_or_else(|_| {
        warn!("Invalid processor count: {}. 0 is used instead.", line);
        0
    })
}

/// Build a task graph from the textual edge-list format.
///
/// Malformed content never fails the parse. Lines without `->` are ignored
/// and bad duration suffixes become 0.
///
/// # Example
///
/// ```
/// use lib::dag_creator::create_task_graph_from_text;
///
/// let task_graph = create_task_graph_from_text("# Proc 2\na_3 -> b_4\n");
/// assert_eq!(task_graph.processor_count, 2);
/// assert_eq!(task_graph.task_count(), 2);
/// assert_eq!(task_graph.get_execution_time("b_4"), Some(4));
/// ```
pub fn create_task_graph_from_text(text: &str) -> TaskGraph {
    let mut task_graph = TaskGraph::default();
    let mut lines = text.lines().map(str::trim).skip_while(|line| line.is_empty());

    let mut first_line = lines.next();
    if let Some(line) = first_line {
        if line.starts_with(PROCESSOR_DIRECTIVE) {
            task_graph.processor_count = parse_processor_count(line);
            first_line = None;
        }
    }

    for line in first_line.into_iter().chain(lines) {
        let Some((parent, child)) = line.split_once(EDGE_SEPARATOR) else {
            continue;
        };
        let (parent, child) = (parent.trim(), child.trim());
        if parent.is_empty() || child.is_empty() || child.contains(EDGE_SEPARATOR) {
            warn!("Malformed dependency line is skipped: {}", line);
            continue;
        }
        task_graph.add_dependency(parent, child);
    }

    debug!(
        "Created task graph: {} tasks, {} edges, {} processors",
        task_graph.task_count(),
        task_graph.dag.edge_count(),
        task_graph.processor_count
    );
    task_graph
}

pub fn create_task_graph_from_file(file_path: &Path) -> Result<TaskGraph> {
    let text = fs::read_to_string(file_path)
        .map_err(|err| SchedSimError::io(file_path.display().to_string(), err))?;
    Ok(create_task_graph_from_text(&text))
}

/// List the `.txt` task graph files of a directory, sorted by path.
pub fn get_task_file_paths_from_dir(dir_path: &Path) -> Result<Vec<PathBuf>> {
    let dir_display = dir_path.display().to_string();
    if !dir_path.is_dir() {
        return Err(SchedSimError::NotADirectory(dir_display));
    }
    let mut file_path_list = Vec::new();
    for dir_entry in
        fs::read_dir(dir_path).map_err(|err| SchedSimError::io(dir_display.clone(), err))?
    {
        let path = dir_entry
            .map_err(|err| SchedSimError::io(dir_display.clone(), err))?
            .path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == TASK_FILE_EXTENSION) {
            file_path_list.push(path);
        }
    }
    if file_path_list.is_empty() {
        return Err(SchedSimError::NoTaskFiles(dir_display));
    }
    file_path_list.sort();
    Ok(file_path_list)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_child_names<'a>(task_graph: &'a TaskGraph, name: &str) -> Vec<&'a str> {
        let node_i = task_graph.find_node(name).unwrap();
        task_graph
            .dag
            .get_suc_nodes(node_i)
            .into_iter()
            .map(|suc_i| task_graph.dag[suc_i].name.as_str())
            .collect()
    }

    const SAMPLE_TEXT: &str = "# Proc 5
pxwmp_185 -> uqy_85
pxwmp_185 -> qpl_279
olg_320 -> pxwmp_185
err_92 -> olg_320
gqh_91 -> miu_291
cotov_474 -> err_92
cotov_474 -> gqh_91
ahei_490 -> cotov_474
err_92 -> gtv_225";

    #[test]
    fn test_create_task_graph_from_text_normal() {
        let task_graph = create_task_graph_from_text(SAMPLE_TEXT);
        assert_eq!(task_graph.processor_count, 5);
        assert_eq!(task_graph.task_count(), 10);
        assert_eq!(task_graph.dag.edge_count(), 9);
        assert_eq!(task_graph.get_execution_time("pxwmp_185"), Some(185));
        assert_eq!(task_graph.get_execution_time("ahei_490"), Some(490));
        assert_eq!(get_child_names(&task_graph, "err_92"), vec!["olg_320", "gtv_225"]);
        assert_eq!(task_graph.get_pre_node_count("ahei_490"), 0);
        assert_eq!(task_graph.get_pre_node_count("pxwmp_185"), 1);
    }

    #[test]
    fn test_create_task_graph_from_text_ids_follow_first_appearance() {
        let task_graph = create_task_graph_from_text(SAMPLE_TEXT);
        let names: Vec<&str> = task_graph
            .dag
            .node_indices()
            .map(|node_i| task_graph.dag[node_i].name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "pxwmp_185",
                "uqy_85",
                "qpl_279",
                "olg_320",
                "err_92",
                "gqh_91",
                "miu_291",
                "cotov_474",
                "ahei_490",
                "gtv_225"
            ]
        );
        let node_i = task_graph.find_node("olg_320").unwrap();
        assert_eq!(task_graph.dag[node_i].id, 3);
    }

    #[test]
    fn test_create_task_graph_from_text_no_directive() {
        let task_graph = create_task_graph_from_text("a_1 -> b_2\n");
        assert_eq!(task_graph.processor_count, 0);
        assert_eq!(task_graph.task_count(), 2);
    }

    #[test]
    fn test_create_task_graph_from_text_directive_after_blank_lines() {
        let task_graph = create_task_graph_from_text("\n\n  # Proc 3  \na_1 -> b_2\n");
        assert_eq!(task_graph.processor_count, 3);
    }

    #[test]
    fn test_create_task_graph_from_text_invalid_directive() {
        let task_graph = create_task_graph_from_text("# Proc many\na_1 -> b_2\n");
        assert_eq!(task_graph.processor_count, 0);
        assert_eq!(task_graph.task_count(), 2);
    }

    #[test]
    fn test_create_task_graph_from_text_directive_only_on_first_line() {
        let task_graph = create_task_graph_from_text("a_1 -> b_2\n# Proc 4\n");
        assert_eq!(task_graph.processor_count, 0);
        assert_eq!(task_graph.task_count(), 2);
    }

    #[test]
    fn test_create_task_graph_from_text_ignores_lines_without_separator() {
        let text = "# Proc 2\n\n# a comment\na_1 -> b_2\nnot an edge\n\r\nb_2 -> c_3\r\n";
        let task_graph = create_task_graph_from_text(text);
        assert_eq!(task_graph.task_count(), 3);
        assert_eq!(task_graph.dag.edge_count(), 2);
        assert_eq!(get_child_names(&task_graph, "b_2"), vec!["c_3"]);
    }

    #[test]
    fn test_create_task_graph_from_text_skips_malformed_edges() {
        let text = "a_1 -> b_2 -> c_3\n -> d_4\ne_5 -> \nf_6 -> g_7";
        let task_graph = create_task_graph_from_text(text);
        assert_eq!(task_graph.task_count(), 2);
        assert!(task_graph.find_node("a_1").is_none());
        assert_eq!(get_child_names(&task_graph, "f_6"), vec!["g_7"]);
    }

    #[test]
    fn test_create_task_graph_from_text_duplicate_edges_kept() {
        let task_graph = create_task_graph_from_text("a_1 -> b_2\na_1 -> b_2\n");
        assert_eq!(task_graph.task_count(), 2);
        assert_eq!(task_graph.get_pre_node_count("b_2"), 2);
        assert_eq!(get_child_names(&task_graph, "a_1"), vec!["b_2", "b_2"]);
    }

    #[test]
    fn test_create_task_graph_from_text_empty() {
        let task_graph = create_task_graph_from_text("");
        assert!(task_graph.is_empty());
        assert_eq!(task_graph.processor_count, 0);
    }

    #[test]
    fn test_create_task_graph_from_text_default_durations() {
        let task_graph = create_task_graph_from_text("start -> job_x\njob_x -> a_b_12\n");
        assert_eq!(task_graph.get_execution_time("start"), Some(0));
        assert_eq!(task_graph.get_execution_time("job_x"), Some(0));
        assert_eq!(task_graph.get_execution_time("a_b_12"), Some(12));
        let node_i = task_graph.find_node("job_x").unwrap();
        assert!(!task_graph.dag[node_i].has_valid_duration);
    }

    #[test]
    fn test_parse_execution_time_normal() {
        assert_eq!(parse_execution_time("pxwmp_185"), (185, true));
        assert_eq!(parse_execution_time("zero_0"), (0, true));
        assert_eq!(parse_execution_time("nosuffix"), (0, false));
        assert_eq!(parse_execution_time("bad_12a"), (0, false));
        assert_eq!(parse_execution_time("neg_-5"), (0, false));
        assert_eq!(parse_execution_time("trailing_"), (0, false));
        assert_eq!(parse_execution_time("big_3000000000"), (3_000_000_000, true));
        assert_eq!(
            parse_execution_time("max_9223372036854775807"),
            (i64::MAX, true)
        );
        assert_eq!(parse_execution_time("huge_9223372036854775808"), (0, false));
    }

    #[test]
    fn test_create_task_graph_from_file_normal() {
        let task_graph =
            create_task_graph_from_file(Path::new("tests/sample_dags/sample_5_proc.txt"))
                .unwrap();
        assert_eq!(task_graph.processor_count, 5);
        assert_eq!(task_graph.task_count(), 10);
    }

    #[test]
    fn test_create_task_graph_from_file_not_found() {
        let result = create_task_graph_from_file(Path::new("tests/sample_dags/missing.txt"));
        assert!(matches!(result, Err(SchedSimError::Io { .. })));
    }

    #[test]
    fn test_get_task_file_paths_from_dir_normal() {
        let file_paths =
            get_task_file_paths_from_dir(Path::new("tests/sample_dags/multiple_txt")).unwrap();
        let file_names: Vec<String> = file_paths
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(file_names, vec!["case01.txt", "case02.txt", "case03.txt"]);
    }

    #[test]
    fn test_get_task_file_paths_from_dir_not_a_directory() {
        let result =
            get_task_file_paths_from_dir(Path::new("tests/sample_dags/sample_5_proc.txt"));
        assert!(matches!(result, Err(SchedSimError::NotADirectory(_))));
    }
}
