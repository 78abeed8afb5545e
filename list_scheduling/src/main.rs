use std::path::Path;

use clap::Parser;
use lib::dag_creator::{create_task_graph_from_file, create_task_graph_from_text, TaskGraph};
use lib::error::SchedSimError;
use lib::homogeneous::HomogeneousProcessor;
use lib::list_scheduler::{ListScheduler, Policy, ReleaseRule};
use lib::makespan_comparison::{compare_policies_in_dir, MakespanComparison};
use lib::output_log::*;
use lib::processor::ProcessorBase;
use lib::validation::validate_task_graph;
use log::{error, warn};

const DEMO_TASK_GRAPH: &str = "# Proc 5
pxwmp_185 -> uqy_85
pxwmp_185 -> qpl_279
olg_320 -> pxwmp_185
err_92 -> olg_320
gqh_91 -> miu_291
cotov_474 -> err_92
cotov_474 -> gqh_91
ahei_490 -> cotov_474
err_92 -> gtv_225";

#[derive(Parser)]
#[clap(
    name = "List_Scheduling",
    version = "1.0",
    about = "About:
    Compares the makespan of shortest-task-first (MIN) and longest-task-first (MAX)
    list scheduling of a task DAG on identical cores.
    Without a file or a directory, a built-in demo graph is scheduled."
)]
struct ArgParser {
    ///Path to a task graph file.
    #[clap(short = 'f', long = "dag_file_path", conflicts_with = "dag_dir_path")]
    dag_file_path: Option<String>,
    ///Path to a directory of task graph files (*.txt).
    #[clap(short = 'd', long = "dag_dir_path")]
    dag_dir_path: Option<String>,
    ///Number of processing cores. Overrides the "# Proc" line of a single graph.
    #[clap(short = 'c', long = "number_of_cores", conflicts_with = "dag_dir_path")]
    number_of_cores: Option<usize>,
    ///Path to output directory.
    #[clap(short = 'o', long = "output_dir_path", default_value = "../outputs")]
    output_dir_path: String,
    ///Release successors when a task is dispatched instead of when it finishes.
    #[clap(long = "release_on_dispatch")]
    release_on_dispatch: bool,
    ///Refuse a single graph that fails validation.
    #[clap(long = "strict", conflicts_with = "dag_dir_path")]
    strict: bool,
}

fn print_comparison(comparison: &MakespanComparison) {
    println!("File: {}", comparison.file);
    println!("Processors: {}", comparison.processor_count);
    println!("Tasks: {}", comparison.task_count);
    println!("MIN: {}", comparison.min_makespan);
    println!("MAX: {}", comparison.max_makespan);
    println!("MAX - MIN: {}", comparison.difference());
    if !comparison.fully_scheduled {
        println!("Warning: some tasks were never scheduled");
    }
}

fn load_task_graph(arg: &ArgParser) -> Result<(String, TaskGraph), SchedSimError> {
    let (file, mut task_graph) = match &arg.dag_file_path {
        Some(dag_file_path) => {
            let path = Path::new(dag_file_path);
            let file = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| dag_file_path.clone());
            (file, create_task_graph_from_file(path)?)
        }
        None => ("demo".to_string(), create_task_graph_from_text(DEMO_TASK_GRAPH)),
    };
    if let Some(number_of_cores) = arg.number_of_cores {
        task_graph.processor_count = number_of_cores;
    }

    if let Err(errors) = validate_task_graph(&task_graph) {
        for validation_error in &errors {
            warn!("{:?}: {}", validation_error.kind, validation_error.message);
        }
        if arg.strict {
            return Err(SchedSimError::InvalidTaskGraph(errors.len()));
        }
    }
    Ok((file, task_graph))
}

fn run_single(arg: &ArgParser, release_rule: ReleaseRule) -> Result<(), SchedSimError> {
    let (file, task_graph) = load_task_graph(arg)?;
    let processor = HomogeneousProcessor::new(task_graph.processor_count);
    let list_scheduler = ListScheduler::new(&task_graph, &processor).with_release_rule(release_rule);
    let min_result = list_scheduler.schedule(Policy::Min);
    let max_result = list_scheduler.schedule(Policy::Max);

    let comparison = MakespanComparison::from_results(&file, &task_graph, &min_result, &max_result);
    print_comparison(&comparison);

    let file_path = create_scheduler_log_yaml_file(&arg.output_dir_path, "list_scheduling")?;
    dump_task_graph_info_to_yaml(&file_path, &task_graph)?;
    dump_comparisons_to_yaml(&file_path, &[comparison])?;
    dump_schedule_log_to_yaml(&file_path, Policy::Min, &min_result)?;
    dump_schedule_log_to_yaml(&file_path, Policy::Max, &max_result)?;
    Ok(())
}

fn run_dir(
    arg: &ArgParser,
    dag_dir_path: &str,
    release_rule: ReleaseRule,
) -> Result<(), SchedSimError> {
    let comparisons = compare_policies_in_dir(Path::new(dag_dir_path), release_rule)?;
    for comparison in &comparisons {
        print_comparison(comparison);
        println!("{}", "-".repeat(40));
    }
    println!("Total cases: {}", comparisons.len());

    let file_path = create_scheduler_log_yaml_file(&arg.output_dir_path, "list_scheduling")?;
    dump_comparisons_to_yaml(&file_path, &comparisons)
}

fn main() {
    env_logger::init();
    let arg: ArgParser = ArgParser::parse();
    let release_rule = if arg.release_on_dispatch {
        ReleaseRule::OnDispatch
    } else {
        ReleaseRule::OnCompletion
    };

    let result = match &arg.dag_dir_path {
        Some(dag_dir_path) => run_dir(&arg, dag_dir_path, release_rule),
        None => run_single(&arg, release_rule),
    };
    if let Err(err) = result {
        error!("{}", err);
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
