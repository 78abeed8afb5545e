//! library for makespan simulation of task DAGs under list scheduling.
pub mod core;
pub mod dag_creator;
pub mod error;
pub mod graph_extension;
pub mod homogeneous;
pub mod list_scheduler;
pub mod makespan_comparison;
pub mod output_log;
pub mod processor;
pub mod schedule_log;
pub mod validation;
