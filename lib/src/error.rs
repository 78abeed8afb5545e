//! Errors raised around the scheduling core (file access and result dumping).
//! Parsing and scheduling themselves never fail.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedSimError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("No task graph file found in {0}")]
    NoTaskFiles(String),

    #[error("Task graph failed validation with {0} error(s)")]
    InvalidTaskGraph(usize),

    #[error("Failed to serialize to YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SchedSimError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        SchedSimError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SchedSimError>;
