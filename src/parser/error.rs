use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("Trail data not found at {0}")]
    SourceNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON trail data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML trail data: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Trail record at position {position} is malformed: {reason}")]
    InvalidRecord { position: usize, reason: String },

    #[error("Trail at position {position} has invalid id {id} (ids must be positive)")]
    InvalidId { position: usize, id: i64 },

    #[error("Trail {id} appears more than once")]
    DuplicateId { id: u32 },

    #[error("Trail {trail_id}: profile sample {index} has {arity} usable coordinates, expected 3")]
    MalformedSample {
        trail_id: u32,
        index: usize,
        arity: usize,
    },

    #[error("Trail {trail_id}: profile sample {index} is not ordered by length")]
    UnorderedProfile { trail_id: u32, index: usize },

    #[error("Trail {trail_id}: geometry vertex {index} has {arity} coordinates, expected at least 2")]
    MalformedVertex {
        trail_id: u32,
        index: usize,
        arity: usize,
    },
}
