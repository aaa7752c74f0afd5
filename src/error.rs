use std::path::PathBuf;
use thiserror::Error;

use crate::graph::VertexId;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("vertex identifier collision on {id}: {existing:?} and {incoming:?} hash to the same id")]
    VertexIdentifierCollision {
        id: VertexId,
        existing: String,
        incoming: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("missing required column {0:?}")]
    MissingColumn(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;

impl GraphError {
    pub(crate) fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        GraphError::Io {
            source,
            path: path.into(),
        }
    }
}

impl From<toml::de::Error> for GraphError {
    fn from(e: toml::de::Error) -> Self {
        GraphError::Config(e.to_string())
    }
}
