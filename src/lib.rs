//! Social interaction graph analytics: authors, the users they mention and
//! the hashtags they use, ranked with `PageRank` and grouped into connected
//! communities.

pub mod aggregate;
pub mod components;
pub mod config;
pub mod error;
pub mod extract;
pub mod generator;
pub mod graph;
pub mod pagerank;
pub mod pipeline;
pub mod record;
pub mod report;

pub use components::{ComponentResult, Strategy, connected_components};
pub use config::AnalysisConfig;
pub use error::{GraphError, Result};
pub use graph::{BuildStats, Edge, GraphBuilder, Relation, SocialGraph, Vertex, VertexId, vertex_id};
pub use pagerank::{PageRankParams, PageRankResult, page_rank};
pub use pipeline::{Analysis, Report, analyze, run};
pub use record::Record;
