//! Build, analyse, aggregate.

use tracing::info;

use crate::aggregate::{ComponentGroup, RankedEntity, group_components, rank_entities};
use crate::components::{ComponentResult, connected_components};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::graph::{BuildStats, GraphBuilder, SocialGraph};
use crate::pagerank::{PageRankResult, page_rank};
use crate::record::Record;

/// Raw engine output for one graph.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub page_rank: PageRankResult,
    pub components: ComponentResult,
}

/// What the reporting side consumes.
#[derive(Debug, Clone)]
pub struct Report {
    pub stats: BuildStats,
    pub top_entities: Vec<RankedEntity>,
    pub components: Vec<ComponentGroup>,
    pub component_count: usize,
    pub page_rank_converged: bool,
    pub page_rank_iterations: usize,
}

/// Runs both engines concurrently over the same read-only graph.
pub fn analyze(graph: &SocialGraph, config: &AnalysisConfig) -> Analysis {
    let params = config.page_rank_params();
    let (page_rank, components) = rayon::join(
        || page_rank(graph, &params),
        || connected_components(graph, config.components_strategy),
    );
    Analysis {
        page_rank,
        components,
    }
}

pub fn summarize(
    graph: &SocialGraph,
    stats: BuildStats,
    analysis: &Analysis,
    config: &AnalysisConfig,
) -> Report {
    Report {
        stats,
        top_entities: rank_entities(graph, &analysis.page_rank, config.top_k),
        components: group_components(graph, &analysis.components, config.group_member_limit),
        component_count: analysis.components.component_count,
        page_rank_converged: analysis.page_rank.converged,
        page_rank_iterations: analysis.page_rank.iterations,
    }
}

/// The whole batch: records in, report out.
pub fn run(records: &[Record], config: &AnalysisConfig) -> Result<(SocialGraph, Analysis, Report)> {
    config.validate()?;
    let (graph, stats) = GraphBuilder::new().build(records)?;
    let analysis = analyze(&graph, config);
    let report = summarize(&graph, stats, &analysis, config);
    info!(
        vertices = graph.vertex_count(),
        components = report.component_count,
        "analysis complete"
    );
    Ok((graph, analysis, report))
}
