//! `PageRank` over the social graph.
//!
//! Each iteration computes every vertex's new score in parallel from the
//! previous score vector; the collect at the end of the parallel pass is the
//! barrier between iterations. Scalar reductions (sink mass, L1 delta) are
//! summed sequentially in vertex order so results do not depend on how rayon
//! splits the work.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::graph::{SocialGraph, VertexId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRankParams {
    pub damping_factor: f64,
    /// Convergence threshold on the L1 norm of score changes.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for PageRankParams {
    fn default() -> Self {
        PageRankParams {
            damping_factor: 0.85,
            tolerance: 1e-4,
            max_iterations: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageRankResult {
    /// Scores in the graph's vertex order.
    pub scores: Vec<(VertexId, f64)>,
    pub iterations: usize,
    /// False when `max_iterations` ran out before the tolerance was met; the
    /// scores are then the last iterate.
    pub converged: bool,
    /// L1 change of the final iteration.
    pub delta: f64,
}

impl PageRankResult {
    pub fn score_map(&self) -> HashMap<VertexId, f64> {
        self.scores.iter().copied().collect()
    }

    pub fn total(&self) -> f64 {
        self.scores.iter().map(|(_, s)| s).sum()
    }
}

/// Incoming adjacency in compressed form: the sources of edges into vertex
/// `v` are `sources[offsets[v]..offsets[v + 1]]`, one entry per edge.
struct Topology {
    offsets: Vec<usize>,
    sources: Vec<usize>,
    out_degree: Vec<usize>,
    sinks: Vec<usize>,
}

impl Topology {
    fn new(graph: &SocialGraph) -> Self {
        let n = graph.vertex_count();
        let mut in_degree = vec![0usize; n];
        let mut out_degree = vec![0usize; n];
        for (s, d) in graph.dense_edges() {
            out_degree[s] += 1;
            in_degree[d] += 1;
        }

        let mut offsets = Vec::with_capacity(n + 1);
        offsets.push(0);
        for deg in &in_degree {
            offsets.push(offsets[offsets.len() - 1] + deg);
        }

        let mut cursor = offsets[..n].to_vec();
        let mut sources = vec![0usize; offsets[n]];
        for (s, d) in graph.dense_edges() {
            sources[cursor[d]] = s;
            cursor[d] += 1;
        }

        let sinks = (0..n).filter(|&v| out_degree[v] == 0).collect();
        Topology {
            offsets,
            sources,
            out_degree,
            sinks,
        }
    }

    fn incoming(&self, v: usize) -> &[usize] {
        &self.sources[self.offsets[v]..self.offsets[v + 1]]
    }
}

#[allow(clippy::cast_precision_loss)]
pub fn page_rank(graph: &SocialGraph, params: &PageRankParams) -> PageRankResult {
    let n = graph.vertex_count();
    if n == 0 {
        return PageRankResult {
            scores: Vec::new(),
            iterations: 0,
            converged: true,
            delta: 0.0,
        };
    }

    let topo = Topology::new(graph);
    let d = params.damping_factor;
    let nf = n as f64;
    let teleport = (1.0 - d) / nf;

    let mut ranks = vec![1.0 / nf; n];
    let mut iterations = 0;
    let mut delta = f64::INFINITY;

    while iterations < params.max_iterations {
        let sink_mass: f64 = topo.sinks.iter().map(|&v| ranks[v]).sum();
        let base = teleport + d * sink_mass / nf;

        let next: Vec<f64> = (0..n)
            .into_par_iter()
            .map(|v| {
                let inflow: f64 = topo
                    .incoming(v)
                    .iter()
                    .map(|&u| ranks[u] / topo.out_degree[u] as f64)
                    .sum();
                base + d * inflow
            })
            .collect();

        delta = next.iter().zip(&ranks).map(|(a, b)| (a - b).abs()).sum();
        ranks = next;
        iterations += 1;
        debug!(iteration = iterations, delta, "pagerank iteration");

        if delta <= params.tolerance {
            break;
        }
    }

    let converged = delta <= params.tolerance;
    if converged {
        info!(iterations, delta, "pagerank converged");
    } else {
        warn!(
            iterations,
            delta,
            tolerance = params.tolerance,
            "pagerank hit the iteration cap before converging"
        );
    }

    let scores = graph
        .vertices()
        .iter()
        .zip(ranks)
        .map(|(v, r)| (v.id, r))
        .collect();
    PageRankResult {
        scores,
        iterations,
        converged,
        delta,
    }
}
