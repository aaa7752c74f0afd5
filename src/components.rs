//! Connected components over the undirected view of the graph.
//!
//! Every vertex is labelled with the smallest identifier in its component,
//! whichever strategy computes it.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, info};

use crate::graph::{SocialGraph, VertexId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Parallel min-label relaxation, one barrier per round.
    #[default]
    LabelPropagation,
    /// Sequential disjoint-set with path compression and union by rank.
    UnionFind,
}

#[derive(Debug, Clone)]
pub struct ComponentResult {
    /// `(vertex, component)` pairs in the graph's vertex order.
    pub labels: Vec<(VertexId, VertexId)>,
    pub component_count: usize,
    /// Relaxation rounds; zero for union-find.
    pub rounds: usize,
}

impl ComponentResult {
    pub fn label_map(&self) -> HashMap<VertexId, VertexId> {
        self.labels.iter().copied().collect()
    }
}

pub fn connected_components(graph: &SocialGraph, strategy: Strategy) -> ComponentResult {
    let (labels, rounds) = match strategy {
        Strategy::LabelPropagation => label_propagation(graph),
        Strategy::UnionFind => (union_find_labels(graph), 0),
    };

    let component_count = graph
        .vertices()
        .iter()
        .zip(&labels)
        .filter(|(v, l)| v.id == **l)
        .count();
    info!(?strategy, components = component_count, rounds, "connected components computed");

    let labels = graph
        .vertices()
        .iter()
        .zip(labels)
        .map(|(v, l)| (v.id, l))
        .collect();
    ComponentResult {
        labels,
        component_count,
        rounds,
    }
}

/// Undirected neighbours in compressed form, self loops dropped.
fn undirected_adjacency(graph: &SocialGraph) -> (Vec<usize>, Vec<usize>) {
    let n = graph.vertex_count();
    let mut degree = vec![0usize; n];
    for (s, d) in graph.dense_edges().filter(|(s, d)| s != d) {
        degree[s] += 1;
        degree[d] += 1;
    }

    let mut offsets = Vec::with_capacity(n + 1);
    offsets.push(0);
    for deg in &degree {
        offsets.push(offsets[offsets.len() - 1] + deg);
    }

    let mut cursor = offsets[..n].to_vec();
    let mut neighbours = vec![0usize; offsets[n]];
    for (s, d) in graph.dense_edges().filter(|(s, d)| s != d) {
        neighbours[cursor[s]] = d;
        cursor[s] += 1;
        neighbours[cursor[d]] = s;
        cursor[d] += 1;
    }
    (offsets, neighbours)
}

fn label_propagation(graph: &SocialGraph) -> (Vec<VertexId>, usize) {
    let (offsets, neighbours) = undirected_adjacency(graph);
    let mut labels: Vec<VertexId> = graph.vertices().iter().map(|v| v.id).collect();
    let mut rounds = 0;

    loop {
        let next: Vec<VertexId> = (0..labels.len())
            .into_par_iter()
            .map(|v| {
                neighbours[offsets[v]..offsets[v + 1]]
                    .iter()
                    .map(|&u| labels[u])
                    .fold(labels[v], VertexId::min)
            })
            .collect();

        rounds += 1;
        let changed = next.iter().zip(&labels).filter(|(a, b)| a != b).count();
        debug!(round = rounds, changed, "label propagation round");
        labels = next;
        if changed == 0 {
            return (labels, rounds);
        }
    }
}

pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        UnionFind {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    pub fn union(&mut self, x: usize, y: usize) {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return;
        }
        match self.rank[rx].cmp(&self.rank[ry]) {
            std::cmp::Ordering::Less => self.parent[rx] = ry,
            std::cmp::Ordering::Greater => self.parent[ry] = rx,
            std::cmp::Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] += 1;
            }
        }
    }
}

fn union_find_labels(graph: &SocialGraph) -> Vec<VertexId> {
    let n = graph.vertex_count();
    let mut sets = UnionFind::new(n);
    for (s, d) in graph.dense_edges() {
        sets.union(s, d);
    }

    // Vertices are sorted by id, so the first member seen per root is the
    // component minimum.
    let mut minimum: Vec<Option<VertexId>> = vec![None; n];
    let mut labels = Vec::with_capacity(n);
    for (i, v) in graph.vertices().iter().enumerate() {
        let root = sets.find(i);
        labels.push(*minimum[root].get_or_insert(v.id));
    }
    labels
}
