//! The social interaction graph: vertices keyed by a name hash, directed
//! author edges, and compact index views for the analytics engines.

pub mod builder;
pub mod dot;

use std::collections::HashMap;
use std::fmt;
use std::hash::Hasher;

use twox_hash::XxHash64;

pub use builder::{BuildStats, GraphBuilder};

/// Stable identifier of an entity: xxHash64 (seed 0) of its UTF-8 name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub u64);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn vertex_id(name: &str) -> VertexId {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(name.as_bytes());
    VertexId(hasher.finish())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    pub id: VertexId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Relation {
    Mention,
    Hashtag,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Mention => f.write_str("mention"),
            Relation::Hashtag => f.write_str("hashtag"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub src: VertexId,
    pub dst: VertexId,
    pub kind: Relation,
}

/// Immutable graph produced by [`GraphBuilder`]. Vertices are sorted by id
/// and edges by `(src, dst, kind)`; every edge endpoint is a vertex.
#[derive(Debug, Clone)]
pub struct SocialGraph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    index: HashMap<VertexId, usize>,
}

impl SocialGraph {
    pub(crate) fn from_sorted(vertices: Vec<Vertex>, edges: Vec<Edge>) -> Self {
        let index = vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id, i))
            .collect();
        SocialGraph {
            vertices,
            edges,
            index,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Dense position of `id` in [`Self::vertices`].
    pub fn position(&self, id: VertexId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn name(&self, id: VertexId) -> Option<&str> {
        self.position(id).map(|i| self.vertices[i].name.as_str())
    }

    pub fn contains(&self, id: VertexId) -> bool {
        self.index.contains_key(&id)
    }

    /// Edges as dense `(src, dst)` positions, in edge order.
    pub(crate) fn dense_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges
            .iter()
            .filter_map(|e| Some((self.position(e.src)?, self.position(e.dst)?)))
    }
}
