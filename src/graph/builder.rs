//! Parallel graph construction from message records.

use std::borrow::Borrow;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::Receiver;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rayon::prelude::*;
use tracing::{debug, info};

use super::{Edge, Relation, SocialGraph, Vertex, VertexId, vertex_id};
use crate::error::{GraphError, Result};
use crate::extract::{extract, normalize_author};
use crate::record::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub records: usize,
    /// Records without a usable author; they contribute nothing.
    pub malformed: usize,
    pub vertices: usize,
    pub edges: usize,
}

pub struct GraphBuilder {
    id_fn: fn(&str) -> VertexId,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        GraphBuilder { id_fn: vertex_id }
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `id_fn` instead of the xxHash64 name hash.
    pub fn with_id_fn(id_fn: fn(&str) -> VertexId) -> Self {
        GraphBuilder { id_fn }
    }

    pub fn build<R>(&self, records: &[R]) -> Result<(SocialGraph, BuildStats)>
    where
        R: Borrow<Record> + Sync,
    {
        self.ingest(records.par_iter().map(<R as Borrow<Record>>::borrow))
    }

    /// Builds from records arriving on a channel, e.g. from
    /// [`crate::record::stream_records`]. Returns once the sender hangs up.
    pub fn build_stream(&self, records: Receiver<Record>) -> Result<(SocialGraph, BuildStats)> {
        self.ingest(records.into_iter().par_bridge())
    }

    fn ingest<I>(&self, records: I) -> Result<(SocialGraph, BuildStats)>
    where
        I: ParallelIterator,
        I::Item: Borrow<Record>,
    {
        let names: DashMap<VertexId, String> = DashMap::new();
        let seen = AtomicUsize::new(0);
        let malformed = AtomicUsize::new(0);

        let per_record: Vec<Vec<Edge>> = records
            .map(|record| {
                seen.fetch_add(1, Ordering::Relaxed);
                let record: &Record = record.borrow();
                match normalize_author(&record.author) {
                    Some(author) => self.record_edges(&names, author, record.text.as_deref()),
                    None => {
                        malformed.fetch_add(1, Ordering::Relaxed);
                        debug!(text = ?record.text, "skipping record without author");
                        Ok(Vec::new())
                    }
                }
            })
            .collect::<Result<_>>()?;

        let mut vertices: Vec<Vertex> = names
            .into_iter()
            .map(|(id, name)| Vertex { id, name })
            .collect();
        vertices.par_sort_unstable_by_key(|v| v.id);

        let mut edges: Vec<Edge> = per_record.into_iter().flatten().collect();
        edges.par_sort_unstable();

        let stats = BuildStats {
            records: seen.into_inner(),
            malformed: malformed.into_inner(),
            vertices: vertices.len(),
            edges: edges.len(),
        };
        info!(
            records = stats.records,
            malformed = stats.malformed,
            vertices = stats.vertices,
            edges = stats.edges,
            "graph built"
        );
        Ok((SocialGraph::from_sorted(vertices, edges), stats))
    }

    fn record_edges(
        &self,
        names: &DashMap<VertexId, String>,
        author: &str,
        text: Option<&str>,
    ) -> Result<Vec<Edge>> {
        let entities = extract(text);
        let src = self.intern(names, author)?;
        let mut edges = Vec::with_capacity(entities.mentions.len() + entities.hashtags.len());
        for (tokens, kind) in [
            (&entities.mentions, Relation::Mention),
            (&entities.hashtags, Relation::Hashtag),
        ] {
            for token in tokens {
                let dst = self.intern(names, token)?;
                edges.push(Edge { src, dst, kind });
            }
        }
        Ok(edges)
    }

    /// Inserts `name` under its id if absent, otherwise checks the stored
    /// name matches.
    fn intern(&self, names: &DashMap<VertexId, String>, name: &str) -> Result<VertexId> {
        let id = (self.id_fn)(name);
        match names.entry(id) {
            Entry::Occupied(existing) if existing.get() != name => {
                Err(GraphError::VertexIdentifierCollision {
                    id,
                    existing: existing.get().clone(),
                    incoming: name.to_string(),
                })
            }
            Entry::Occupied(_) => Ok(id),
            Entry::Vacant(slot) => {
                slot.insert(name.to_string());
                Ok(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(author: &str, text: &str) -> Record {
        Record::new(author, text)
    }

    fn named_edges(graph: &SocialGraph) -> Vec<(String, String, Relation)> {
        let mut out: Vec<_> = graph
            .edges()
            .iter()
            .map(|e| {
                (
                    graph.name(e.src).unwrap_or_default().to_string(),
                    graph.name(e.dst).unwrap_or_default().to_string(),
                    e.kind,
                )
            })
            .collect();
        out.sort();
        out
    }

    #[test]
    fn builds_mention_and_hashtag_edges() {
        let records = vec![rec("alice", "hello @bob #spark"), rec("bob", "hi #spark")];
        let (graph, stats) = GraphBuilder::new().build(&records).unwrap();

        let mut names: Vec<_> = graph.vertices().iter().map(|v| v.name.as_str()).collect();
        names.sort();
        assert_eq!(names, ["alice", "bob", "spark"]);
        assert_eq!(
            named_edges(&graph),
            vec![
                ("alice".into(), "bob".into(), Relation::Mention),
                ("alice".into(), "spark".into(), Relation::Hashtag),
                ("bob".into(), "spark".into(), Relation::Hashtag),
            ]
        );
        assert_eq!(stats.records, 2);
        assert_eq!(stats.malformed, 0);
    }

    #[test]
    fn dedups_within_record_but_keeps_multiplicity_across_records() {
        let records = vec![
            rec("alice", "@bob @bob #x #x"),
            rec("alice", "again @bob"),
        ];
        let (graph, _) = GraphBuilder::new().build(&records).unwrap();
        let mentions = graph
            .edges()
            .iter()
            .filter(|e| e.kind == Relation::Mention)
            .count();
        assert_eq!(mentions, 2);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.vertex_count(), 3);
    }

    #[test]
    fn malformed_records_are_skipped_and_counted() {
        let records = vec![rec("   ", "@ghost #lost"), rec("carol", "plain")];
        let (graph, stats) = GraphBuilder::new().build(&records).unwrap();
        assert_eq!(stats.malformed, 1);
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.name(vertex_id("carol")), Some("carol"));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn author_sigil_joins_with_mentions() {
        let records = vec![rec("@bob", "#x"), rec("alice", "@bob")];
        let (graph, _) = GraphBuilder::new().build(&records).unwrap();
        assert_eq!(graph.vertex_count(), 3);
    }

    #[test]
    fn colliding_ids_fail_the_build() {
        let builder = GraphBuilder::with_id_fn(|_| VertexId(7));
        let err = builder.build(&[rec("alice", "@bob")]).unwrap_err();
        match err {
            GraphError::VertexIdentifierCollision { id, existing, incoming } => {
                assert_eq!(id, VertexId(7));
                assert_ne!(existing, incoming);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn same_name_is_not_a_collision() {
        let builder = GraphBuilder::with_id_fn(|_| VertexId(7));
        let (graph, _) = builder.build(&[rec("spark", "#spark @spark")]).unwrap();
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn stream_build_matches_slice_build() {
        let records = vec![
            rec("alice", "hello @bob #spark"),
            rec("bob", "hi #spark @carol"),
            rec("carol", "#rust"),
        ];
        let (tx, rx) = crossbeam_channel::unbounded();
        for r in records.iter().cloned() {
            tx.send(r).unwrap();
        }
        drop(tx);

        let (a, _) = GraphBuilder::new().build(&records).unwrap();
        let (b, _) = GraphBuilder::new().build_stream(rx).unwrap();
        assert_eq!(a.vertices(), b.vertices());
        assert_eq!(a.edges(), b.edges());
    }
}
