//! Joins engine output back to entity names for reporting.

use std::collections::{BTreeMap, HashMap};

use crate::components::ComponentResult;
use crate::graph::{SocialGraph, VertexId};
use crate::pagerank::PageRankResult;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntity {
    pub name: String,
    pub id: VertexId,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentGroup {
    pub component_id: VertexId,
    /// Full member count, unaffected by truncation of `members`.
    pub size: usize,
    pub members: Vec<String>,
}

/// Top `top_k` entities by score, descending, ties broken by ascending id.
/// A name reached by several ids keeps its highest score.
pub fn rank_entities(graph: &SocialGraph, result: &PageRankResult, top_k: usize) -> Vec<RankedEntity> {
    let mut best: HashMap<&str, (VertexId, f64)> = HashMap::new();
    for &(id, score) in &result.scores {
        let Some(name) = graph.name(id) else {
            continue;
        };
        best.entry(name)
            .and_modify(|slot| {
                if score > slot.1 || (score == slot.1 && id < slot.0) {
                    *slot = (id, score);
                }
            })
            .or_insert((id, score));
    }

    let mut ranked: Vec<RankedEntity> = best
        .into_iter()
        .map(|(name, (id, score))| RankedEntity {
            name: name.to_string(),
            id,
            score,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.id.cmp(&b.id)));
    ranked.truncate(top_k);
    ranked
}

/// Components largest first, ties by ascending component id. Members are
/// sorted by name and cut to `member_limit`.
pub fn group_components(
    graph: &SocialGraph,
    result: &ComponentResult,
    member_limit: usize,
) -> Vec<ComponentGroup> {
    let mut groups: BTreeMap<VertexId, Vec<String>> = BTreeMap::new();
    for &(id, component) in &result.labels {
        if let Some(name) = graph.name(id) {
            groups.entry(component).or_default().push(name.to_string());
        }
    }

    let mut groups: Vec<ComponentGroup> = groups
        .into_iter()
        .map(|(component_id, mut members)| {
            let size = members.len();
            members.sort();
            members.truncate(member_limit);
            ComponentGroup {
                component_id,
                size,
                members,
            }
        })
        .collect();
    groups.sort_by(|a, b| b.size.cmp(&a.size).then(a.component_id.cmp(&b.component_id)));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Strategy, connected_components};
    use crate::graph::{Edge, Relation, Vertex, vertex_id};

    fn graph_with(names: &[(u64, &str)], edges: &[(u64, u64)]) -> SocialGraph {
        let mut vertices: Vec<Vertex> = names
            .iter()
            .map(|(id, n)| Vertex {
                id: VertexId(*id),
                name: n.to_string(),
            })
            .collect();
        vertices.sort_by_key(|v| v.id);
        let edges = edges
            .iter()
            .map(|(s, d)| Edge {
                src: VertexId(*s),
                dst: VertexId(*d),
                kind: Relation::Mention,
            })
            .collect();
        SocialGraph::from_sorted(vertices, edges)
    }

    fn pr(scores: &[(u64, f64)]) -> PageRankResult {
        PageRankResult {
            scores: scores.iter().map(|(i, s)| (VertexId(*i), *s)).collect(),
            iterations: 1,
            converged: true,
            delta: 0.0,
        }
    }

    #[test]
    fn ranks_by_score_then_id() {
        let g = graph_with(&[(1, "a"), (2, "b"), (3, "c"), (4, "d")], &[]);
        let ranked = rank_entities(&g, &pr(&[(1, 0.1), (2, 0.4), (3, 0.1), (4, 0.4)]), 3);
        let order: Vec<_> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(order, ["b", "d", "a"]);
    }

    #[test]
    fn duplicate_names_keep_max_score() {
        let g = graph_with(&[(1, "dup"), (2, "dup"), (3, "other")], &[]);
        let ranked = rank_entities(&g, &pr(&[(1, 0.2), (2, 0.5), (3, 0.3)]), 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "dup");
        assert_eq!(ranked[0].id, VertexId(2));
        assert_eq!(ranked[0].score, 0.5);
    }

    #[test]
    fn groups_sorted_and_truncated() {
        let g = graph_with(
            &[(1, "e"), (2, "d"), (3, "c"), (4, "b"), (5, "a"), (6, "solo")],
            &[(5, 4), (4, 3), (1, 2)],
        );
        let comps = connected_components(&g, Strategy::UnionFind);
        let groups = group_components(&g, &comps, 2);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].component_id, VertexId(3));
        assert_eq!(groups[0].size, 3);
        assert_eq!(groups[0].members, ["a", "b"]);
        assert_eq!(groups[1].component_id, VertexId(1));
        assert_eq!(groups[2].members, ["solo"]);
        let total: usize = groups.iter().map(|g| g.size).sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn real_ids_round_trip_through_names() {
        let g = graph_with(&[(vertex_id("x").0, "x")], &[]);
        let ranked = rank_entities(&g, &pr(&[(vertex_id("x").0, 1.0)]), 10);
        assert_eq!(ranked[0].id, vertex_id("x"));
    }
}
