//! Graphviz export of the social graph, vertices coloured by component.

use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use petgraph::Graph;
use petgraph::graph::NodeIndex;
use petgraph::dot::{Config, Dot};

use super::{Relation, SocialGraph, VertexId};
use crate::components::ComponentResult;
use crate::error::{GraphError, Result};

impl SocialGraph {
    /// Copies the graph into a petgraph `Graph` with node weights being
    /// entity names, in vertex order.
    pub fn to_petgraph(&self) -> Graph<String, Relation> {
        let mut graph = Graph::with_capacity(self.vertex_count(), self.edge_count());
        let nodes: Vec<_> = self
            .vertices()
            .iter()
            .map(|v| graph.add_node(v.name.clone()))
            .collect();
        for e in self.edges() {
            if let (Some(s), Some(d)) = (self.position(e.src), self.position(e.dst)) {
                graph.add_edge(nodes[s], nodes[d], e.kind);
            }
        }
        graph
    }
}

pub fn to_dot(graph: &SocialGraph, components: &ComponentResult) -> String {
    let pg = graph.to_petgraph();

    // Hue per component in order of first appearance.
    let mut hues: HashMap<VertexId, usize> = HashMap::new();
    let node_hue: Vec<usize> = components
        .labels
        .iter()
        .map(|(_, c)| {
            let next = hues.len();
            *hues.entry(*c).or_insert(next) * 60 % 360
        })
        .collect();

    let node_attrs = |_: &Graph<String, Relation>, (idx, name): (NodeIndex, &String)| {
        let hue = node_hue.get(idx.index()).copied().unwrap_or_default();
        format!(
            "label=\"{}\", style=filled, fillcolor=\"{:.3} 0.5 0.7\"",
            name.escape_default(),
            hue as f32 / 360.0
        )
    };
    let dot = Dot::with_attr_getters(
        &pg,
        &[Config::EdgeNoLabel, Config::NodeNoLabel],
        &|_, edge| format!("label=\"{}\"", edge.weight()),
        &node_attrs,
    );
    format!("{dot:?}")
}

pub fn save_dot(graph: &SocialGraph, components: &ComponentResult, path: &Path) -> Result<()> {
    std::fs::write(path, to_dot(graph, components)).map_err(|e| GraphError::io(e, path))
}

/// Renders a DOT file to PNG with the Graphviz `dot` executable.
pub fn render_png(dot_file: &Path, output_image: &Path) -> Result<()> {
    let status = Command::new("dot")
        .arg("-Tpng")
        .arg(dot_file)
        .arg("-o")
        .arg(output_image)
        .status()
        .map_err(|e| GraphError::io(e, dot_file))?;
    if !status.success() {
        return Err(GraphError::io(
            std::io::Error::other(format!("dot exited with {status}")),
            output_image,
        ));
    }
    Ok(())
}
