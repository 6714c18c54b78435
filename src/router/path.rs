use std::{fmt::Display, sync::Arc};

use serde::Serialize;
use tracing::trace;

use crate::{
    graph::VertexIdx,
    payload::EdgePayload,
    router::{self, Direction, EdgeType, ShortestPathTree, State},
    shared::time::Timestamp,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathVertex {
    pub label: Arc<str>,
    pub state: State,
}

/// One hop of a [`Path`], always oriented in the direction of travel.
#[derive(Debug, Clone, Serialize)]
pub struct PathEdge {
    pub from: Arc<str>,
    pub to: Arc<str>,
    pub payload: Arc<EdgePayload>,
    pub geometry: Option<Arc<str>>,
}

impl PathEdge {
    pub fn edge_type(&self) -> EdgeType {
        self.payload.edge_type()
    }
}

/// A route from origin to destination, `edges.len() == vertices.len() - 1`.
#[derive(Debug, Clone, Serialize)]
pub struct Path {
    pub direction: Direction,
    pub vertices: Vec<PathVertex>,
    pub edges: Vec<PathEdge>,
}

impl Path {
    pub fn origin(&self) -> Option<&PathVertex> {
        self.vertices.first()
    }

    pub fn destination(&self) -> Option<&PathVertex> {
        self.vertices.last()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.vertices.iter().map(|vertex| vertex.label.as_ref()).collect()
    }

    pub fn edge_types(&self) -> Vec<EdgeType> {
        self.edges.iter().map(PathEdge::edge_type).collect()
    }

    /// Accumulated weight, read from the vertex furthest from the search root.
    pub fn weight(&self) -> f64 {
        let end = match self.direction {
            Direction::Forward => self.vertices.last(),
            Direction::Retrograde => self.vertices.first(),
        };
        end.map(|vertex| vertex.state.weight).unwrap_or(0.0)
    }

    pub fn departure(&self) -> Option<Timestamp> {
        self.origin().map(|vertex| vertex.state.time)
    }

    pub fn arrival(&self) -> Option<Timestamp> {
        self.destination().map(|vertex| vertex.state.time)
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, vertex) in self.vertices.iter().enumerate() {
            if i > 0 {
                writeln!(f, "  via {}", self.edges[i - 1].payload)?;
            }
            writeln!(f, "{} [{}]", vertex.label, vertex.state)?;
        }
        Ok(())
    }
}

/// Walks parent edges from `label` back to the tree root.
///
/// A forward tree yields the vertices destination first, so the result is
/// reversed. A retrograde tree is rooted at the destination and yields them
/// origin first already; only its edges need flipping into travel order.
pub fn backtrack(tree: &ShortestPathTree, from: &str, to: &str) -> Result<Path, router::Error> {
    let direction = tree.direction();
    let start = if direction.is_forward() { to } else { from };
    let graph = tree.graph();
    let Some(mut current) = graph.get_vertex(start).map(|vertex| vertex.index) else {
        return Err(router::Error::PathNotFound {
            from: from.to_string(),
            to: to.to_string(),
        });
    };

    let mut vertices: Vec<VertexIdx> = vec![current];
    let mut edges = Vec::new();
    while let Some(edge) = tree.parent_of(current) {
        trace!(
            "Backtracking {} -> {} via {}",
            graph.label(edge.to),
            graph.label(edge.from),
            edge.payload
        );
        edges.push(edge);
        current = edge.from;
        vertices.push(current);
    }
    if direction.is_forward() {
        vertices.reverse();
        edges.reverse();
    }

    let vertices = vertices
        .into_iter()
        .filter_map(|index| {
            let vertex = graph.vertex(index);
            Some(PathVertex {
                label: vertex.label.clone(),
                state: vertex.payload()?.clone(),
            })
        })
        .collect();
    let edges = edges
        .into_iter()
        .map(|edge| {
            let (from, to) = match direction {
                Direction::Forward => (edge.from, edge.to),
                Direction::Retrograde => (edge.to, edge.from),
            };
            PathEdge {
                from: graph.label(from).clone(),
                to: graph.label(to).clone(),
                payload: edge.payload.clone(),
                geometry: edge.geometry.clone(),
            }
        })
        .collect();

    Ok(Path {
        direction,
        vertices,
        edges,
    })
}
