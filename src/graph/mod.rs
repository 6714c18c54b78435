use std::{collections::HashMap, sync::Arc};

use thiserror::Error;

mod edge;
mod vertex;
pub use edge::*;
pub use vertex::*;

use crate::payload::EdgePayload;

type LabelToIndex = HashMap<Arc<str>, VertexIdx>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Vertex {0} does not exist")]
    UnknownVertex(String),
}

/// Owns every vertex and edge. `T` is the optional per-vertex payload: loader
/// metadata in a street or transit graph, the settled [`State`](crate::router::State)
/// in a shortest path tree.
#[derive(Debug, Clone)]
pub struct Graph<T = ()> {
    vertices: Vec<Vertex<T>>,
    edges: Vec<Edge>,
    lookup: LabelToIndex,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            lookup: HashMap::new(),
        }
    }
}

impl<T> Graph<T> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            edges: Vec::with_capacity(edges),
            lookup: HashMap::with_capacity(vertices),
        }
    }

    /// Adds a vertex, or returns the existing one when `label` is taken.
    pub fn add_vertex(&mut self, label: &str) -> &Vertex<T> {
        let index = self.insert_vertex(label, None);
        &self.vertices[index.index()]
    }

    /// Like [`Graph::add_vertex`]; `payload` is dropped when the label already exists.
    pub fn add_vertex_with(&mut self, label: &str, payload: T) -> &Vertex<T> {
        let index = self.insert_vertex(label, Some(payload));
        &self.vertices[index.index()]
    }

    pub(crate) fn insert_vertex(&mut self, label: &str, payload: Option<T>) -> VertexIdx {
        if let Some(index) = self.lookup.get(label) {
            return *index;
        }
        let index = VertexIdx::new(self.vertices.len());
        let label: Arc<str> = label.into();
        self.lookup.insert(label.clone(), index);
        self.vertices.push(Vertex::new(index, label, payload));
        index
    }

    pub fn add_edge(
        &mut self,
        from: &str,
        to: &str,
        payload: impl Into<EdgePayload>,
    ) -> Result<&Edge, self::Error> {
        self.connect(from, to, Arc::new(payload.into()), None)
    }

    /// Adds an edge carrying a geometry string. The graph never looks inside it.
    pub fn add_edge_with_geometry(
        &mut self,
        from: &str,
        to: &str,
        payload: impl Into<EdgePayload>,
        geometry: &str,
    ) -> Result<&Edge, self::Error> {
        self.connect(from, to, Arc::new(payload.into()), Some(geometry.into()))
    }

    fn connect(
        &mut self,
        from: &str,
        to: &str,
        payload: Arc<EdgePayload>,
        geometry: Option<Arc<str>>,
    ) -> Result<&Edge, self::Error> {
        let from = self.index_of(from)?;
        let to = self.index_of(to)?;
        let index = self.push_edge(from, to, payload, geometry);
        Ok(&self.edges[index.index()])
    }

    /// Appends an edge between two known vertices, sharing `payload` with any other graph.
    pub(crate) fn push_edge(
        &mut self,
        from: VertexIdx,
        to: VertexIdx,
        payload: Arc<EdgePayload>,
        geometry: Option<Arc<str>>,
    ) -> EdgeIdx {
        let index = EdgeIdx::new(self.edges.len());
        self.edges.push(Edge {
            index,
            from,
            to,
            payload,
            geometry,
        });
        self.vertices[from.index()].outgoing.push(index);
        self.vertices[to.index()].incoming.push(index);
        index
    }

    pub fn index_of(&self, label: &str) -> Result<VertexIdx, self::Error> {
        self.lookup
            .get(label)
            .copied()
            .ok_or_else(|| self::Error::UnknownVertex(label.to_string()))
    }

    pub fn get_vertex(&self, label: &str) -> Option<&Vertex<T>> {
        let index = self.lookup.get(label)?;
        Some(&self.vertices[index.index()])
    }

    pub fn vertex(&self, index: VertexIdx) -> &Vertex<T> {
        &self.vertices[index.index()]
    }

    pub fn edge(&self, index: EdgeIdx) -> &Edge {
        &self.edges[index.index()]
    }

    /// All vertices in insertion order.
    pub fn vertices(&self) -> &[Vertex<T>] {
        &self.vertices
    }

    /// All edges, grouped by source vertex in vertex insertion order.
    pub fn edges(&self) -> Vec<&Edge> {
        self.vertices
            .iter()
            .flat_map(|vertex| vertex.outgoing.iter())
            .map(|index| self.edge(*index))
            .collect()
    }

    /// Number of vertices.
    pub fn size(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The `i`th outgoing edge of `vertex`, in insertion order.
    pub fn edge_out(&self, vertex: VertexIdx, i: usize) -> Option<&Edge> {
        let index = self.vertices[vertex.index()].outgoing.get(i)?;
        Some(self.edge(*index))
    }

    /// The `i`th incoming edge of `vertex`, in insertion order.
    pub fn edge_in(&self, vertex: VertexIdx, i: usize) -> Option<&Edge> {
        let index = self.vertices[vertex.index()].incoming.get(i)?;
        Some(self.edge(*index))
    }

    pub fn outgoing(&self, vertex: VertexIdx) -> impl Iterator<Item = &Edge> {
        self.vertices[vertex.index()]
            .outgoing
            .iter()
            .map(|index| self.edge(*index))
    }

    pub fn incoming(&self, vertex: VertexIdx) -> impl Iterator<Item = &Edge> {
        self.vertices[vertex.index()]
            .incoming
            .iter()
            .map(|index| self.edge(*index))
    }

    pub fn label(&self, vertex: VertexIdx) -> &Arc<str> {
        &self.vertices[vertex.index()].label
    }

    /// Graphviz rendering of the edge endpoints.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph G {\n");
        for edge in self.edges() {
            dot.push_str(&format!(
                "    \"{}\" -> \"{}\";\n",
                escape_dot(self.label(edge.from)),
                escape_dot(self.label(edge.to))
            ));
        }
        dot.push('}');
        dot
    }
}

/// Escapes a label for use inside a quoted DOT identifier.
fn escape_dot(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
