use crate::{
    graph::{Edge, EdgeIdx, Graph, Vertex, VertexIdx},
    router::{Allocator, Direction, State},
};

/// Result of a single shortest path search.
///
/// Every vertex the search reached is copied in, carrying its best [`State`]
/// as payload. Each non-root vertex has exactly one incoming tree edge that
/// points from the vertex it was relaxed from, so in a retrograde tree the
/// edges run against the direction of travel. Tree edges share their payload
/// with the source graph.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    graph: Graph<State>,
    root: VertexIdx,
    direction: Direction,
    parents: Vec<Option<EdgeIdx>>,
}

impl ShortestPathTree {
    pub(crate) fn build<T>(
        source: &Graph<T>,
        allocator: &Allocator,
        direction: Direction,
    ) -> Self {
        let mut graph = Graph::with_capacity(
            allocator.discovered.len(),
            allocator.discovered.len().saturating_sub(1),
        );
        let mut mapping: Vec<Option<VertexIdx>> = vec![None; source.size()];
        for vertex in allocator.discovered.iter() {
            if let Some(state) = &allocator.best[vertex.index()] {
                let index = graph.insert_vertex(source.label(*vertex), Some(state.clone()));
                mapping[vertex.index()] = Some(index);
            }
        }

        let mut parents = vec![None; graph.size()];
        for vertex in allocator.discovered.iter() {
            if let Some(child) = mapping[vertex.index()]
                && let Some(parent) = allocator.parents[vertex.index()]
                && let Some(via) = mapping[parent.via.index()]
            {
                let edge = source.edge(parent.edge);
                let index = graph.push_edge(via, child, edge.payload.clone(), edge.geometry.clone());
                parents[child.index()] = Some(index);
            }
        }

        Self {
            graph,
            // The root is always discovered first.
            root: VertexIdx::new(0),
            direction,
            parents,
        }
    }

    /// The tree as a plain graph, with the settled state on every vertex.
    pub fn graph(&self) -> &Graph<State> {
        &self.graph
    }

    /// The origin of a forward search or the destination of a retrograde one.
    pub fn root(&self) -> &Vertex<State> {
        self.graph.vertex(self.root)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn get_vertex(&self, label: &str) -> Option<&Vertex<State>> {
        self.graph.get_vertex(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.graph.get_vertex(label).is_some()
    }

    pub fn state(&self, label: &str) -> Option<&State> {
        self.graph.get_vertex(label)?.payload()
    }

    /// The tree edge leading into `label`, `None` for the root or unknown labels.
    pub fn parent(&self, label: &str) -> Option<&Edge> {
        let vertex = self.graph.get_vertex(label)?;
        self.parent_of(vertex.index)
    }

    pub fn parent_of(&self, vertex: VertexIdx) -> Option<&Edge> {
        let index = self.parents.get(vertex.index())?.as_ref()?;
        Some(self.graph.edge(*index))
    }

    /// Number of vertices reached.
    pub fn len(&self) -> usize {
        self.graph.size()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }
}
