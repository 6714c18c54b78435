use std::sync::Arc;

use crate::{graph::VertexIdx, payload::EdgePayload};

/// Position of an edge inside its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeIdx(u32);

impl EdgeIdx {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A directed arc. Immutable once added; the payload is shared with every
/// shortest path tree that routes over it.
#[derive(Debug, Clone)]
pub struct Edge {
    pub index: EdgeIdx,
    pub from: VertexIdx,
    pub to: VertexIdx,
    pub payload: Arc<EdgePayload>,
    pub geometry: Option<Arc<str>>,
}
