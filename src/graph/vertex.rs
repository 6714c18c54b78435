use std::{fmt::Display, sync::Arc};

use crate::graph::EdgeIdx;

/// Position of a vertex inside its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexIdx(u32);

impl VertexIdx {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct Vertex<T = ()> {
    pub index: VertexIdx,
    pub label: Arc<str>,
    pub(crate) outgoing: Vec<EdgeIdx>,
    pub(crate) incoming: Vec<EdgeIdx>,
    payload: Option<T>,
}

impl<T> Vertex<T> {
    pub(crate) fn new(index: VertexIdx, label: Arc<str>, payload: Option<T>) -> Self {
        Self {
            index,
            label,
            outgoing: Vec::new(),
            incoming: Vec::new(),
            payload,
        }
    }

    pub fn degree_out(&self) -> usize {
        self.outgoing.len()
    }

    pub fn degree_in(&self) -> usize {
        self.incoming.len()
    }

    pub fn outgoing(&self) -> &[EdgeIdx] {
        &self.outgoing
    }

    pub fn incoming(&self) -> &[EdgeIdx] {
        &self.incoming
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }
}

impl<T> Display for Vertex<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Vertex(label={}, degree_in={}, degree_out={})",
            self.label,
            self.degree_in(),
            self.degree_out()
        )
    }
}
