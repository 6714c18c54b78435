use std::{cmp::Ordering, collections::BinaryHeap};

use bitvec::prelude::*;

use crate::{
    graph::{EdgeIdx, Graph, VertexIdx},
    router::State,
};

/// How a vertex was first reached with its current best state.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Parent {
    pub edge: EdgeIdx,
    /// The settled vertex whose relaxation produced the state.
    pub via: VertexIdx,
}

/// Priority queue entry. Lower weight pops first; equal weights pop in push order.
#[derive(Debug)]
pub(crate) struct Entry {
    pub weight: f64,
    pub sequence: u64,
    pub vertex: VertexIdx,
}

impl Eq for Entry {}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reusable buffers for the shortest path search.
///
/// Every query needs a queue plus per-vertex best states and predecessors.
/// Keeping one allocator per worker avoids reallocating them for each query
/// on a long-lived graph.
pub struct Allocator {
    /// Best known state per vertex.
    pub(crate) best: Vec<Option<State>>,
    /// Predecessor edge per vertex, matching `best`.
    pub(crate) parents: Vec<Option<Parent>>,
    /// Vertices whose state is final.
    pub(crate) settled: BitVec<usize, Lsb0>,
    /// Vertices in the order they first received a state. The root comes first.
    pub(crate) discovered: Vec<VertexIdx>,
    pub(crate) heap: BinaryHeap<Entry>,
    sequence: u64,
}

impl Allocator {
    /// Creates an allocator sized for `graph`. It grows on demand when used on a larger one.
    pub fn new<T>(graph: &Graph<T>) -> Self {
        let vertex_count = graph.size();
        Self {
            best: vec![None; vertex_count],
            parents: vec![None; vertex_count],
            settled: bitvec!(usize, Lsb0; 0; vertex_count),
            discovered: Vec::with_capacity(64),
            heap: BinaryHeap::with_capacity(64),
            sequence: 0,
        }
    }

    /// Clears every buffer while keeping its memory.
    pub fn reset(&mut self) {
        self.best.fill(None);
        self.parents.fill(None);
        self.settled.fill(false);
        self.discovered.clear();
        self.heap.clear();
        self.sequence = 0;
    }

    /// Resets and resizes the buffers for a graph with `vertex_count` vertices.
    pub(crate) fn prepare(&mut self, vertex_count: usize) {
        self.reset();
        self.best.resize(vertex_count, None);
        self.parents.resize(vertex_count, None);
        self.settled.resize(vertex_count, false);
    }

    pub(crate) fn seed(&mut self, root: VertexIdx, state: State) {
        self.discovered.push(root);
        self.push(root, state.weight);
        self.best[root.index()] = Some(state);
    }

    pub(crate) fn pop(&mut self) -> Option<VertexIdx> {
        while let Some(entry) = self.heap.pop() {
            if !self.settled[entry.vertex.index()] {
                self.settled.set(entry.vertex.index(), true);
                return Some(entry.vertex);
            }
        }
        None
    }

    pub(crate) fn is_settled(&self, vertex: VertexIdx) -> bool {
        self.settled[vertex.index()]
    }

    /// Stores `state` for `vertex` if it beats the best known one.
    pub(crate) fn relax(&mut self, vertex: VertexIdx, state: State, parent: Parent) -> bool {
        match &self.best[vertex.index()] {
            Some(best) if best.weight <= state.weight => return false,
            Some(_) => {}
            None => self.discovered.push(vertex),
        }
        let weight = state.weight;
        self.best[vertex.index()] = Some(state);
        self.parents[vertex.index()] = Some(parent);
        self.push(vertex, weight);
        true
    }

    fn push(&mut self, vertex: VertexIdx, weight: f64) {
        self.heap.push(Entry {
            weight,
            sequence: self.sequence,
            vertex,
        });
        self.sequence += 1;
    }
}

#[test]
fn entry_order_test() {
    let mut heap = BinaryHeap::new();
    heap.push(Entry {
        weight: 2.0,
        sequence: 0,
        vertex: VertexIdx::new(0),
    });
    heap.push(Entry {
        weight: 1.0,
        sequence: 1,
        vertex: VertexIdx::new(1),
    });
    heap.push(Entry {
        weight: 1.0,
        sequence: 2,
        vertex: VertexIdx::new(2),
    });
    let order: Vec<_> = std::iter::from_fn(|| heap.pop())
        .map(|entry| entry.vertex.index())
        .collect();
    assert_eq!(order, vec![1, 2, 0]);
}
