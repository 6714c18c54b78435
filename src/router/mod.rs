mod allocator;
mod config;
pub mod path;
mod state;
mod tree;

pub use allocator::*;
pub use config::*;
pub use path::{Path, PathEdge, PathVertex};
pub use state::*;
pub use tree::*;

use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    graph::{self, Graph, VertexIdx},
    payload::Walkable,
    shared::time::Timestamp,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Vertex {0} does not exist")]
    UnknownVertex(String),
    #[error("No path from {from} to {to}")]
    PathNotFound { from: String, to: String },
    #[error("Search gave up after settling {settled} vertices")]
    SearchAborted { settled: usize },
}

impl From<graph::Error> for Error {
    fn from(value: graph::Error) -> Self {
        match value {
            graph::Error::UnknownVertex(label) => Self::UnknownVertex(label),
        }
    }
}

/// A single search over a [`Graph`].
///
/// A forward search starts at `from` with the initial state and follows
/// outgoing edges. A retrograde search starts at `to` with the final state
/// and follows incoming edges, walking every payload backwards in time.
pub struct Router<'a, T = ()> {
    graph: &'a Graph<T>,
    from: Arc<str>,
    to: Arc<str>,
    state: State,
    direction: Direction,
    options: SearchOptions,
}

impl<'a, T> Router<'a, T> {
    pub fn new(graph: &'a Graph<T>, from: impl Into<Arc<str>>, to: impl Into<Arc<str>>) -> Self {
        Self {
            graph,
            from: from.into(),
            to: to.into(),
            state: State::now(),
            direction: Direction::Forward,
            options: SearchOptions::default(),
        }
    }

    /// Forward search leaving `from` at `departure`.
    pub fn departure_at(mut self, departure: impl Into<Timestamp>) -> Self {
        self.state = State::new(departure);
        self.direction = Direction::Forward;
        self
    }

    /// Retrograde search reaching `to` by `arrival`.
    pub fn arrival_by(mut self, arrival: impl Into<Timestamp>) -> Self {
        self.state = State::new(arrival);
        self.direction = Direction::Retrograde;
        self
    }

    /// Seeds the search with a custom state. It becomes the root's state as is.
    pub fn with_state(mut self, state: State) -> Self {
        self.state = state;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn tree(self) -> Result<ShortestPathTree, self::Error> {
        let mut allocator = Allocator::new(self.graph);
        self.tree_with_allocator(&mut allocator)
    }

    pub fn tree_with_allocator(
        self,
        allocator: &mut Allocator,
    ) -> Result<ShortestPathTree, self::Error> {
        self.explore(allocator)?;
        Ok(ShortestPathTree::build(self.graph, allocator, self.direction))
    }

    pub fn solve(self) -> Result<Path, self::Error> {
        let mut allocator = Allocator::new(self.graph);
        self.solve_with_allocator(&mut allocator)
    }

    /// Runs the search and extracts the origin to destination path.
    pub fn solve_with_allocator(self, allocator: &mut Allocator) -> Result<Path, self::Error> {
        let target = self.explore(allocator)?;
        if allocator.best[target.index()].is_none() {
            return Err(self::Error::PathNotFound {
                from: self.from.to_string(),
                to: self.to.to_string(),
            });
        }
        let tree = ShortestPathTree::build(self.graph, allocator, self.direction);
        path::backtrack(&tree, &self.from, &self.to)
    }

    /// Label-setting search from the root. Returns the target vertex; the
    /// allocator holds the best states and parents when it is done.
    fn explore(&self, allocator: &mut Allocator) -> Result<VertexIdx, self::Error> {
        let from = self.graph.index_of(&self.from)?;
        let to = self.graph.index_of(&self.to)?;
        let (root, target) = match self.direction {
            Direction::Forward => (from, to),
            Direction::Retrograde => (to, from),
        };
        debug!(
            "Searching {} from {} towards {} at {}",
            if self.direction.is_forward() {
                "forward"
            } else {
                "backward"
            },
            self.graph.label(root),
            self.graph.label(target),
            self.state.time
        );

        allocator.prepare(self.graph.size());
        allocator.seed(root, self.state.clone());

        let mut settled = 0;
        while let Some(vertex) = allocator.pop() {
            settled += 1;
            if vertex == target && self.options.target_policy == TargetPolicy::StopAtTarget {
                debug!("Reached {} after settling {settled} vertices", self.graph.label(target));
                return Ok(target);
            }
            if let Some(max_settled) = self.options.max_settled
                && settled >= max_settled
            {
                if allocator.is_settled(target) {
                    debug!("Budget spent after settling {settled} vertices, target already reached");
                    return Ok(target);
                }
                debug!("Giving up after settling {settled} vertices");
                return Err(self::Error::SearchAborted { settled });
            }

            let Some(state) = allocator.best[vertex.index()].clone() else {
                continue;
            };
            trace!("Settled {} with {state}", self.graph.label(vertex));

            let node = self.graph.vertex(vertex);
            let edges = match self.direction {
                Direction::Forward => node.outgoing(),
                Direction::Retrograde => node.incoming(),
            };
            for index in edges {
                let edge = self.graph.edge(*index);
                let next = match self.direction {
                    Direction::Forward => edge.to,
                    Direction::Retrograde => edge.from,
                };
                if allocator.is_settled(next) {
                    continue;
                }
                let Some(candidate) = edge.payload.walk(&state, self.direction) else {
                    continue;
                };
                allocator.relax(
                    next,
                    candidate,
                    Parent {
                        edge: *index,
                        via: vertex,
                    },
                );
            }
        }
        debug!("Queue exhausted after settling {settled} vertices");
        Ok(target)
    }
}

/// One entry of a batch search.
#[derive(Debug, Clone)]
pub struct Query {
    pub from: Arc<str>,
    pub to: Arc<str>,
    pub state: State,
    pub direction: Direction,
}

impl Query {
    pub fn depart_at(from: &str, to: &str, departure: impl Into<Timestamp>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            state: State::new(departure),
            direction: Direction::Forward,
        }
    }

    pub fn arrive_by(from: &str, to: &str, arrival: impl Into<Timestamp>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            state: State::new(arrival),
            direction: Direction::Retrograde,
        }
    }
}

impl<T> Graph<T> {
    pub fn router(&self, from: &str, to: &str) -> Router<'_, T> {
        Router::new(self, from, to)
    }

    /// Searches from `from` (forward) or `to` (retrograde) and stops once
    /// the other endpoint is settled or nothing else is reachable.
    pub fn shortest_path_tree(
        &self,
        from: &str,
        to: &str,
        state: State,
        direction: Direction,
    ) -> Result<ShortestPathTree, self::Error> {
        self.router(from, to)
            .with_state(state)
            .with_direction(direction)
            .tree()
    }

    /// Cheapest path leaving `from` with `initial`.
    pub fn shortest_path(
        &self,
        from: &str,
        to: &str,
        initial: State,
    ) -> Result<Path, self::Error> {
        self.router(from, to).with_state(initial).solve()
    }

    /// Cheapest path reaching `to` with `final_state`, still ordered origin first.
    pub fn shortest_path_retro(
        &self,
        from: &str,
        to: &str,
        final_state: State,
    ) -> Result<Path, self::Error> {
        self.router(from, to)
            .with_state(final_state)
            .with_direction(Direction::Retrograde)
            .solve()
    }
}

impl<T: Sync> Graph<T> {
    /// Runs every query on the rayon pool, one allocator per worker.
    pub fn shortest_paths(&self, queries: &[Query]) -> Vec<Result<Path, self::Error>> {
        self.shortest_paths_with(queries, &SearchOptions::default())
    }

    pub fn shortest_paths_with(
        &self,
        queries: &[Query],
        options: &SearchOptions,
    ) -> Vec<Result<Path, self::Error>> {
        debug!("Solving {} queries", queries.len());
        queries
            .par_iter()
            .map_init(
                || Allocator::new(self),
                |allocator, query| {
                    Router::new(self, query.from.clone(), query.to.clone())
                        .with_state(query.state.clone())
                        .with_direction(query.direction)
                        .with_options(options.clone())
                        .solve_with_allocator(allocator)
                },
            )
            .collect()
    }
}
