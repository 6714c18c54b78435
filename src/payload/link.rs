use std::{fmt::Display, sync::Arc};

use serde::Serialize;

use crate::{
    payload::Walkable,
    router::{Direction, EdgeType, LINK_NAME, State},
};

/// Zero-cost connector between two vertices at the same place, e.g. a street
/// corner and the bus stop standing on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Link;

impl Link {
    pub fn new() -> Self {
        Self
    }
}

impl Walkable for Link {
    fn walk(&self, state: &State, _direction: Direction) -> Option<State> {
        Some(State {
            prev_edge_name: Some(Arc::from(LINK_NAME)),
            prev_edge_type: EdgeType::Link,
            ..state.clone()
        })
    }

    fn weight(&self, _state: &State, _direction: Direction) -> f64 {
        0.0
    }
}

impl Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Link")
    }
}
