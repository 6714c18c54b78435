use std::{fmt::Display, sync::Arc};

use serde::Serialize;

use crate::{
    payload::Walkable,
    router::{Direction, EdgeType, State},
    shared::time::Duration,
};

/// A street segment. Its length doubles as weight and as seconds of travel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Street {
    name: Arc<str>,
    length: f64,
}

impl Street {
    /// # Panics
    /// When `length` is negative or not finite; the search relies on non-negative weights.
    pub fn new(name: &str, length: f64) -> Self {
        assert!(
            length.is_finite() && length >= 0.0,
            "street {name} has invalid length {length}"
        );
        Self {
            name: name.into(),
            length,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    fn travel_time(&self) -> Duration {
        Duration::from_seconds(self.length.ceil() as i64)
    }
}

impl Walkable for Street {
    fn walk(&self, state: &State, direction: Direction) -> Option<State> {
        Some(State {
            time: state.shift_time(self.travel_time(), direction),
            weight: state.weight + self.length,
            dist_walked: state.dist_walked + self.length,
            num_transfers: state.num_transfers,
            prev_edge_name: Some(self.name.clone()),
            prev_edge_type: EdgeType::Street,
            calendar_day: state.calendar_day.clone(),
        })
    }

    fn weight(&self, _state: &State, _direction: Direction) -> f64 {
        self.length
    }
}

impl Display for Street {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Street({}, {})", self.name, self.length)
    }
}
