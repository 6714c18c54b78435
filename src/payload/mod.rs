use std::fmt::Display;

use serde::Serialize;
use thiserror::Error;

mod link;
mod schedule;
mod street;
pub use link::*;
pub use schedule::*;
pub use street::*;

use crate::router::{Direction, EdgeType, State};

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Trip {trip_id} arrives ({arrive}) before it departs ({depart})")]
    NegativeTransit {
        trip_id: String,
        depart: i32,
        arrive: i32,
    },
}

/// Traversal behaviour shared by every edge payload.
pub trait Walkable {
    /// The state after crossing the edge from `state`, or `None` when it can not be crossed.
    fn walk(&self, state: &State, direction: Direction) -> Option<State>;

    /// Weight added by crossing the edge from `state`. Infinite exactly when `walk` fails.
    fn weight(&self, state: &State, direction: Direction) -> f64 {
        self.walk(state, direction)
            .map(|next| next.weight - state.weight)
            .unwrap_or(f64::INFINITY)
    }
}

/// What an edge carries.
#[derive(Debug, Clone, Serialize)]
pub enum EdgePayload {
    Street(Street),
    Link(Link),
    TripHopSchedule(TripHopSchedule),
}

/// A payload reduced to the single piece that a walk would use.
#[derive(Debug, Clone, Copy)]
pub enum Collapsed<'a> {
    Street(&'a Street),
    Link(&'a Link),
    TripHop(&'a TripHop),
}

impl EdgePayload {
    /// The [`EdgeType`] a state records after crossing this payload.
    pub fn edge_type(&self) -> EdgeType {
        match self {
            EdgePayload::Street(_) => EdgeType::Street,
            EdgePayload::Link(_) => EdgeType::Link,
            EdgePayload::TripHopSchedule(_) => EdgeType::TripHop,
        }
    }

    /// Reports what crossing this edge from `state` would use without producing a new state.
    /// For a schedule that is the trip hop a walk would pick.
    pub fn collapse(&self, state: &State, direction: Direction) -> Option<Collapsed<'_>> {
        match self {
            EdgePayload::Street(street) => Some(Collapsed::Street(street)),
            EdgePayload::Link(link) => Some(Collapsed::Link(link)),
            EdgePayload::TripHopSchedule(schedule) => {
                schedule.collapse(state, direction).map(Collapsed::TripHop)
            }
        }
    }

    pub fn as_street(&self) -> Option<&Street> {
        match self {
            EdgePayload::Street(street) => Some(street),
            _ => None,
        }
    }

    pub fn as_schedule(&self) -> Option<&TripHopSchedule> {
        match self {
            EdgePayload::TripHopSchedule(schedule) => Some(schedule),
            _ => None,
        }
    }
}

impl Walkable for EdgePayload {
    fn walk(&self, state: &State, direction: Direction) -> Option<State> {
        match self {
            EdgePayload::Street(street) => street.walk(state, direction),
            EdgePayload::Link(link) => link.walk(state, direction),
            EdgePayload::TripHopSchedule(schedule) => schedule.walk(state, direction),
        }
    }

    fn weight(&self, state: &State, direction: Direction) -> f64 {
        match self {
            EdgePayload::Street(street) => street.weight(state, direction),
            EdgePayload::Link(link) => link.weight(state, direction),
            EdgePayload::TripHopSchedule(schedule) => schedule.weight(state, direction),
        }
    }
}

impl Display for EdgePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgePayload::Street(street) => street.fmt(f),
            EdgePayload::Link(link) => link.fmt(f),
            EdgePayload::TripHopSchedule(schedule) => schedule.fmt(f),
        }
    }
}

impl From<Street> for EdgePayload {
    fn from(value: Street) -> Self {
        Self::Street(value)
    }
}

impl From<Link> for EdgePayload {
    fn from(value: Link) -> Self {
        Self::Link(value)
    }
}

impl From<TripHopSchedule> for EdgePayload {
    fn from(value: TripHopSchedule) -> Self {
        Self::TripHopSchedule(value)
    }
}
