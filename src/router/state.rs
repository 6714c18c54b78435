use std::{fmt::Display, sync::Arc};

use serde::Serialize;

use crate::{
    calendar::CalendarDay,
    shared::time::{Duration, Timestamp},
};

/// Name recorded in [`State::prev_edge_name`] after crossing a link.
pub const LINK_NAME: &str = "LINK";

/// Which way a search moves through time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    /// Depart no earlier than the initial state and move along outgoing edges.
    #[default]
    Forward,
    /// Arrive no later than the final state and move backwards along incoming edges.
    Retrograde,
}

impl Direction {
    pub fn is_forward(&self) -> bool {
        matches!(self, Direction::Forward)
    }

    pub fn reverse(&self) -> Self {
        match self {
            Direction::Forward => Direction::Retrograde,
            Direction::Retrograde => Direction::Forward,
        }
    }
}

impl From<bool> for Direction {
    fn from(forward: bool) -> Self {
        if forward {
            Direction::Forward
        } else {
            Direction::Retrograde
        }
    }
}

/// Kind of the last edge a state crossed. The discriminants are stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum EdgeType {
    Street = 0,
    TripHop = 2,
    Link = 3,
    #[default]
    Initial = 5,
}

impl Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeType::Street => f.write_str("Street"),
            EdgeType::TripHop => f.write_str("TripHop"),
            EdgeType::Link => f.write_str("Link"),
            EdgeType::Initial => f.write_str("Initial"),
        }
    }
}

/// Progress of a traversal. Every walk returns a fresh state and never touches its input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct State {
    pub time: Timestamp,
    pub weight: f64,
    pub dist_walked: f64,
    pub num_transfers: u32,
    pub prev_edge_name: Option<Arc<str>>,
    pub prev_edge_type: EdgeType,
    pub calendar_day: Option<Arc<CalendarDay>>,
}

impl State {
    pub fn new(time: impl Into<Timestamp>) -> Self {
        Self {
            time: time.into(),
            weight: 0.0,
            dist_walked: 0.0,
            num_transfers: 0,
            prev_edge_name: None,
            prev_edge_type: EdgeType::Initial,
            calendar_day: None,
        }
    }

    pub fn now() -> Self {
        Self::new(Timestamp::now())
    }

    /// Moves the clock by `duration` in `direction`.
    pub(crate) fn shift_time(&self, duration: Duration, direction: Direction) -> Timestamp {
        match direction {
            Direction::Forward => self.time + duration,
            Direction::Retrograde => self.time - duration,
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "time={} weight={} dist_walked={} num_transfers={} prev_edge_type={}",
            self.time, self.weight, self.dist_walked, self.num_transfers, self.prev_edge_type
        )?;
        if let Some(name) = &self.prev_edge_name {
            write!(f, " prev_edge_name={name}")?;
        }
        if let Some(day) = &self.calendar_day {
            write!(f, " calendar_day=({day})")?;
        }
        Ok(())
    }
}
