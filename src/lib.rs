//! Time-dependent multimodal routing over a labelled graph.
//!
//! A [`Graph`](graph::Graph) stitches street segments, scheduled transit hops
//! and free link edges together. The [`router`] answers earliest-arrival
//! (forward) and latest-departure (retrograde) queries by growing a shortest
//! path tree over it.

pub mod calendar;
pub mod graph;
pub mod payload;
pub mod router;
pub mod shared;

pub mod prelude {
    pub use crate::calendar::{Calendar, CalendarDay, ServiceId};
    pub use crate::graph::{Edge, EdgeIdx, Graph, Vertex, VertexIdx};
    pub use crate::payload::{EdgePayload, Link, Street, TripHop, TripHopSchedule, Walkable};
    pub use crate::router::{
        Allocator, Direction, EdgeType, Path, PathEdge, PathVertex, Query, Router, SearchOptions,
        ShortestPathTree, State, TargetPolicy,
    };
    pub use crate::shared::time::{Duration, ServiceTime, Timestamp};
}
