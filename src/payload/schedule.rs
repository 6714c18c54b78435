use std::{fmt::Display, sync::Arc};

use serde::Serialize;
use tracing::warn;

use crate::{
    calendar::{Calendar, CalendarDay, ServiceId},
    payload::{self, Walkable},
    router::{Direction, EdgeType, State},
    shared::time::{Duration, SECONDS_PER_DAY, ServiceTime, Timestamp},
};

/// One scheduled departure and arrival of a trip between two stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripHop {
    pub depart: ServiceTime,
    pub arrive: ServiceTime,
    pub trip_id: Arc<str>,
}

impl TripHop {
    pub fn new(depart: impl Into<ServiceTime>, arrive: impl Into<ServiceTime>, trip_id: &str) -> Self {
        Self {
            depart: depart.into(),
            arrive: arrive.into(),
            trip_id: trip_id.into(),
        }
    }

    /// Time spent on board.
    pub fn transit(&self) -> Duration {
        self.arrive - self.depart
    }
}

impl From<(i32, i32, &str)> for TripHop {
    fn from((depart, arrive, trip_id): (i32, i32, &str)) -> Self {
        Self::new(depart, arrive, trip_id)
    }
}

impl Display for TripHop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TripHop({} -> {}, transit={}, trip_id={})",
            self.depart,
            self.arrive,
            self.transit().as_seconds(),
            self.trip_id
        )
    }
}

/// Every hop between two stops that runs under one service id.
#[derive(Debug, Clone, Serialize)]
pub struct TripHopSchedule {
    service_id: ServiceId,
    /// Sorted by departure; ties keep their input order.
    hops: Box<[TripHop]>,
    /// Positions into `hops` sorted by arrival, ties by position.
    #[serde(skip)]
    by_arrival: Box<[usize]>,
    #[serde(skip)]
    calendar: Arc<Calendar>,
    timezone_offset: Duration,
    daylight_savings: Duration,
}

/// The hop a walk settles on and the day it runs on.
struct Selection<'a> {
    hop: &'a TripHop,
    day: &'a Arc<CalendarDay>,
    midnight: Timestamp,
}

impl TripHopSchedule {
    /// `timezone_offset` is how far the schedule's local clock runs ahead of UTC.
    pub fn new<H>(
        service_id: ServiceId,
        hops: impl IntoIterator<Item = H>,
        calendar: Arc<Calendar>,
        timezone_offset: impl Into<Duration>,
    ) -> Result<Self, payload::Error>
    where
        H: Into<TripHop>,
    {
        let mut hops: Vec<TripHop> = hops.into_iter().map(Into::into).collect();
        if let Some(hop) = hops.iter().find(|hop| hop.arrive < hop.depart) {
            return Err(payload::Error::NegativeTransit {
                trip_id: hop.trip_id.to_string(),
                depart: hop.depart.as_seconds(),
                arrive: hop.arrive.as_seconds(),
            });
        }
        hops.sort_by_key(|hop| hop.depart);

        let mut by_arrival: Vec<usize> = (0..hops.len()).collect();
        by_arrival.sort_by_key(|&i| hops[i].arrive);

        Ok(Self {
            service_id,
            hops: hops.into(),
            by_arrival: by_arrival.into(),
            calendar,
            timezone_offset: timezone_offset.into(),
            daylight_savings: Duration::default(),
        })
    }

    /// Extra offset added on top of each day's own daylight savings offset.
    pub fn with_daylight_savings(mut self, offset: impl Into<Duration>) -> Self {
        self.daylight_savings = offset.into();
        self
    }

    pub fn service_id(&self) -> ServiceId {
        self.service_id
    }

    pub fn triphops(&self) -> &[TripHop] {
        &self.hops
    }

    pub fn calendar(&self) -> &Arc<Calendar> {
        &self.calendar
    }

    pub fn timezone_offset(&self) -> Duration {
        self.timezone_offset
    }

    pub fn daylight_savings(&self) -> Duration {
        self.daylight_savings
    }

    /// The hop a walk from `state` would ride, without walking it.
    pub fn collapse(&self, state: &State, direction: Direction) -> Option<&TripHop> {
        self.select(state, direction).map(|selection| selection.hop)
    }

    fn utc_offset(&self, day: &CalendarDay) -> i64 {
        (self.timezone_offset + self.daylight_savings + day.daylight_savings).as_seconds()
    }

    /// Absolute time of the local midnight that opens `day`.
    fn local_midnight(&self, day: &CalendarDay) -> Timestamp {
        let offset = self.utc_offset(day);
        let local_begin = day.begin_time.as_seconds() + offset;
        Timestamp::from_seconds(local_begin.div_euclid(SECONDS_PER_DAY) * SECONDS_PER_DAY - offset)
    }

    fn resolve_day(&self, state: &State, direction: Direction) -> Option<&Arc<CalendarDay>> {
        if let Some(day) = &state.calendar_day
            && day.contains(state.time)
            && self.calendar.owns(day)
        {
            return self.calendar.get(day.index);
        }
        match direction {
            Direction::Forward => self.calendar.day_of_or_after(state.time),
            Direction::Retrograde => self.calendar.day_of_or_before(state.time),
        }
    }

    /// First hop departing at or after `local` seconds past midnight.
    fn next_departure(&self, local: i64) -> Option<&TripHop> {
        let index = self
            .hops
            .partition_point(|hop| (hop.depart.as_seconds() as i64) < local);
        self.hops.get(index)
    }

    /// Hop with the latest arrival at or before `local` seconds past midnight.
    fn last_arrival(&self, local: i64) -> Option<&TripHop> {
        let arrive_at = |i: usize| self.hops[self.by_arrival[i]].arrive.as_seconds() as i64;
        let end = self.by_arrival.partition_point(|&i| {
            (self.hops[i].arrive.as_seconds() as i64) <= local
        });
        let latest = arrive_at(end.checked_sub(1)?);
        // Equal arrivals resolve to the lowest position in departure order.
        let first = self
            .by_arrival
            .partition_point(|&i| (self.hops[i].arrive.as_seconds() as i64) < latest);
        self.hops.get(self.by_arrival[first])
    }

    fn select(&self, state: &State, direction: Direction) -> Option<Selection<'_>> {
        if self.hops.is_empty() {
            return None;
        }
        let mut day = self.resolve_day(state, direction)?;
        for _ in 0..self.calendar.scan_limit() {
            if day.has_service_id(self.service_id) {
                let midnight = self.local_midnight(day);
                let local = (state.time - midnight).as_seconds();
                let hop = match direction {
                    Direction::Forward => self.next_departure(local),
                    Direction::Retrograde => self.last_arrival(local),
                };
                if let Some(hop) = hop {
                    return Some(Selection { hop, day, midnight });
                }
            }
            day = match direction {
                Direction::Forward => self.calendar.next_day(day)?,
                Direction::Retrograde => self.calendar.prev_day(day)?,
            };
        }
        warn!(
            "Service {} not found within {} calendar days of {}",
            self.service_id,
            self.calendar.scan_limit(),
            state.time
        );
        None
    }
}

impl Walkable for TripHopSchedule {
    fn walk(&self, state: &State, direction: Direction) -> Option<State> {
        let Selection { hop, day, midnight } = self.select(state, direction)?;
        let clock = match direction {
            Direction::Forward => hop.arrive,
            Direction::Retrograde => hop.depart,
        };
        Some(State {
            time: midnight + Duration::from_seconds(clock.as_seconds() as i64),
            weight: state.weight + hop.transit().as_seconds() as f64,
            dist_walked: state.dist_walked,
            num_transfers: state.num_transfers + 1,
            prev_edge_name: Some(hop.trip_id.clone()),
            prev_edge_type: EdgeType::TripHop,
            calendar_day: Some(day.clone()),
        })
    }

    fn weight(&self, state: &State, direction: Direction) -> f64 {
        self.collapse(state, direction)
            .map(|hop| hop.transit().as_seconds() as f64)
            .unwrap_or(f64::INFINITY)
    }
}

impl Display for TripHopSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TripHopSchedule(service_id={}, n_trip_hops={})",
            self.service_id,
            self.hops.len()
        )
    }
}
