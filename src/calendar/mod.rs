use std::{fmt::Display, sync::Arc};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::shared::time::{Duration, ServiceTime, Timestamp};

/// Integer tag for a group of days that share the same timetable ("weekday", "saturday", ...).
pub type ServiceId = i32;

/// Upper bound on how many day-spans a single schedule lookup may inspect.
/// One year of daily spans.
pub const DEFAULT_SCAN_LIMIT: usize = 366;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Day span must end after it begins ({begin_time} .. {end_time})")]
    EmptyDay {
        begin_time: Timestamp,
        end_time: Timestamp,
    },
    #[error("Day span starting at {begin_time} overlaps the previous span ending at {previous_end}")]
    OverlappingDay {
        begin_time: Timestamp,
        previous_end: Timestamp,
    },
    #[error("Date {0} can not be represented as a day span")]
    InvalidDate(NaiveDate),
}

/// One contiguous span of time and the services that run during it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    /// Position of the span inside its calendar.
    pub index: usize,
    pub begin_time: Timestamp,
    /// Exclusive.
    pub end_time: Timestamp,
    pub service_ids: Box<[ServiceId]>,
    pub daylight_savings: Duration,
}

impl CalendarDay {
    pub fn contains(&self, time: Timestamp) -> bool {
        self.begin_time <= time && time < self.end_time
    }

    pub fn has_service_id(&self, service_id: ServiceId) -> bool {
        self.service_ids.contains(&service_id)
    }
}

impl Display for CalendarDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{} service_ids=[", self.begin_time, self.end_time)?;
        for (i, service_id) in self.service_ids.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{service_id}")?;
        }
        f.write_str("]")
    }
}

/// A sorted run of non-overlapping day-spans.
///
/// Days are shared behind `Arc` so a [`State`](crate::router::State) can keep a
/// handle to the day it was resolved against without borrowing the calendar.
#[derive(Debug, Clone)]
pub struct Calendar {
    days: Vec<Arc<CalendarDay>>,
    scan_limit: usize,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            days: Vec::new(),
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }
}

impl Calendar {
    pub fn new() -> Self {
        Default::default()
    }

    /// Caps how many day-spans a schedule walk may step through before giving up.
    pub fn with_scan_limit(mut self, scan_limit: usize) -> Self {
        self.scan_limit = scan_limit.max(1);
        self
    }

    pub fn scan_limit(&self) -> usize {
        self.scan_limit
    }

    /// Appends a day-span. Spans must be added in increasing time order and may not overlap.
    pub fn append_day(
        &mut self,
        begin_time: impl Into<Timestamp>,
        end_time: impl Into<Timestamp>,
        service_ids: impl Into<Box<[ServiceId]>>,
        daylight_savings: impl Into<Duration>,
    ) -> Result<&Arc<CalendarDay>, self::Error> {
        let begin_time = begin_time.into();
        let end_time = end_time.into();
        if end_time <= begin_time {
            return Err(self::Error::EmptyDay {
                begin_time,
                end_time,
            });
        }
        if let Some(previous) = self.days.last()
            && begin_time < previous.end_time
        {
            return Err(self::Error::OverlappingDay {
                begin_time,
                previous_end: previous.end_time,
            });
        }

        let index = self.days.len();
        self.days.push(Arc::new(CalendarDay {
            index,
            begin_time,
            end_time,
            service_ids: service_ids.into(),
            daylight_savings: daylight_savings.into(),
        }));
        Ok(&self.days[index])
    }

    /// Appends the service day `date` whose local clock runs `utc_offset` ahead of UTC.
    /// `start` and `end` are service-local bounds, so `end` may pass 24:00:00.
    pub fn append_date(
        &mut self,
        date: NaiveDate,
        utc_offset: Duration,
        start: ServiceTime,
        end: ServiceTime,
        service_ids: impl Into<Box<[ServiceId]>>,
        daylight_savings: Duration,
    ) -> Result<&Arc<CalendarDay>, self::Error> {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or(self::Error::InvalidDate(date))?
            .and_utc()
            .timestamp();
        let local_midnight =
            Timestamp::from_seconds(midnight) - utc_offset - daylight_savings;
        let begin_time = local_midnight + Duration::from_seconds(start.as_seconds() as i64);
        let end_time = local_midnight + Duration::from_seconds(end.as_seconds() as i64);
        self.append_day(begin_time, end_time, service_ids, daylight_savings)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn days(&self) -> impl Iterator<Item = &Arc<CalendarDay>> {
        self.days.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<CalendarDay>> {
        self.days.get(index)
    }

    /// The first day-span, where every fresh forward scan starts.
    pub fn rewind(&self) -> Option<&Arc<CalendarDay>> {
        self.days.first()
    }

    /// The last day-span, where every fresh backward scan starts.
    pub fn fast_forward(&self) -> Option<&Arc<CalendarDay>> {
        self.days.last()
    }

    pub fn next_day(&self, day: &CalendarDay) -> Option<&Arc<CalendarDay>> {
        self.days.get(day.index + 1)
    }

    pub fn prev_day(&self, day: &CalendarDay) -> Option<&Arc<CalendarDay>> {
        day.index.checked_sub(1).and_then(|index| self.days.get(index))
    }

    /// True when `day` is one of this calendar's own spans.
    pub fn owns(&self, day: &Arc<CalendarDay>) -> bool {
        self.days
            .get(day.index)
            .is_some_and(|own| Arc::ptr_eq(own, day))
    }

    /// The span containing `time`.
    pub fn day_of(&self, time: Timestamp) -> Option<&Arc<CalendarDay>> {
        self.day_of_or_after(time).filter(|day| day.contains(time))
    }

    /// The span containing `time`, or failing that the first span that starts after it.
    pub fn day_of_or_after(&self, time: Timestamp) -> Option<&Arc<CalendarDay>> {
        let index = self.days.partition_point(|day| day.end_time <= time);
        self.days.get(index)
    }

    /// The span containing `time`, or failing that the last span that ended before it.
    pub fn day_of_or_before(&self, time: Timestamp) -> Option<&Arc<CalendarDay>> {
        let index = self.days.partition_point(|day| day.begin_time <= time);
        index.checked_sub(1).and_then(|index| self.days.get(index))
    }
}
