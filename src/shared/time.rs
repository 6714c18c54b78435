use std::{
    fmt::Display,
    ops::{Add, AddAssign, Sub, SubAssign},
};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Seconds in one service day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// An absolute point in time, in seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Timestamp(i64);

impl From<i64> for Timestamp {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<i32> for Timestamp {
    fn from(value: i32) -> Self {
        Self(value as i64)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.timestamp())
    }
}

impl Timestamp {
    pub fn now() -> Self {
        Utc::now().into()
    }

    pub const fn from_seconds(secs: i64) -> Self {
        Self(secs)
    }

    pub const fn as_seconds(&self) -> i64 {
        self.0
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(datetime) => write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S UTC")),
            None => write!(f, "@{}", self.0),
        }
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        Duration(self.0 - rhs.0)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign<Duration> for Timestamp {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign<Duration> for Timestamp {
    fn sub_assign(&mut self, rhs: Duration) {
        self.0 -= rhs.0
    }
}

/// A signed span of seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Duration(i64);

impl From<i64> for Duration {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<i32> for Duration {
    fn from(value: i32) -> Self {
        Self(value as i64)
    }
}

impl Duration {
    pub const fn from_seconds(secs: i64) -> Self {
        Self(secs)
    }

    pub const fn from_minutes(minutes: i64) -> Self {
        Self(minutes * 60)
    }

    pub const fn from_hours(hours: i64) -> Self {
        Self(hours * 60 * 60)
    }

    pub const fn from_days(days: i64) -> Self {
        Self(days * SECONDS_PER_DAY)
    }

    pub const fn as_seconds(&self) -> i64 {
        self.0
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

/// Seconds since local midnight of a service day, as written in a schedule.
/// Values past 24:00:00 are legal and describe trips that run over midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ServiceTime(i32);

impl From<i32> for ServiceTime {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl Sub<ServiceTime> for ServiceTime {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        Duration((self.0 - rhs.0) as i64)
    }
}

impl ServiceTime {
    pub const fn from_seconds(secs: i32) -> Self {
        Self(secs)
    }

    pub const fn as_seconds(&self) -> i32 {
        self.0
    }

    pub fn to_hms_string(&self) -> String {
        let h = self.0 / 3600;
        let m = (self.0 % 3600) / 60;
        let s = self.0 % 60;
        format!("{:02}:{:02}:{:02}", h, m, s)
    }

    pub fn from_hms(time: &str) -> Option<Self> {
        const HOUR_TO_SEC: i32 = 60 * 60;
        const MINUTE_TO_SEC: i32 = 60;
        let mut split = time.split(':');
        let hours: i32 = split.next()?.parse().ok()?;
        let minutes: i32 = split.next()?.parse().ok()?;
        let seconds: i32 = split.next()?.parse().ok()?;
        if split.next().is_some() || hours < 0 || !(0..60).contains(&minutes) {
            return None;
        }
        if !(0..60).contains(&seconds) {
            return None;
        }
        Some(Self(hours * HOUR_TO_SEC + minutes * MINUTE_TO_SEC + seconds))
    }
}

impl Display for ServiceTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hms_string())
    }
}

#[test]
fn parse_unparse_1() {
    let time = "00:00:00";
    let stime = ServiceTime::from_hms(time).unwrap();
    assert_eq!(time, stime.to_hms_string())
}

#[test]
fn parse_unparse_2() {
    let time = "00:06:40";
    let stime = ServiceTime::from_hms(time).unwrap();
    assert_eq!(time, stime.to_hms_string())
}

#[test]
fn parse_unparse_past_midnight() {
    let time = "25:10:05";
    let stime = ServiceTime::from_hms(time).unwrap();
    assert_eq!(time, stime.to_hms_string())
}

#[test]
fn valid_time_test_1() {
    assert_eq!(ServiceTime::from_hms("00:01:30").unwrap().as_seconds(), 90);
}

#[test]
fn valid_time_test_2() {
    assert_eq!(ServiceTime::from_hms("01:01:30").unwrap().as_seconds(), 3690);
}

#[test]
fn invalid_time_test_1() {
    assert!(ServiceTime::from_hms("00:00:0a").is_none())
}

#[test]
fn invalid_time_test_2() {
    assert!(ServiceTime::from_hms("00:00").is_none())
}

#[test]
fn invalid_time_test_3() {
    assert!(ServiceTime::from_hms("00:75:00").is_none())
}

#[test]
fn timestamp_arithmetic() {
    let start = Timestamp::from_seconds(100);
    let later = start + Duration::from_minutes(2);
    assert_eq!(later.as_seconds(), 220);
    assert_eq!(later - start, Duration::from_seconds(120));
    assert_eq!(later - Duration::from_seconds(20), Timestamp::from_seconds(200));
}

#[test]
fn timestamp_display() {
    assert_eq!(Timestamp::from_seconds(0).to_string(), "1970-01-01 00:00:00 UTC");
}
