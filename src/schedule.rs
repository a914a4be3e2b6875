//! Day windows for the doctor's appointment listing.
//!
//! Boundaries are local midnights converted to UTC instants:
//! - `past`:   before the start of today
//! - `today`:  `[start of today, start of tomorrow)`
//! - `future`: from the start of tomorrow; the rest of today is excluded

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentWindow {
    Past,
    Today,
    Future,
}

impl FromStr for AppointmentWindow {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "past" => Ok(Self::Past),
            "today" => Ok(Self::Today),
            "future" => Ok(Self::Future),
            _ => Err(()),
        }
    }
}

impl AppointmentWindow {
    /// Unrecognized filters mean "no date restriction", not an error.
    pub fn from_filter(filter: Option<&str>) -> Option<Self> {
        filter.and_then(|f| f.parse().ok())
    }

    pub fn range(self, day: &DayBounds) -> TimeRange {
        match self {
            Self::Past => TimeRange {
                from: None,
                until: Some(day.start_of_today),
            },
            Self::Today => TimeRange {
                from: Some(day.start_of_today),
                until: Some(day.start_of_tomorrow),
            },
            Self::Future => TimeRange {
                from: Some(day.start_of_tomorrow),
                until: None,
            },
        }
    }
}

/// Start of the current and the next calendar day in the caller's zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBounds {
    pub start_of_today: DateTime<Utc>,
    pub start_of_tomorrow: DateTime<Utc>,
}

impl DayBounds {
    pub fn containing<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let zone = now.timezone();
        let today = now.date_naive();
        let tomorrow = today.succ_opt().unwrap_or(NaiveDate::MAX);

        Self {
            start_of_today: midnight(&zone, today),
            start_of_tomorrow: midnight(&zone, tomorrow),
        }
    }

    pub fn local_now() -> Self {
        Self::containing(&chrono::Local::now())
    }
}

/// First instant of `date` in `zone`. Zones that skip midnight for DST
/// fall back to the UTC reading of the same wall clock.
fn midnight<Tz: TimeZone>(zone: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    zone.from_local_datetime(&naive)
        .earliest()
        .map(|at| at.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// Half-open instant range: `from` inclusive, `until` exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn for_filter(filter: Option<&str>, day: &DayBounds) -> Self {
        AppointmentWindow::from_filter(filter)
            .map(|window| window.range(day))
            .unwrap_or_default()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.until.map_or(true, |until| at < until)
    }
}
