use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Calendar granularity used for the header ticks and drag snapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Hour,
    Day,
    Month,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 3] = [TimeUnit::Hour, TimeUnit::Day, TimeUnit::Month];

    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Hour => "Hours",
            TimeUnit::Day => "Days",
            TimeUnit::Month => "Months",
        }
    }

    /// Floor `t` to the start of the unit containing it.
    pub fn start_of(self, t: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeUnit::Hour => t
                .with_minute(0)
                .and_then(|t| t.with_second(0))
                .and_then(|t| t.with_nanosecond(0))
                .unwrap_or(t),
            TimeUnit::Day => t.date_naive().and_time(NaiveTime::MIN).and_utc(),
            TimeUnit::Month => {
                let date = t.date_naive();
                NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
                    .unwrap_or(date)
                    .and_time(NaiveTime::MIN)
                    .and_utc()
            }
        }
    }

    /// Step one unit forward.
    pub fn next(self, t: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeUnit::Hour => t + TimeDelta::hours(1),
            TimeUnit::Day => t + TimeDelta::days(1),
            TimeUnit::Month => t
                .checked_add_months(Months::new(1))
                .unwrap_or(t + TimeDelta::days(31)),
        }
    }

    /// Label for a single tick of this unit.
    pub fn tick_label(self, t: DateTime<Utc>) -> String {
        match self {
            TimeUnit::Hour => t.format("%H:%M").to_string(),
            TimeUnit::Day => t.format("%-d.%m").to_string(),
            TimeUnit::Month => t.format("%b").to_string(),
        }
    }

    /// The coarser unit shown in the upper header row, if any.
    pub fn parent(self) -> Option<TimeUnit> {
        match self {
            TimeUnit::Hour => Some(TimeUnit::Day),
            TimeUnit::Day => Some(TimeUnit::Month),
            TimeUnit::Month => None,
        }
    }

    /// Label used when this unit is displayed as a period in the upper row.
    pub fn period_label(self, t: DateTime<Utc>) -> String {
        match self {
            TimeUnit::Hour => t.format("%d.%m %H:00").to_string(),
            TimeUnit::Day => t.format("%a %-d %b %Y").to_string(),
            TimeUnit::Month => t.format("%B %Y").to_string(),
        }
    }
}

/// One unit-aligned interval on the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub current: DateTime<Utc>,
    pub next: DateTime<Utc>,
}

/// Iterator over the ticks of `unit` covering `[start, end)`.
#[derive(Debug, Clone)]
pub struct Ticks {
    current: DateTime<Utc>,
    end: DateTime<Utc>,
    unit: TimeUnit,
}

impl Iterator for Ticks {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        if self.current >= self.end {
            return None;
        }
        let next = self.unit.next(self.current);
        let tick = Tick {
            current: self.current,
            next,
        };
        self.current = next;
        Some(tick)
    }
}

/// Ticks start at the boundary at or before `start`, so the first one may
/// begin left of the window. An empty or inverted range yields nothing.
pub fn ticks(start: DateTime<Utc>, end: DateTime<Utc>, unit: TimeUnit) -> Ticks {
    let current = if end <= start { end } else { unit.start_of(start) };
    Ticks {
        current,
        end,
        unit,
    }
}
