//! Time source and time-of-day classification.

use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};

/// Source of the current instant. All day boundaries are UTC.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current UTC calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and dry runs.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Creates a clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Part of the day a trigger fires in, by UTC hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeBand {
    /// 03:00 to 07:59 UTC.
    Morning,
    /// 08:00 to 12:59 UTC.
    Afternoon,
    /// 13:00 to 02:59 UTC.
    Evening,
}

impl TimeBand {
    /// Classifies an hour of day (0-23).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            3..=7 => Self::Morning,
            8..=12 => Self::Afternoon,
            _ => Self::Evening,
        }
    }

    /// Classifies an instant.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self::from_hour(instant.hour())
    }
}

impl std::fmt::Display for TimeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Morning => write!(f, "morning"),
            Self::Afternoon => write!(f, "afternoon"),
            Self::Evening => write!(f, "evening"),
        }
    }
}

impl std::str::FromStr for TimeBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            other => Err(format!("unknown time band: {}", other)),
        }
    }
}

/// UTC (hour, minute) slots the external scheduler fires at.
pub const REMINDER_SCHEDULE: [(TimeBand, u32, u32); 3] = [
    (TimeBand::Morning, 4, 30),
    (TimeBand::Afternoon, 9, 30),
    (TimeBand::Evening, 14, 30),
];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(TimeBand::from_hour(0), TimeBand::Evening);
        assert_eq!(TimeBand::from_hour(2), TimeBand::Evening);
        assert_eq!(TimeBand::from_hour(3), TimeBand::Morning);
        assert_eq!(TimeBand::from_hour(7), TimeBand::Morning);
        assert_eq!(TimeBand::from_hour(8), TimeBand::Afternoon);
        assert_eq!(TimeBand::from_hour(12), TimeBand::Afternoon);
        assert_eq!(TimeBand::from_hour(13), TimeBand::Evening);
        assert_eq!(TimeBand::from_hour(23), TimeBand::Evening);
    }

    #[test]
    fn test_schedule_slots_fall_in_their_band() {
        for (band, hour, _) in REMINDER_SCHEDULE {
            assert_eq!(TimeBand::from_hour(hour), band);
        }
    }

    #[test]
    fn test_fixed_clock_advance_crosses_day() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 10, 14, 23, 30, 0).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());

        clock.advance(Duration::hours(1));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
        assert_eq!(TimeBand::at(clock.now()), TimeBand::Evening);
    }

    #[test]
    fn test_band_from_str() {
        assert_eq!("Morning".parse::<TimeBand>().unwrap(), TimeBand::Morning);
        assert!("noon".parse::<TimeBand>().is_err());
    }
}
