use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// Source of "now". Entries are keyed by the UTC calendar day.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
pub use self::fixed::FixedClock;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_of_day_drops_time() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 22).unwrap();
        let start = start_of_day(date);
        assert_eq!(start.to_rfc3339(), "2024-04-22T00:00:00+00:00");
    }

    #[test]
    fn test_fixed_clock_crosses_midnight() {
        let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 4, 22, 23, 30, 0).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 4, 22).unwrap());
        clock.advance(chrono::Duration::hours(1));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 4, 23).unwrap());
    }
}
