//! Trading-session window

use crate::error::ScheduleError;
use chrono::{DateTime, Datelike, NaiveTime, Timelike, Utc, Weekday};
use chrono_tz::Tz;

/// Monday–Friday session window in the exchange's zone.
///
/// Instants are kept in UTC and only converted here, so day boundaries and
/// any DST shifts follow the exchange calendar rather than the host's. There
/// is no holiday calendar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketHours {
    timezone: Tz,
    open: NaiveTime,
    close: NaiveTime,
}

impl MarketHours {
    /// Create a window; `open` must be strictly before `close`
    pub fn new(timezone: Tz, open: NaiveTime, close: NaiveTime) -> Result<Self, ScheduleError> {
        if open >= close {
            return Err(ScheduleError::InvalidWindow {
                open: open.format("%H:%M").to_string(),
                close: close.format("%H:%M").to_string(),
            });
        }
        Ok(Self { timezone, open, close })
    }

    /// Exchange zone
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Session open
    pub fn open(&self) -> NaiveTime {
        self.open
    }

    /// Session close
    pub fn close(&self) -> NaiveTime {
        self.close
    }

    /// `now` in the exchange zone
    pub fn local(&self, now: DateTime<Utc>) -> DateTime<Tz> {
        now.with_timezone(&self.timezone)
    }

    /// Whether `now` falls on a weekday within `[open, close]`, both inclusive.
    ///
    /// Compared at minute precision, so the whole closing minute counts as
    /// open and a tick that drifts a few seconds past close still runs.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        let local = self.local(now);
        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        match NaiveTime::from_hms_opt(local.hour(), local.minute(), 0) {
            Some(minute) => minute >= self.open && minute <= self.close,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Kolkata;

    fn hours(open: (u32, u32)) -> MarketHours {
        MarketHours::new(
            Kolkata,
            NaiveTime::from_hms_opt(open.0, open.1, 0).unwrap(),
            NaiveTime::from_hms_opt(15, 15, 0).unwrap(),
        )
        .unwrap()
    }

    fn ist(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        // March 2024: the 4th is a Monday, the 9th a Saturday
        Kolkata
            .with_ymd_and_hms(2024, 3, day, hour, minute, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_weekday_session() {
        let gate = hours((9, 15));

        assert!(!gate.is_open(ist(4, 8, 0)));
        assert!(!gate.is_open(ist(4, 9, 14)));
        assert!(gate.is_open(ist(4, 9, 15)));
        assert!(gate.is_open(ist(4, 12, 0)));
        assert!(gate.is_open(ist(4, 15, 15)));
        assert!(!gate.is_open(ist(4, 15, 16)));
    }

    #[test]
    fn test_closing_minute_open_to_its_last_second() {
        let gate = hours((9, 15));
        let at = |h, m, s| {
            Kolkata
                .with_ymd_and_hms(2024, 3, 4, h, m, s)
                .unwrap()
                .with_timezone(&Utc)
        };

        assert!(gate.is_open(at(15, 15, 30)));
        assert!(gate.is_open(at(15, 15, 59)));
        assert!(!gate.is_open(at(15, 16, 0)));
        assert!(!gate.is_open(at(9, 14, 59)));
    }

    #[test]
    fn test_weekend_closed() {
        let gate = hours((9, 15));
        assert!(!gate.is_open(ist(9, 11, 0)));
        assert!(!gate.is_open(ist(10, 11, 0)));
    }

    #[test]
    fn test_late_open_variant() {
        let gate = hours((9, 20));
        assert!(!gate.is_open(ist(5, 9, 17)));
        assert!(gate.is_open(ist(5, 9, 20)));
    }

    #[test]
    fn test_gate_uses_exchange_zone_not_utc() {
        let gate = hours((9, 15));
        // 04:00 UTC Friday is 09:30 IST Friday: open
        let friday = Utc.with_ymd_and_hms(2024, 3, 8, 4, 0, 0).unwrap();
        assert!(gate.is_open(friday));
        // 20:00 UTC Sunday is 01:30 IST Monday: closed by time, not by weekday
        let sunday_utc = Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap();
        assert!(!gate.is_open(sunday_utc));
        assert_eq!(gate.local(sunday_utc).weekday(), Weekday::Mon);
    }

    #[test]
    fn test_inverted_window_rejected() {
        let result = MarketHours::new(
            Kolkata,
            NaiveTime::from_hms_opt(15, 15, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
        );
        assert!(matches!(result, Err(ScheduleError::InvalidWindow { .. })));
    }
}
