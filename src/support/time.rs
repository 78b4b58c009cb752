//! Venue-local calendar helpers
//!
//! Timestamps are stored in UTC. "Today" and "this month" are decided in
//! the venue's fixed UTC offset.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};

#[derive(Debug, Clone, Copy)]
pub struct VenueClock {
    offset: FixedOffset,
}

impl VenueClock {
    pub fn from_offset_minutes(minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::from_offset_minutes(0)
    }

    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// UTC instant of local midnight at the start of `date`.
    /// `None` at the edges of the representable calendar.
    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        date.and_time(NaiveTime::MIN)
            .checked_sub_offset(self.offset)
            .map(|naive| naive.and_utc())
    }

    /// Half-open `[start, end)` UTC range covering the local day
    pub fn day_bounds(&self, date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.start_of_day(date)?;
        let end = start.checked_add_signed(Duration::days(1))?;
        Some((start, end))
    }

    /// First and last local day of the month containing `now`
    pub fn month_days(&self, now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
        let today = self.today(now);
        let first = today - Duration::days(today.day0() as i64);
        let (year, month) = if first.month() == 12 {
            (first.year() + 1, 1)
        } else {
            (first.year(), first.month() + 1)
        };
        let next_first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX);
        (first, next_first - Duration::days(1))
    }

    /// Local (year, month) of an instant
    pub fn year_month(&self, at: DateTime<Utc>) -> (i32, u32) {
        let local = at.with_timezone(&self.offset);
        (local.year(), local.month())
    }

    /// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; anything else is `None`,
    /// as is a date too close to the calendar's limits to bound as a day.
    pub fn parse_date(&self, raw: Option<&str>) -> Option<NaiveDate> {
        let raw = raw?.trim();
        if raw.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.with_timezone(&self.offset).date_naive())
            })
            .filter(|date| self.day_bounds(*date).is_some())
    }
}

impl Default for VenueClock {
    fn default() -> Self {
        // WIB
        Self::from_offset_minutes(7 * 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn wib() -> VenueClock {
        VenueClock::from_offset_minutes(420)
    }

    #[test]
    fn day_bounds_shift_by_offset() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let (start, end) = wib().day_bounds(date).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 9, 17, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 10, 17, 0, 0).unwrap());
    }

    #[test]
    fn today_uses_local_date() {
        // 18:30 UTC is already the next day in WIB
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap();
        assert_eq!(wib().today(now), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(VenueClock::utc().today(now), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }

    #[test]
    fn month_days_handles_december() {
        let now = Utc.with_ymd_and_hms(2023, 12, 15, 5, 0, 0).unwrap();
        let (first, last) = wib().month_days(now);
        assert_eq!(first, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn month_days_handles_leap_february() {
        let now = Utc.with_ymd_and_hms(2024, 2, 10, 5, 0, 0).unwrap();
        let (_, last) = wib().month_days(now);
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn parse_date_accepts_both_formats() {
        let clock = wib();
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(clock.parse_date(Some("2024-05-01")), Some(expected));
        assert_eq!(clock.parse_date(Some("2024-04-30T20:00:00Z")), Some(expected));
        assert_eq!(clock.parse_date(Some("yesterday")), None);
        assert_eq!(clock.parse_date(Some("")), None);
        assert_eq!(clock.parse_date(None), None);
    }

    #[test]
    fn calendar_edges_are_not_days() {
        let clock = wib();
        assert_eq!(clock.start_of_day(NaiveDate::MIN), None);
        assert_eq!(clock.day_bounds(NaiveDate::MAX), None);
        assert_eq!(clock.parse_date(Some("-262143-01-01")), None);
        assert_eq!(clock.parse_date(Some("+262142-12-31")), None);
        assert!(VenueClock::utc().start_of_day(NaiveDate::MIN).is_some());
    }

    #[test]
    fn year_month_is_local() {
        let at = Utc.with_ymd_and_hms(2024, 1, 31, 20, 0, 0).unwrap();
        assert_eq!(wib().year_month(at), (2024, 2));
    }
}
