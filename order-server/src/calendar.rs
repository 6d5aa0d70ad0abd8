//! Business-day boundary math
//!
//! A store's trading day is defined by its opening and closing time
//! ("HH:MM"). When closing < opening the store trades overnight and one
//! business day spans midnight: a bar open 18:00–03:00 attributes an order
//! placed at 01:00 to the *previous* calendar date. Reports and the
//! dashboard bound their queries with these functions so that such a night
//! is a single trading day.
//!
//! All functions here are pure over their inputs; timezone conversion to
//! Unix millis is kept separate ([`to_millis`]) so boundary logic can be
//! tested on wall-clock values directly.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use chrono_tz::Tz;
use shared::{AppError, AppResult, models::StoreInfo};

/// Parsed trading window of a store
///
/// Both times absent means the store has no configured hours and business
/// days fall back to plain midnight-to-midnight calendar days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TradingHours {
    pub opening: Option<NaiveTime>,
    pub closing: Option<NaiveTime>,
}

impl TradingHours {
    pub fn new(opening: Option<NaiveTime>, closing: Option<NaiveTime>) -> Self {
        Self { opening, closing }
    }

    /// Parse the window once from a store record
    pub fn from_store(store: &StoreInfo) -> AppResult<Self> {
        let opening = store.opening_time.as_deref().map(parse_hhmm).transpose()?;
        let closing = store.closing_time.as_deref().map(parse_hhmm).transpose()?;
        Ok(Self { opening, closing })
    }

    /// Overnight trading: the window wraps past midnight
    pub fn is_overnight(&self) -> bool {
        match (self.opening, self.closing) {
            (Some(open), Some(close)) => close < open,
            _ => false,
        }
    }
}

/// Parse an "HH:MM" time string
pub fn parse_hhmm(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time format: {value}")))
}

/// Start instant of the business day `reference` belongs to
///
/// Without configured hours this is midnight of the reference date. For an
/// overnight window, a reference before opening time belongs to the trading
/// day that began the previous calendar day.
pub fn business_day_start(reference: NaiveDateTime, hours: &TradingHours) -> NaiveDateTime {
    let (Some(open), Some(_)) = (hours.opening, hours.closing) else {
        return reference.date().and_time(NaiveTime::MIN);
    };

    let start_date = if hours.is_overnight() && reference.time() < open {
        reference.date().pred_opt().unwrap_or(reference.date())
    } else {
        reference.date()
    };
    start_date.and_time(open)
}

/// End instant of the business day `reference` belongs to
///
/// The end falls on the closing minute with :59.999 precision ("end of that
/// minute"). For overnight windows it lands on the calendar day after the
/// start. Without configured hours: end of the reference date.
pub fn business_day_end(reference: NaiveDateTime, hours: &TradingHours) -> NaiveDateTime {
    let (Some(_), Some(close)) = (hours.opening, hours.closing) else {
        return reference.date().and_time(end_of_minute(
            NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN),
        ));
    };

    let start_date = business_day_start(reference, hours).date();
    let end_date = if hours.is_overnight() {
        start_date.succ_opt().unwrap_or(start_date)
    } else {
        start_date
    };
    end_date.and_time(end_of_minute(close))
}

/// Calendar date the in-progress business day is attributed to
///
/// Staff drinks consumed at 01:30 during overnight trading land on the
/// previous date; this is the date callers pass to order creation.
pub fn current_business_date(reference: NaiveDateTime, hours: &TradingHours) -> NaiveDate {
    business_day_start(reference, hours).date()
}

/// Whether an instant falls inside the trading window
///
/// Minute granularity, inclusive on both ends; wrap-around for overnight
/// windows. Absent hours mean always open.
pub fn is_within_business_hours(reference: NaiveDateTime, hours: &TradingHours) -> bool {
    let (Some(open), Some(close)) = (hours.opening, hours.closing) else {
        return true;
    };

    let t = truncate_to_minute(reference.time());
    if hours.is_overnight() {
        t >= open || t <= close
    } else {
        t >= open && t <= close
    }
}

/// Wall-clock instant in the business timezone → Unix millis
///
/// DST gap fallback: if the local time does not exist, take the latest
/// valid interpretation, then UTC as a last resort.
pub fn to_millis(local: NaiveDateTime, tz: Tz) -> i64 {
    local
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| local.and_utc().timestamp_millis())
}

/// Business-day query bounds in Unix millis for the given reference instant
pub fn business_day_bounds(reference: NaiveDateTime, hours: &TradingHours, tz: Tz) -> (i64, i64) {
    (
        to_millis(business_day_start(reference, hours), tz),
        to_millis(business_day_end(reference, hours), tz),
    )
}

fn end_of_minute(t: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_milli_opt(t.hour(), t.minute(), 59, 999).unwrap_or(t)
}

fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(open: &str, close: &str) -> TradingHours {
        TradingHours::new(Some(parse_hhmm(open).unwrap()), Some(parse_hhmm(close).unwrap()))
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        format!("{date}T{time}").parse().unwrap()
    }

    #[test]
    fn test_overnight_boundary_before_opening() {
        // Bar trading 18:00-03:00: 01:00 belongs to the previous day's window
        let h = hours("18:00", "03:00");
        let reference = at("2024-01-02", "01:00:00");
        assert_eq!(business_day_start(reference, &h), at("2024-01-01", "18:00:00"));
        assert_eq!(
            business_day_end(reference, &h),
            at("2024-01-02", "03:00:59.999")
        );
        assert_eq!(
            current_business_date(reference, &h),
            "2024-01-01".parse::<NaiveDate>().unwrap()
        );
    }

    #[test]
    fn test_overnight_boundary_after_opening() {
        let h = hours("18:00", "03:00");
        let reference = at("2024-01-01", "22:30:00");
        assert_eq!(business_day_start(reference, &h), at("2024-01-01", "18:00:00"));
        assert_eq!(
            business_day_end(reference, &h),
            at("2024-01-02", "03:00:59.999")
        );
    }

    #[test]
    fn test_same_day_window() {
        let h = hours("09:00", "22:00");
        for time in ["00:30:00", "09:00:00", "15:00:00", "23:59:00"] {
            let reference = at("2024-01-02", time);
            assert_eq!(business_day_start(reference, &h), at("2024-01-02", "09:00:00"));
            assert_eq!(
                business_day_end(reference, &h),
                at("2024-01-02", "22:00:59.999")
            );
        }
    }

    #[test]
    fn test_absent_hours_fall_back_to_calendar_day() {
        let h = TradingHours::default();
        let reference = at("2024-03-15", "13:45:00");
        assert_eq!(business_day_start(reference, &h), at("2024-03-15", "00:00:00"));
        assert_eq!(
            business_day_end(reference, &h),
            at("2024-03-15", "23:59:59.999")
        );
        assert!(is_within_business_hours(reference, &h));
    }

    #[test]
    fn test_within_hours_wraps_overnight() {
        let h = hours("18:00", "03:00");
        assert!(is_within_business_hours(at("2024-01-01", "23:00:00"), &h));
        assert!(is_within_business_hours(at("2024-01-02", "01:30:00"), &h));
        // closing minute is still inside, seconds ignored
        assert!(is_within_business_hours(at("2024-01-02", "03:00:59"), &h));
        assert!(!is_within_business_hours(at("2024-01-02", "03:01:00"), &h));
        assert!(!is_within_business_hours(at("2024-01-02", "12:00:00"), &h));
    }

    #[test]
    fn test_within_hours_same_day() {
        let h = hours("09:00", "22:00");
        assert!(is_within_business_hours(at("2024-01-02", "09:00:00"), &h));
        assert!(is_within_business_hours(at("2024-01-02", "22:00:30"), &h));
        assert!(!is_within_business_hours(at("2024-01-02", "08:59:00"), &h));
        assert!(!is_within_business_hours(at("2024-01-02", "22:01:00"), &h));
    }

    #[test]
    fn test_to_millis_uses_business_timezone() {
        use chrono_tz::Asia::Tokyo;
        // 18:00 JST is 09:00 UTC
        assert_eq!(
            to_millis(at("2024-01-01", "18:00:00"), Tokyo),
            at("2024-01-01", "09:00:00").and_utc().timestamp_millis()
        );
    }

    #[test]
    fn test_to_millis_dst_edges() {
        use chrono_tz::America::New_York;
        // 01:30 on the fall-back night is ambiguous; the later instant (EST) wins
        assert_eq!(
            to_millis(at("2024-11-03", "01:30:00"), New_York),
            at("2024-11-03", "06:30:00").and_utc().timestamp_millis()
        );
        // 02:30 on the spring-forward night does not exist; UTC fallback
        assert_eq!(
            to_millis(at("2024-03-10", "02:30:00"), New_York),
            at("2024-03-10", "02:30:00").and_utc().timestamp_millis()
        );
    }

    #[test]
    fn test_business_day_bounds_overnight_in_tz() {
        use chrono_tz::Asia::Tokyo;
        let h = hours("18:00", "03:00");
        let (from, to) = business_day_bounds(at("2024-01-02", "01:00:00"), &h, Tokyo);
        // 2024-01-01 18:00 JST .. 2024-01-02 03:00:59.999 JST, as UTC millis
        assert_eq!(from, at("2024-01-01", "09:00:00").and_utc().timestamp_millis());
        assert_eq!(to, at("2024-01-01", "18:00:59.999").and_utc().timestamp_millis());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_hhmm("25:00").is_err());
        assert!(parse_hhmm("9am").is_err());
        assert!(parse_hhmm("").is_err());
        assert_eq!(
            parse_hhmm("18:30").unwrap(),
            NaiveTime::from_hms_opt(18, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_from_store_propagates_validation_error() {
        let store = StoreInfo {
            opening_time: Some("18:00".into()),
            closing_time: Some("soon".into()),
            ..Default::default()
        };
        assert!(TradingHours::from_store(&store).is_err());

        let store = StoreInfo {
            opening_time: Some("18:00".into()),
            closing_time: Some("03:00".into()),
            ..Default::default()
        };
        assert!(TradingHours::from_store(&store).unwrap().is_overnight());
    }
}
