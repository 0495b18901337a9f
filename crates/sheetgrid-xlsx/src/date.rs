//! Serial date conversion

use chrono::{Days, NaiveDate};

/// Serial number Excel renders as the nonexistent 1900-02-29
const PHANTOM_LEAP_DAY: u64 = 60;

/// Convert a serial day number to `YYYY-MM-DD`.
///
/// The fractional part (time of day) is dropped. In the 1900 system serial 1
/// is 1900-01-01 and serial 60 is the phantom 1900-02-29; in the 1904 system
/// serial 0 is 1904-01-01. Returns `None` for negative, non-finite or
/// out-of-range serials.
pub fn serial_to_iso_date(serial: f64, date1904: bool) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let days = serial.trunc();
    if days > u32::MAX as f64 {
        return None;
    }
    let days = days as u64;

    let date = if date1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)?.checked_add_days(Days::new(days))?
    } else if days == PHANTOM_LEAP_DAY {
        return Some("1900-02-29".to_string());
    } else {
        let offset = if days > PHANTOM_LEAP_DAY { days - 1 } else { days };
        NaiveDate::from_ymd_opt(1899, 12, 31)?.checked_add_days(Days::new(offset))?
    };

    Some(date.format("%Y-%m-%d").to_string())
}

/// Parse raw cell text as a serial and convert it.
pub fn text_to_iso_date(value: &str, date1904: bool) -> Option<String> {
    let serial: f64 = value.parse().ok()?;
    serial_to_iso_date(serial, date1904)
}
