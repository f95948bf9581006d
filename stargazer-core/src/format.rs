//! Display strings for table cells.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime};

/// `01/05/2024, 06:00 PM`
pub fn date_time(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%m/%d/%Y, %I:%M %p").to_string()
}

/// `Friday, Jan 5th`
pub fn day_title(date: NaiveDate) -> String {
    let day = date.day();
    format!("{}, {} {}{}", date.format("%A"), date.format("%b"), day, ordinal_suffix(day))
}

pub fn ordinal_suffix(n: u32) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// `7:18 AM`, or `N/A` when the event does not occur.
pub fn clock(time: Option<NaiveTime>) -> String {
    match time {
        Some(t) => t.format("%-I:%M %p").to_string(),
        None => "N/A".to_string(),
    }
}

pub fn temperature(value: f64, unit: &str) -> String {
    format!("{value}°{unit}")
}

pub fn precipitation(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v}%"),
        None => "N/A".to_string(),
    }
}

/// Zero illumination reads as unknown: it is also what the fallback carries.
pub fn moonlight(fraction: Option<f64>) -> String {
    match fraction {
        Some(f) if f > 0.0 => format!("{:.0}%", f * 100.0),
        _ => "Unknown".to_string(),
    }
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}
