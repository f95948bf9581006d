//! Turns fetched forecast data into a day-grouped table description.
//!
//! The renderer is a pure function of its input: it never touches the
//! output target. Presentation adapters (text, HTML, JSON) live in the CLI.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Weekday};
use serde::Serialize;

use crate::{
    format,
    model::{CelestialData, DailyPeriod, ForecastPeriod},
    recommend::{Recommendation, recommend},
};

pub const COLUMNS: [&str; 7] = [
    "Time",
    "Temperature",
    "Weather",
    "Daytime",
    "Precipitation Probability",
    "Moonlight",
    "Recommendation",
];

/// Row background per day of week, Sunday first.
pub const DAY_PALETTE: [&str; 7] = [
    "#fef9f9", "#f6fdf6", "#fefde5", "#f8f2fc", "#e7f2fd", "#e7fcf9", "#f9f4fc",
];

pub fn day_color(weekday: Weekday) -> &'static str {
    DAY_PALETTE[weekday.num_days_from_sunday() as usize]
}

/// How consecutive periods are split into days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayGrouping {
    /// A new day starts when the weekday changes. Periods exactly one week
    /// apart with nothing in between end up in the same group.
    #[default]
    Weekday,
    /// A new day starts when the calendar date changes.
    CalendarDate,
}

/// Which sun/moon rows follow each day title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLayout {
    /// Day title plus sunrise, sunset, moonrise and moonset.
    #[default]
    Full,
    /// Sunrise and sunset only, preferring the daily forecast's own times.
    Compact,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderOptions {
    pub grouping: DayGrouping,
    pub layout: EventLayout,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub hourly: &'a [ForecastPeriod],
    pub daily: &'a [DailyPeriod],
    pub celestial: &'a CelestialData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn forecast_rows(&self) -> impl Iterator<Item = &ForecastRow> {
        self.rows.iter().filter_map(|row| match row {
            Row::Forecast(f) => Some(f),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Row {
    DayTitle { text: String },
    Event { label: &'static str, value: String },
    Forecast(ForecastRow),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub time: String,
    pub temperature: String,
    pub weather: String,
    pub daytime: &'static str,
    pub precipitation: String,
    pub moonlight: String,
    pub recommendation: Recommendation,
    pub background: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayKey {
    Weekday(Weekday),
    Date(NaiveDate),
}

fn day_key(start: &DateTime<FixedOffset>, grouping: DayGrouping) -> DayKey {
    let date = start.date_naive();
    match grouping {
        DayGrouping::Weekday => DayKey::Weekday(date.weekday()),
        DayGrouping::CalendarDate => DayKey::Date(date),
    }
}

/// Indices at which a new group starts: every position whose key differs
/// from the one before it.
pub fn boundaries<K: PartialEq>(keys: impl IntoIterator<Item = K>) -> Vec<usize> {
    let mut out = Vec::new();
    let mut current: Option<K> = None;

    for (idx, key) in keys.into_iter().enumerate() {
        if current.as_ref() != Some(&key) {
            out.push(idx);
            current = Some(key);
        }
    }

    out
}

pub fn day_boundaries(periods: &[ForecastPeriod], grouping: DayGrouping) -> Vec<usize> {
    boundaries(periods.iter().map(|p| day_key(&p.start_time, grouping)))
}

/// Build the display table.
pub fn render(input: &RenderInput<'_>, options: &RenderOptions) -> Table {
    let starts = day_boundaries(input.hourly, options.grouping);
    let moonlight = input.celestial.moonlight_fraction();

    let mut rows = Vec::with_capacity(input.hourly.len() + starts.len() * 5);

    for (idx, period) in input.hourly.iter().enumerate() {
        let date = period.start_time.date_naive();

        if starts.binary_search(&idx).is_ok() {
            match options.layout {
                EventLayout::Full => {
                    rows.push(Row::DayTitle { text: format::day_title(date) });
                    push_celestial_rows(&mut rows, input.celestial);
                }
                EventLayout::Compact => push_sun_rows(&mut rows, date, input),
            }
        }

        rows.push(Row::Forecast(ForecastRow {
            time: format::date_time(&period.start_time),
            temperature: format::temperature(period.temperature, &period.temperature_unit),
            weather: period.short_forecast.clone(),
            daytime: format::yes_no(period.is_daytime),
            precipitation: format::precipitation(period.probability_of_precipitation),
            moonlight: format::moonlight(input.celestial.moonlight),
            recommendation: recommend(
                &period.short_forecast,
                period.probability_of_precipitation,
                moonlight,
            ),
            background: day_color(date.weekday()),
        }));
    }

    Table { columns: COLUMNS.to_vec(), rows }
}

fn push_celestial_rows(rows: &mut Vec<Row>, celestial: &CelestialData) {
    let events = [
        ("Sunrise", celestial.sun.rise),
        ("Sunset", celestial.sun.set),
        ("Moonrise", celestial.moon.rise),
        ("Moonset", celestial.moon.set),
    ];

    rows.extend(
        events
            .into_iter()
            .map(|(label, time)| Row::Event { label, value: format::clock(time) }),
    );
}

fn push_sun_rows(rows: &mut Vec<Row>, date: NaiveDate, input: &RenderInput<'_>) {
    let day = input
        .daily
        .iter()
        .find(|d| d.start_time.date_naive() == date && (d.sunrise.is_some() || d.sunset.is_some()));

    let value = |from_daily: Option<&DateTime<FixedOffset>>, from_usno: Option<NaiveTime>| match from_daily {
        Some(dt) => format::date_time(dt),
        None => format::clock(from_usno),
    };

    let sunrise = value(day.and_then(|d| d.sunrise.as_ref()), input.celestial.sun.rise);
    let sunset = value(day.and_then(|d| d.sunset.as_ref()), input.celestial.sun.set);

    rows.push(Row::Event { label: "Sunrise", value: sunrise });
    rows.push(Row::Event { label: "Sunset", value: sunset });
}
