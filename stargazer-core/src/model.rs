use chrono::{DateTime, FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};

/// URLs of the forecast documents linked from grid metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointLinks {
    pub forecast_hourly: String,
    pub forecast: String,
}

/// One hourly forecast slice, in the forecast location's local offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPeriod {
    pub start_time: DateTime<FixedOffset>,
    pub is_daytime: bool,
    pub temperature: f64,
    pub temperature_unit: String,
    pub short_forecast: String,
    pub probability_of_precipitation: Option<f64>,
}

/// One day or night slice of the daily forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPeriod {
    pub name: String,
    pub start_time: DateTime<FixedOffset>,
    pub sunrise: Option<DateTime<FixedOffset>>,
    pub sunset: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Events {
    pub rise: Option<NaiveTime>,
    pub set: Option<NaiveTime>,
}

/// Normalized sun/moon data for one date and location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CelestialData {
    pub sun: Events,
    pub moon: Events,
    /// Illuminated fraction of the moon's disk, `0.0..=1.0`.
    pub moonlight: Option<f64>,
    pub phase: Option<String>,
    /// Set when this record stands in for data that could not be fetched.
    pub fallback: bool,
}

impl CelestialData {
    pub fn fallback() -> Self {
        Self {
            moonlight: Some(0.0),
            fallback: true,
            ..Self::default()
        }
    }

    pub fn moonlight_fraction(&self) -> f64 {
        self.moonlight.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_has_zero_moonlight_and_no_events() {
        let data = CelestialData::fallback();
        assert!(data.fallback);
        assert_eq!(data.moonlight, Some(0.0));
        assert_eq!(data.sun, Events::default());
        assert_eq!(data.moon, Events::default());
    }
}
