//! National Weather Service (api.weather.gov) adapter.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::{
    coordinate::Coordinate,
    error::FetchError,
    model::{DailyPeriod, ForecastPeriod, PointLinks},
};

use super::{ForecastProvider, HttpClient};

pub const DEFAULT_BASE_URL: &str = "https://api.weather.gov";

#[derive(Debug, Clone)]
pub struct NwsProvider {
    base_url: String,
    http: HttpClient,
}

impl NwsProvider {
    pub fn new(base_url: impl Into<String>, http: HttpClient) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    async fn periods(&self, url: &str) -> Result<Vec<NwsPeriod>, FetchError> {
        let doc: NwsForecast = self.http.get_json(url, &[]).await?;
        Ok(doc.properties.periods)
    }
}

#[derive(Debug, Deserialize)]
struct NwsPoints {
    properties: NwsPointProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NwsPointProperties {
    forecast: Option<String>,
    forecast_hourly: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NwsForecast {
    properties: NwsForecastProperties,
}

#[derive(Debug, Deserialize)]
struct NwsForecastProperties {
    periods: Vec<NwsPeriod>,
}

#[derive(Debug, Deserialize)]
struct NwsQuantity {
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NwsPeriod {
    #[serde(default)]
    name: String,
    start_time: DateTime<FixedOffset>,
    is_daytime: bool,
    temperature: f64,
    temperature_unit: String,
    short_forecast: String,
    #[serde(default)]
    probability_of_precipitation: Option<NwsQuantity>,
    #[serde(default)]
    sunrise: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    sunset: Option<DateTime<FixedOffset>>,
}

impl From<NwsPeriod> for ForecastPeriod {
    fn from(p: NwsPeriod) -> Self {
        Self {
            start_time: p.start_time,
            is_daytime: p.is_daytime,
            temperature: p.temperature,
            temperature_unit: p.temperature_unit,
            short_forecast: p.short_forecast,
            probability_of_precipitation: p.probability_of_precipitation.and_then(|q| q.value),
        }
    }
}

impl From<NwsPeriod> for DailyPeriod {
    fn from(p: NwsPeriod) -> Self {
        Self {
            name: p.name,
            start_time: p.start_time,
            sunrise: p.sunrise,
            sunset: p.sunset,
        }
    }
}

#[async_trait]
impl ForecastProvider for NwsProvider {
    async fn points(&self, coordinate: Coordinate) -> Result<PointLinks, FetchError> {
        let url = format!("{}/points/{}", self.base_url, coordinate);
        let doc: NwsPoints = self.http.get_json(&url, &[]).await?;

        Ok(PointLinks {
            forecast_hourly: doc
                .properties
                .forecast_hourly
                .ok_or(FetchError::MissingLink("forecastHourly"))?,
            forecast: doc.properties.forecast.ok_or(FetchError::MissingLink("forecast"))?,
        })
    }

    async fn hourly(&self, links: &PointLinks) -> Result<Vec<ForecastPeriod>, FetchError> {
        let periods = self.periods(&links.forecast_hourly).await?;
        Ok(periods.into_iter().map(ForecastPeriod::from).collect())
    }

    async fn daily(&self, links: &PointLinks) -> Result<Vec<DailyPeriod>, FetchError> {
        let periods = self.periods(&links.forecast).await?;
        Ok(periods.into_iter().map(DailyPeriod::from).collect())
    }
}
