use chrono::{Local, NaiveDate};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    config::Config,
    coordinate::Coordinate,
    error::{FetchError, ForecastError},
    model::CelestialData,
    provider::{
        CelestialProvider, ForecastProvider, HttpClient, nws::NwsProvider, usno::UsnoProvider,
    },
    render::{RenderInput, RenderOptions, Table, render},
};

/// Non-fatal events worth surfacing next to the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Sun/moon data was unavailable; zero illumination was assumed.
    FallbackApplied { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub coordinate: Coordinate,
    pub table: Table,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub render: RenderOptions,
    /// Date sent to the celestial provider; defaults to the host's local date.
    pub date: Option<NaiveDate>,
    /// Hour offset sent to the celestial provider. Defaults to the host's
    /// offset, which is wrong whenever the host and the forecast location
    /// sit in different zones.
    pub utc_offset_hours: Option<f64>,
}

/// Runs the parse → fetch → render pipeline.
#[derive(Debug)]
pub struct Forecaster {
    forecast: Box<dyn ForecastProvider>,
    celestial: Box<dyn CelestialProvider>,
    run_lock: Mutex<()>,
}

impl Forecaster {
    pub fn new(forecast: Box<dyn ForecastProvider>, celestial: Box<dyn CelestialProvider>) -> Self {
        Self { forecast, celestial, run_lock: Mutex::new(()) }
    }

    /// Construct the NWS + USNO pipeline from config.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let http = HttpClient::new(config.user_agent(), config.request_timeout())?;

        Ok(Self::new(
            Box::new(NwsProvider::new(&config.endpoints.nws, http.clone())),
            Box::new(UsnoProvider::new(&config.endpoints.usno, http)),
        ))
    }

    /// Parse `input` as `"<lat>, <lon>"` and build the forecast table.
    pub async fn run(&self, input: &str, options: &RunOptions) -> Result<Report, ForecastError> {
        let coordinate = Coordinate::parse(input)?;
        self.run_at(coordinate, options).await
    }

    /// Overlapping calls on one forecaster are serialized.
    pub async fn run_at(
        &self,
        coordinate: Coordinate,
        options: &RunOptions,
    ) -> Result<Report, ForecastError> {
        let _guard = self.run_lock.lock().await;
        info!(%coordinate, "fetching forecast");

        let links = self.forecast.points(coordinate).await?;

        let now = Local::now();
        let date = options.date.unwrap_or_else(|| now.date_naive());
        let offset = options
            .utc_offset_hours
            .unwrap_or_else(|| f64::from(now.offset().local_minus_utc()) / 3600.0);

        let (hourly, daily, celestial) = tokio::join!(
            self.forecast.hourly(&links),
            self.forecast.daily(&links),
            self.celestial.celestial(coordinate, date, offset),
        );
        let hourly = hourly?;
        let daily = daily?;

        let mut notices = Vec::new();
        let celestial = match celestial {
            Ok(data) => data,
            Err(err) => {
                warn!(error = %err, "celestial data unavailable, assuming no moonlight");
                notices.push(Notice::FallbackApplied { reason: err.to_string() });
                CelestialData::fallback()
            }
        };

        let input = RenderInput { hourly: &hourly, daily: &daily, celestial: &celestial };
        let table = render(&input, &options.render);
        info!(rows = table.rows.len(), periods = hourly.len(), "forecast rendered");

        Ok(Report { coordinate, table, notices })
    }
}
