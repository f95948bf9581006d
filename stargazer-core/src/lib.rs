//! Core library for the `stargazer` CLI.
//!
//! This crate defines:
//! - Coordinate parsing and validation
//! - Adapters for the National Weather Service and US Naval Observatory APIs
//! - The day-grouped forecast table and per-hour observing recommendation
//! - Configuration handling
//!
//! It is used by `stargazer-cli`, but the renderer returns plain data so any
//! other front end can present the same table.

pub mod config;
pub mod coordinate;
pub mod error;
pub mod forecaster;
pub mod format;
pub mod model;
pub mod provider;
pub mod recommend;
pub mod render;

pub use config::{Config, Endpoints};
pub use coordinate::Coordinate;
pub use error::{FetchError, ForecastError, ValidationError};
pub use forecaster::{Forecaster, Notice, Report, RunOptions};
pub use model::{CelestialData, DailyPeriod, Events, ForecastPeriod, PointLinks};
pub use provider::{CelestialProvider, ForecastProvider};
pub use recommend::{Recommendation, Tone, Verdict};
pub use render::{DayGrouping, EventLayout, RenderOptions, Row, Table};
