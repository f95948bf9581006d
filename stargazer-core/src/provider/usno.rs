//! US Naval Observatory "rise/set/transit" one-day adapter.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::{
    coordinate::Coordinate,
    error::FetchError,
    model::{CelestialData, Events},
};

use super::{CelestialProvider, HttpClient};

pub const DEFAULT_BASE_URL: &str = "https://aa.usno.navy.mil";

#[derive(Debug, Clone)]
pub struct UsnoProvider {
    base_url: String,
    http: HttpClient,
}

impl UsnoProvider {
    pub fn new(base_url: impl Into<String>, http: HttpClient) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UsnoResponse {
    properties: UsnoProperties,
}

#[derive(Debug, Deserialize)]
struct UsnoProperties {
    data: UsnoData,
}

#[derive(Debug, Deserialize)]
struct UsnoData {
    #[serde(default)]
    sundata: Vec<UsnoEvent>,
    #[serde(default)]
    moondata: Vec<UsnoEvent>,
    fracillum: Option<Fracillum>,
    curphase: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsnoEvent {
    phen: String,
    time: String,
}

/// USNO reports illumination as `"54%"`; older payloads used bare numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Fracillum {
    Number(f64),
    Text(String),
}

impl Fracillum {
    /// Bare values in `0..=1` are fractions, so `1` means a full moon and not 1 %.
    /// Only an explicit `%` suffix forces a percentage reading.
    fn to_fraction(&self) -> Option<f64> {
        let value = match self {
            Fracillum::Text(s) => {
                let s = s.trim();
                match s.strip_suffix('%') {
                    Some(pct) => return checked_percent(pct.trim().parse().ok()?),
                    None => s.parse::<f64>().ok()?,
                }
            }
            Fracillum::Number(n) => *n,
        };

        if (0.0..=1.0).contains(&value) {
            Some(value)
        } else {
            checked_percent(value)
        }
    }
}

fn checked_percent(pct: f64) -> Option<f64> {
    (0.0..=100.0).contains(&pct).then_some(pct / 100.0)
}

fn events(list: &[UsnoEvent], url: &str) -> Result<Events, FetchError> {
    let find = |phen: &str| -> Result<Option<NaiveTime>, FetchError> {
        list.iter()
            .find(|e| e.phen == phen)
            .map(|e| {
                NaiveTime::parse_from_str(e.time.trim(), "%H:%M").map_err(|_| FetchError::Malformed {
                    url: url.to_string(),
                    reason: format!("bad {phen} time '{}'", e.time),
                })
            })
            .transpose()
    };

    Ok(Events { rise: find("Rise")?, set: find("Set")? })
}

impl UsnoData {
    fn normalize(self, url: &str) -> Result<CelestialData, FetchError> {
        let moonlight = match &self.fracillum {
            Some(raw) => Some(raw.to_fraction().ok_or_else(|| FetchError::Malformed {
                url: url.to_string(),
                reason: format!("bad fracillum {raw:?}"),
            })?),
            None => None,
        };

        Ok(CelestialData {
            sun: events(&self.sundata, url)?,
            moon: events(&self.moondata, url)?,
            moonlight,
            phase: self.curphase,
            fallback: false,
        })
    }
}

/// Format an hour offset the way USNO expects it (`-5`, `5.5`).
fn format_offset(hours: f64) -> String {
    format!("{hours}")
}

#[async_trait]
impl CelestialProvider for UsnoProvider {
    async fn celestial(
        &self,
        coordinate: Coordinate,
        date: NaiveDate,
        utc_offset_hours: f64,
    ) -> Result<CelestialData, FetchError> {
        let url = format!("{}/api/rstt/oneday", self.base_url);
        let query = [
            ("date", format!("{}-{}-{}", date.year(), date.month(), date.day())),
            ("coords", coordinate.to_string()),
            ("tz", format_offset(utc_offset_hours)),
        ];

        let doc: UsnoResponse = self.http.get_json(&url, &query).await?;
        doc.properties.data.normalize(&url)
    }
}
