use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::ValidationError;

/// A latitude/longitude pair in decimal degrees.
///
/// Both components are finite; ranges are not checked, the upstream
/// services reject points they do not cover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Parse free-text input of the form `"<lat>, <lon>"`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.trim().is_empty() {
            return Err(ValidationError::Missing);
        }

        let malformed = || ValidationError::Malformed { input: input.to_string() };

        let parts: Vec<&str> = input.split(',').map(str::trim).collect();
        let [lat, lon] = parts.as_slice() else {
            return Err(malformed());
        };

        let latitude = parse_component(lat).ok_or_else(malformed)?;
        let longitude = parse_component(lon).ok_or_else(malformed)?;

        Ok(Self { latitude, longitude })
    }
}

fn parse_component(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl FromStr for Coordinate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// `lat,lon` with no space, the form both upstream APIs expect.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
