//! Per-hour "go out and observe?" recommendation.

use serde::Serialize;
use std::fmt;

/// Moon illumination above which the sky is considered too bright.
pub const MOONLIGHT_LIMIT: f64 = 0.5;

/// Precipitation probability (percent) above which the hour is ruled out.
pub const PRECIPITATION_LIMIT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Yes,
    No,
    Maybe,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Yes => "yes",
            Verdict::No => "no",
            Verdict::Maybe => "maybe",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Alert,
    Positive,
    Neutral,
}

impl Tone {
    pub fn hex(&self) -> &'static str {
        match self {
            Tone::Alert => "#e74c3c",
            Tone::Positive => "#2ecc71",
            Tone::Neutral => "#f3c612",
        }
    }

    /// Same color as [`Tone::hex`], as 8-bit channels for terminal output.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Tone::Alert => (0xe7, 0x4c, 0x3c),
            Tone::Positive => (0x2e, 0xcc, 0x71),
            Tone::Neutral => (0xf3, 0xc6, 0x12),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub verdict: Verdict,
    pub tone: Tone,
}

/// Derive the recommendation for one forecast hour.
///
/// Bright moonlight forces the alert tone but leaves the weather verdict
/// untouched, so the table still tells *why* the hour is a poor pick.
/// A missing precipitation value counts as zero.
pub fn recommend(description: &str, precipitation: Option<f64>, moonlight: f64) -> Recommendation {
    let description = description.to_lowercase();
    let precipitation = precipitation.unwrap_or(0.0);

    let (verdict, tone) = if description.contains("sunny")
        || description.contains("cloudy")
        || precipitation > PRECIPITATION_LIMIT
    {
        (Verdict::No, Tone::Alert)
    } else if description.contains("clear") {
        (Verdict::Yes, Tone::Positive)
    } else {
        (Verdict::Maybe, Tone::Neutral)
    };

    let tone = if moonlight > MOONLIGHT_LIMIT { Tone::Alert } else { tone };

    Recommendation { verdict, tone }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sunny_is_no() {
        let r = recommend("sunny", Some(5.0), 0.0);
        assert_eq!(r, Recommendation { verdict: Verdict::No, tone: Tone::Alert });
    }

    #[test]
    fn clear_sky_is_yes() {
        let r = recommend("clear sky", Some(0.0), 0.0);
        assert_eq!(r, Recommendation { verdict: Verdict::Yes, tone: Tone::Positive });
    }

    #[test]
    fn bright_moon_forces_alert_tone() {
        let r = recommend("partly cloudy", Some(0.0), 0.6);
        assert_eq!(r.tone, Tone::Alert);

        let r = recommend("Mostly Clear", Some(0.0), 0.6);
        assert_eq!(r.verdict, Verdict::Yes);
        assert_eq!(r.tone, Tone::Alert);
    }

    #[test]
    fn other_descriptions_are_maybe() {
        let r = recommend("windy", Some(0.0), 0.0);
        assert_eq!(r, Recommendation { verdict: Verdict::Maybe, tone: Tone::Neutral });
    }

    #[test]
    fn precipitation_over_limit_is_no() {
        assert_eq!(recommend("Clear", Some(11.0), 0.0).verdict, Verdict::No);
        assert_eq!(recommend("Clear", Some(10.0), 0.0).verdict, Verdict::Yes);
        assert_eq!(recommend("Clear", None, 0.0).verdict, Verdict::Yes);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(recommend("Mostly Cloudy", None, 0.0).verdict, Verdict::No);
        assert_eq!(recommend("CLEAR", None, 0.0).verdict, Verdict::Yes);
    }

    #[test]
    fn half_moon_is_not_too_bright() {
        assert_eq!(recommend("Clear", None, 0.5).tone, Tone::Positive);
    }

    #[test]
    fn tone_colors_are_fixed() {
        assert_eq!(Tone::Alert.hex(), "#e74c3c");
        assert_eq!(Tone::Positive.hex(), "#2ecc71");
        assert_eq!(Tone::Neutral.hex(), "#f3c612");
    }

    #[test]
    fn rgb_matches_hex() {
        for tone in [Tone::Alert, Tone::Positive, Tone::Neutral] {
            let (r, g, b) = tone.rgb();
            assert_eq!(format!("#{r:02x}{g:02x}{b:02x}"), tone.hex());
        }
    }
}
