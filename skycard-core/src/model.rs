use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions for one location, as reported by the weather provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub country: String,
    pub coords: Coordinates,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub pressure_hpa: u32,
    /// Primary condition token, e.g. "Rain", "Thunderstorm", "Clear".
    pub condition: String,
    pub description: String,
    pub icon: String,
    pub observation_time: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Case-insensitive substring match against the primary condition token.
    pub fn condition_contains(&self, needle: &str) -> bool {
        condition_matches(&self.condition, needle)
    }
}

pub(crate) fn condition_matches(condition: &str, needle: &str) -> bool {
    condition.to_lowercase().contains(&needle.to_lowercase())
}

/// Air quality index, 1 (Good) to 5 (Very Poor).
///
/// Only valid indices can be constructed; an unknown reading is modelled as
/// `Option::<AirQuality>::None`, never as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AirQuality(u8);

impl AirQuality {
    pub fn from_index(index: u8) -> Option<Self> {
        (1..=5).contains(&index).then_some(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Good",
            2 => "Fair",
            3 => "Moderate",
            4 => "Poor",
            _ => "Very Poor",
        }
    }
}

impl TryFrom<u8> for AirQuality {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value).ok_or_else(|| format!("air quality index out of range: {value}"))
    }
}

impl From<AirQuality> for u8 {
    fn from(value: AirQuality) -> Self {
        value.0
    }
}

/// Non-negative UV index.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct UvIndex(f64);

impl UvIndex {
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value >= 0.0).then_some(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            v if v < 3.0 => "Low",
            v if v < 6.0 => "Moderate",
            v if v < 8.0 => "High",
            v if v < 11.0 => "Very High",
            _ => "Extreme",
        }
    }
}

/// One calendar day of aggregated forecast data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub min_c: f64,
    pub max_c: f64,
    pub condition: String,
    pub max_wind_mps: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearItem {
    pub item: String,
    pub reason: String,
}

#[cfg(test)]
pub(crate) fn snapshot_fixture(
    temperature_c: f64,
    humidity_pct: u8,
    wind_speed_mps: f64,
    condition: &str,
) -> WeatherSnapshot {
    WeatherSnapshot {
        location_name: "Paris".into(),
        country: "FR".into(),
        coords: Coordinates { lat: 48.8566, lon: 2.3522 },
        temperature_c,
        feels_like_c: temperature_c,
        humidity_pct,
        wind_speed_mps,
        pressure_hpa: 1013,
        condition: condition.into(),
        description: condition.to_lowercase(),
        icon: "01d".into(),
        observation_time: Utc::now(),
    }
}
