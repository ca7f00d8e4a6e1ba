use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::instrument;

use crate::{
    error::UpstreamError,
    model::{AirQuality, Coordinates, ForecastDay, UvIndex, WeatherSnapshot},
    provider::fetch_json,
};

use super::WeatherProvider;

const SERVICE: &str = "OpenWeather";
const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const FORECAST_DAYS: usize = 5;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            http: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/data/2.5/{path}", self.base_url)
    }

    fn by_city(&self, path: &str, city: &str) -> reqwest::RequestBuilder {
        self.http.get(self.endpoint(path)).query(&[
            ("q", city),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ])
    }

    fn by_coords(&self, path: &str, coords: Coordinates) -> reqwest::RequestBuilder {
        self.http.get(self.endpoint(path)).query(&[
            ("lat", coords.lat.to_string()),
            ("lon", coords.lon.to_string()),
            ("appid", self.api_key.clone()),
        ])
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    #[serde(default)]
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    coord: OwCoord,
    #[serde(default)]
    sys: OwSys,
    dt: Option<i64>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwAirMain {
    aqi: u8,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    main: OwAirMain,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    #[serde(default)]
    list: Vec<OwAirEntry>,
}

#[derive(Debug, Deserialize)]
struct OwUvCurrent {
    uvi: Option<f64>,
}

/// Accepts both the One Call shape (`{current: {uvi}}`) and the legacy
/// UV endpoint shape (`{value}`).
#[derive(Debug, Deserialize)]
struct OwUvResponse {
    current: Option<OwUvCurrent>,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

impl From<OwCurrentResponse> for WeatherSnapshot {
    fn from(parsed: OwCurrentResponse) -> Self {
        let observation_time = parsed.dt.and_then(unix_to_utc).unwrap_or_else(Utc::now);
        let (condition, description, icon) = match parsed.weather.into_iter().next() {
            Some(w) => (w.main, w.description, w.icon),
            None => ("Unknown".to_string(), String::new(), String::new()),
        };

        WeatherSnapshot {
            location_name: parsed.name,
            country: parsed.sys.country,
            coords: Coordinates {
                lat: parsed.coord.lat,
                lon: parsed.coord.lon,
            },
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            pressure_hpa: parsed.main.pressure,
            condition,
            description,
            icon,
            observation_time,
        }
    }
}

#[derive(Debug)]
struct DayAccumulator {
    min_c: f64,
    max_c: f64,
    max_wind_mps: f64,
    /// Condition counts in first-seen order.
    conditions: Vec<(String, usize)>,
}

impl DayAccumulator {
    fn new(entry: &OwForecastEntry) -> Self {
        Self {
            min_c: entry.main.temp,
            max_c: entry.main.temp,
            max_wind_mps: entry.wind.speed,
            conditions: Vec::new(),
        }
    }

    fn add(&mut self, entry: &OwForecastEntry) {
        self.min_c = self.min_c.min(entry.main.temp);
        self.max_c = self.max_c.max(entry.main.temp);
        self.max_wind_mps = self.max_wind_mps.max(entry.wind.speed);

        let condition = entry.weather.first().map_or("Unknown", |w| w.main.as_str());
        match self.conditions.iter_mut().find(|(c, _)| c == condition) {
            Some((_, count)) => *count += 1,
            None => self.conditions.push((condition.to_string(), 1)),
        }
    }

    fn dominant_condition(&self) -> String {
        let mut best: Option<&(String, usize)> = None;
        for candidate in &self.conditions {
            if best.is_none_or(|(_, count)| candidate.1 > *count) {
                best = Some(candidate);
            }
        }
        best.map_or_else(|| "Unknown".to_string(), |(c, _)| c.clone())
    }
}

/// Folds 3-hourly entries into per-day summaries keyed by UTC date.
fn aggregate_daily(entries: &[OwForecastEntry]) -> Vec<ForecastDay> {
    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();

    for entry in entries {
        let Some(date) = unix_to_utc(entry.dt).map(|dt| dt.date_naive()) else {
            continue;
        };
        days.entry(date)
            .or_insert_with(|| DayAccumulator::new(entry))
            .add(entry);
    }

    days.into_iter()
        .take(FORECAST_DAYS)
        .map(|(date, acc)| ForecastDay {
            date,
            min_c: acc.min_c,
            max_c: acc.max_c,
            condition: acc.dominant_condition(),
            max_wind_mps: acc.max_wind_mps,
        })
        .collect()
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, UpstreamError> {
        let parsed: OwCurrentResponse = fetch_json(self.by_city("weather", city), SERVICE).await?;
        Ok(parsed.into())
    }

    #[instrument(skip(self))]
    async fn air_quality(&self, coords: Coordinates) -> Result<Option<AirQuality>, UpstreamError> {
        let parsed: OwAirResponse =
            fetch_json(self.by_coords("air_pollution", coords), SERVICE).await?;

        Ok(parsed
            .list
            .first()
            .and_then(|entry| AirQuality::from_index(entry.main.aqi)))
    }

    #[instrument(skip(self))]
    async fn uv_index(&self, coords: Coordinates) -> Result<Option<UvIndex>, UpstreamError> {
        let parsed: OwUvResponse = fetch_json(self.by_coords("uvi", coords), SERVICE).await?;

        Ok(parsed
            .current
            .and_then(|c| c.uvi)
            .or(parsed.value)
            .and_then(UvIndex::new))
    }

    #[instrument(skip(self))]
    async fn forecast(&self, city: &str) -> Result<Vec<ForecastDay>, UpstreamError> {
        let parsed: OwForecastResponse =
            fetch_json(self.by_city("forecast", city), SERVICE).await?;
        Ok(aggregate_daily(&parsed.list))
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
