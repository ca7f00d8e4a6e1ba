use crate::{
    Config,
    error::{UpstreamError, truncate_body},
    model::{AirQuality, Coordinates, ForecastDay, UvIndex, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::{convert::TryFrom, fmt::Debug, sync::Arc};
use tracing::debug;

pub mod openweather;

/// Third-party services that need an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    Gemini,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::Gemini => "gemini",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::Gemini]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "gemini" => Ok(ProviderId::Gemini),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, gemini."
            )),
        }
    }
}

/// Source of weather, air quality and UV data.
///
/// `air_quality` and `uv_index` return `Ok(None)` when the service answers
/// but has no usable reading.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, UpstreamError>;

    async fn air_quality(&self, coords: Coordinates) -> Result<Option<AirQuality>, UpstreamError>;

    async fn uv_index(&self, coords: Coordinates) -> Result<Option<UvIndex>, UpstreamError>;

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastDay>, UpstreamError>;
}

/// Construct the weather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let id = ProviderId::OpenWeather;
    let api_key = config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `skycard configure {id}` and enter your API key."
        )
    })?;

    Ok(Arc::new(OpenWeatherProvider::new(api_key.to_owned())))
}

/// Send `request`, check the status and decode the JSON body.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    service: &'static str,
) -> Result<T, UpstreamError> {
    let res = request
        .send()
        .await
        .map_err(|source| UpstreamError::Request { service, source })?;

    let status = res.status();
    debug!(service, %status, url = %res.url().path(), "upstream response");

    let body = res
        .text()
        .await
        .map_err(|source| UpstreamError::Request { service, source })?;

    if !status.is_success() {
        return Err(UpstreamError::Status {
            service,
            status,
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|source| UpstreamError::Decode { service, source })
}
