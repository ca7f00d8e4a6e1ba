//! Request orchestration: fans out to the upstream services, puts the cache
//! in front of the generative-text calls and runs the core engines.

use serde::Serialize;
use std::{future::Future, sync::Arc};
use tracing::{debug, info, instrument, warn};

use crate::{
    alerts::smart_alerts,
    cache::{CacheKey, Clock, ResponseCache, SystemClock},
    distance::haversine_km,
    error::UpstreamError,
    gear::recommend_gear,
    genai::TextGenerator,
    model::{AirQuality, ForecastDay, GearItem, UvIndex, WeatherSnapshot},
    parser::{AdviceDocument, VerdictDocument, parse_advice, parse_verdict},
    prompt::{advice_prompt, verdict_prompt},
    provider::WeatherProvider,
    scoring::{ComfortScore, comfort_score},
};

/// Everything shown on a single-city card.
#[derive(Debug, Clone, Serialize)]
pub struct CityReport {
    pub snapshot: WeatherSnapshot,
    pub air_quality: Option<AirQuality>,
    pub uv: Option<UvIndex>,
    pub score: ComfortScore,
    pub alerts: Vec<String>,
    pub gear: Vec<GearItem>,
    pub advice: Option<AdviceDocument>,
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CitySide {
    pub snapshot: WeatherSnapshot,
    pub air_quality: Option<AirQuality>,
    pub score: ComfortScore,
}

/// How a comparison answer can be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VerdictView {
    Structured(VerdictDocument),
    /// The answer had no usable winner; show it verbatim.
    Raw(String),
}

impl VerdictView {
    pub fn resolve(raw: String) -> Self {
        let parsed = parse_verdict(&raw);
        if parsed.has_winner() {
            Self::Structured(parsed)
        } else {
            Self::Raw(raw)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub left: CitySide,
    pub right: CitySide,
    pub distance_km: f64,
    pub verdict: Option<VerdictView>,
}

#[derive(Debug)]
pub struct WeatherService<C: Clock = SystemClock> {
    provider: Arc<dyn WeatherProvider>,
    generator: Option<Arc<dyn TextGenerator>>,
    cache: ResponseCache<C>,
}

impl<C: Clock> WeatherService<C> {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        generator: Option<Arc<dyn TextGenerator>>,
        cache: ResponseCache<C>,
    ) -> Self {
        info!(
            generative = generator.is_some(),
            ttl_minutes = cache.ttl().num_minutes(),
            "weather service ready"
        );
        Self {
            provider,
            generator,
            cache,
        }
    }

    pub fn cache(&self) -> &ResponseCache<C> {
        &self.cache
    }

    /// Only the current-conditions fetch can fail the report; air quality,
    /// UV, advice and forecast degrade to absent.
    #[instrument(skip(self))]
    pub async fn report(&self, city: &str) -> Result<CityReport, UpstreamError> {
        let snapshot = self.provider.current(city).await?;
        let coords = snapshot.coords;

        let (air_quality, uv, advice_text, forecast) = tokio::join!(
            non_critical("air quality", self.provider.air_quality(coords)),
            non_critical("uv index", self.provider.uv_index(coords)),
            self.cached_generate(CacheKey::advice(city), || advice_prompt(&snapshot)),
            non_critical("forecast", self.provider.forecast(city)),
        );

        let air_quality = air_quality.flatten();
        let uv = uv.flatten();
        let score = comfort_score(&snapshot);
        let alerts = smart_alerts(&snapshot, air_quality, score);
        let gear = recommend_gear(snapshot.temperature_c, &snapshot.condition, uv);

        Ok(CityReport {
            air_quality,
            uv,
            score,
            alerts,
            gear,
            advice: advice_text.as_deref().map(parse_advice),
            forecast: forecast.unwrap_or_default(),
            snapshot,
        })
    }

    /// Both current-condition fetches are required. The verdict cache key is
    /// order-sensitive, so `compare(a, b)` and `compare(b, a)` are cached
    /// independently.
    #[instrument(skip(self))]
    pub async fn compare(&self, city_a: &str, city_b: &str) -> Result<Comparison, UpstreamError> {
        let (a, b) = tokio::try_join!(self.provider.current(city_a), self.provider.current(city_b))?;

        let (aqi_a, aqi_b, verdict_text) = tokio::join!(
            non_critical("air quality", self.provider.air_quality(a.coords)),
            non_critical("air quality", self.provider.air_quality(b.coords)),
            self.cached_generate(CacheKey::verdict(city_a, city_b), || verdict_prompt(&a, &b)),
        );

        let distance_km = haversine_km(a.coords, b.coords);

        Ok(Comparison {
            left: side(a, aqi_a.flatten()),
            right: side(b, aqi_b.flatten()),
            distance_km,
            verdict: verdict_text.map(VerdictView::resolve),
        })
    }

    /// Cache-first generative call. Failures are logged and not cached.
    async fn cached_generate(&self, key: String, prompt: impl FnOnce() -> String) -> Option<String> {
        if let Some(hit) = self.cache.get(&key) {
            debug!(%key, "generative cache hit");
            return Some(hit);
        }

        let generator = self.generator.as_ref()?;
        debug!(%key, "generative cache miss");

        match generator.generate(&prompt()).await {
            Ok(text) => {
                self.cache.set(key, text.clone());
                Some(text)
            }
            Err(err) => {
                warn!(error = %err, %key, "generative text unavailable");
                None
            }
        }
    }
}

fn side(snapshot: WeatherSnapshot, air_quality: Option<AirQuality>) -> CitySide {
    CitySide {
        score: comfort_score(&snapshot),
        air_quality,
        snapshot,
    }
}

async fn non_critical<T>(
    what: &'static str,
    fut: impl Future<Output = Result<T, UpstreamError>>,
) -> Option<T> {
    match fut.await {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(error = %err, what, "optional upstream data unavailable");
            None
        }
    }
}
