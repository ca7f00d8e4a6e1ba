//! Core library for the `skycard` weather cards.
//!
//! This crate defines:
//! - Comfort scoring, safety alerts and gear recommendations
//! - Parsing of generative-text advice and comparison verdicts
//! - A short-lived response cache in front of the generative-text service
//! - Upstream clients (OpenWeather, Gemini) and the service tying them together
//!
//! It is used by `skycard-cli`, but can also be reused by other binaries or services.

pub mod alerts;
pub mod cache;
pub mod config;
pub mod distance;
pub mod error;
pub mod gear;
pub mod genai;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod provider;
pub mod scoring;
pub mod service;

pub use alerts::smart_alerts;
pub use cache::{CacheKey, Clock, ManualClock, ResponseCache, SystemClock};
pub use config::{Config, ProviderConfig};
pub use distance::haversine_km;
pub use error::UpstreamError;
pub use gear::recommend_gear;
pub use genai::{GeminiClient, TextGenerator, generator_from_config};
pub use model::{AirQuality, Coordinates, ForecastDay, GearItem, UvIndex, WeatherSnapshot};
pub use parser::{
    AdviceDocument, Place, Tip, TipKind, VerdictDocument, advice_tips, parse_advice, parse_verdict,
};
pub use provider::{ProviderId, WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use scoring::{ComfortScore, comfort_score};
pub use service::{CityReport, CitySide, Comparison, VerdictView, WeatherService};
