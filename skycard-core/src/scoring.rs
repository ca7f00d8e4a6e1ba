//! Comfort score: a 0-10 rating derived from temperature, humidity and
//! the primary weather condition.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{WeatherSnapshot, condition_matches};

const BASE: f64 = 5.0;
const MIN: f64 = 0.0;
const MAX: f64 = 10.0;

/// Condition tokens that cost comfort points.
const PENALISED_CONDITIONS: &[&str] = &["rain", "snow", "thunder"];

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ComfortScore(f64);

impl ComfortScore {
    /// Clamps `raw` into `[0, 10]`.
    pub fn clamped(raw: f64) -> Self {
        Self(raw.clamp(MIN, MAX))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for ComfortScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

pub fn comfort_score(snapshot: &WeatherSnapshot) -> ComfortScore {
    score_from(
        snapshot.temperature_c,
        snapshot.humidity_pct,
        &snapshot.condition,
    )
}

fn score_from(temp: f64, humidity: u8, condition: &str) -> ComfortScore {
    let mut score = BASE;

    // Bonus tiers are disjoint; at most one applies.
    if (18.0..=26.0).contains(&temp) {
        score += 3.0;
    } else if (10.0..18.0).contains(&temp) || (temp > 26.0 && temp <= 32.0) {
        score += 1.0;
    }

    if (30..=60).contains(&humidity) {
        score += 2.0;
    }

    if temp > 35.0 || temp < 0.0 {
        score -= 3.0;
    }

    if humidity > 80 {
        score -= 1.0;
    }

    if PENALISED_CONDITIONS
        .iter()
        .any(|token| condition_matches(condition, token))
    {
        score -= 2.0;
    }

    ComfortScore::clamped(score)
}
