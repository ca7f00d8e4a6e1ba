//! Rule-based safety alerts.
//!
//! Rules are evaluated in a fixed priority order (heat/cold, wind, humidity,
//! storm conditions, air quality, overall score) and every rule that fires
//! appends its message, so the output order never depends on the input.

use crate::{
    model::{AirQuality, WeatherSnapshot},
    scoring::ComfortScore,
};

pub const EXTREME_HEAT: &str = "Extreme heat: avoid the outdoors during the day and stay hydrated.";
pub const HIGH_HEAT: &str = "High heat advisory: limit time in direct sun and drink plenty of water.";
pub const SEVERE_COLD: &str = "Severe cold: frostbite risk, cover exposed skin.";
pub const COLD: &str = "Cold advisory: dress in warm layers.";
pub const STRONG_WIND: &str = "Strong wind advisory: secure loose objects and take care outdoors.";
pub const HIGH_HUMIDITY: &str = "Very high humidity: it will feel hotter than it is.";
pub const THUNDERSTORM: &str = "Thunderstorm warning: seek shelter and avoid open areas.";
pub const SNOWFALL: &str = "Snowfall warning: roads and paths may be slippery.";
pub const RAIN_AND_WIND: &str = "Heavy rain with wind: umbrellas may not hold up, consider a raincoat.";
pub const POOR_AIR: &str = "Poor air quality: wear a mask outdoors.";
pub const HAZARDOUS_AIR: &str = "Hazardous air quality: avoid outdoor activity.";
pub const CHALLENGING: &str = "Conditions are challenging today: plan indoor alternatives.";

const HIGH_WIND_MPS: f64 = 15.0;
const RAIN_WIND_MPS: f64 = 10.0;
const CHALLENGING_SCORE: f64 = 3.0;

pub fn smart_alerts(
    snapshot: &WeatherSnapshot,
    air_quality: Option<AirQuality>,
    score: ComfortScore,
) -> Vec<String> {
    let mut alerts: Vec<&'static str> = Vec::new();
    let temp = snapshot.temperature_c;

    if temp > 40.0 {
        alerts.push(EXTREME_HEAT);
    } else if temp > 35.0 {
        alerts.push(HIGH_HEAT);
    }

    if temp < -5.0 {
        alerts.push(SEVERE_COLD);
    } else if temp < 5.0 {
        alerts.push(COLD);
    }

    if snapshot.wind_speed_mps > HIGH_WIND_MPS {
        alerts.push(STRONG_WIND);
    }

    if snapshot.humidity_pct > 85 {
        alerts.push(HIGH_HUMIDITY);
    }

    if snapshot.condition_contains("thunder") {
        alerts.push(THUNDERSTORM);
    }

    if snapshot.condition_contains("snow") {
        alerts.push(SNOWFALL);
    }

    // Rain alone is not alert-worthy, only rain driven by wind.
    if snapshot.condition_contains("rain") && snapshot.wind_speed_mps > RAIN_WIND_MPS {
        alerts.push(RAIN_AND_WIND);
    }

    // Unknown air quality skips both rules.
    if let Some(aqi) = air_quality {
        if aqi.index() >= 4 {
            alerts.push(POOR_AIR);
        }
        if aqi.index() >= 5 {
            alerts.push(HAZARDOUS_AIR);
        }
    }

    if score.value() < CHALLENGING_SCORE {
        alerts.push(CHALLENGING);
    }

    alerts.into_iter().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::snapshot_fixture, scoring::comfort_score};

    fn run(snapshot: &WeatherSnapshot, aqi: Option<u8>) -> Vec<String> {
        let score = comfort_score(snapshot);
        smart_alerts(snapshot, aqi.and_then(AirQuality::from_index), score)
    }

    #[test]
    fn pleasant_day_has_no_alerts() {
        let snap = snapshot_fixture(22.0, 45, 3.0, "Clear");
        assert!(run(&snap, Some(1)).is_empty());
    }

    #[test]
    fn rules_do_not_short_circuit() {
        let snap = snapshot_fixture(45.0, 90, 20.0, "Thunderstorm");
        let alerts = run(&snap, Some(5));

        assert_eq!(
            alerts,
            vec![
                EXTREME_HEAT,
                STRONG_WIND,
                HIGH_HUMIDITY,
                THUNDERSTORM,
                POOR_AIR,
                HAZARDOUS_AIR,
                CHALLENGING,
            ]
        );
    }

    #[test]
    fn heat_and_cold_tiers_are_exclusive() {
        assert_eq!(run(&snapshot_fixture(37.0, 50, 1.0, "Clear"), None), vec![HIGH_HEAT]);
        assert_eq!(run(&snapshot_fixture(2.0, 50, 1.0, "Clear"), None), vec![COLD]);

        let severe = run(&snapshot_fixture(-8.0, 50, 1.0, "Clear"), None);
        assert!(severe.contains(&SEVERE_COLD.to_string()));
        assert!(!severe.contains(&COLD.to_string()));
    }

    #[test]
    fn rain_needs_wind_to_alert() {
        let calm = run(&snapshot_fixture(20.0, 50, 5.0, "Rain"), None);
        assert!(calm.is_empty(), "{calm:?}");

        let windy = run(&snapshot_fixture(20.0, 50, 12.0, "Rain"), None);
        assert_eq!(windy, vec![RAIN_AND_WIND]);
    }

    #[test]
    fn poor_air_without_hazard_at_four() {
        let snap = snapshot_fixture(22.0, 45, 3.0, "Clear");
        assert_eq!(run(&snap, Some(4)), vec![POOR_AIR]);
    }

    #[test]
    fn unknown_air_quality_skips_air_rules() {
        let snap = snapshot_fixture(22.0, 45, 3.0, "Clear");
        assert!(run(&snap, None).is_empty());
    }

    #[test]
    fn low_score_falls_back_to_generic_alert() {
        let snap = snapshot_fixture(22.0, 45, 3.0, "Clear");
        let alerts = smart_alerts(&snap, None, ComfortScore::clamped(2.5));
        assert_eq!(alerts, vec![CHALLENGING]);
    }
}
