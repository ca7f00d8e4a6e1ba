//! Plain-text rendering of weather cards.

use skycard_core::{
    AirQuality, CityReport, CitySide, Comparison, Place, TipKind, UvIndex, VerdictView,
    WeatherSnapshot, advice_tips,
};

pub fn render_report(report: &CityReport) -> String {
    let mut lines = conditions(&report.snapshot);
    lines.push(format!("Comfort: {}/10", report.score));
    lines.push(format!("Air quality: {}", air_quality(report.air_quality)));
    lines.push(format!("UV index: {}", uv(report.uv)));

    if !report.alerts.is_empty() {
        lines.push(String::new());
        lines.push("Alerts:".into());
        lines.extend(report.alerts.iter().map(|a| format!("  ! {a}")));
    }

    lines.push(String::new());
    lines.push("Gear:".into());
    lines.extend(
        report
            .gear
            .iter()
            .map(|g| format!("  - {}: {}", g.item, g.reason)),
    );

    if let Some(advice) = &report.advice {
        section(&mut lines, "Places to visit:", &advice.places);
        section(&mut lines, "Nearby:", &advice.nearby);

        let tips = advice_tips(advice);
        if !tips.is_empty() {
            lines.push(String::new());
            lines.push("Tips:".into());
            lines.extend(tips.iter().map(|t| format!("  {}: {}", tip_label(t.kind), t.text)));
        }
    }

    if !report.forecast.is_empty() {
        lines.push(String::new());
        lines.push("Forecast:".into());
        lines.extend(report.forecast.iter().map(|d| {
            format!(
                "  {}  {:>3.0}°/{:<3.0}°  {:<12} wind {:.1} m/s",
                d.date.format("%a %d %b"),
                d.min_c,
                d.max_c,
                d.condition,
                d.max_wind_mps,
            )
        }));
    }

    lines.join("\n")
}

pub fn render_comparison(comparison: &Comparison) -> String {
    let mut lines = side(&comparison.left);
    lines.push(String::new());
    lines.extend(side(&comparison.right));
    lines.push(String::new());
    lines.push(format!("Distance: {:.0} km", comparison.distance_km));

    match &comparison.verdict {
        Some(VerdictView::Structured(verdict)) => {
            lines.push(String::new());
            if let Some(summary) = &verdict.comparison {
                lines.push(summary.clone());
            }
            if let Some(winner) = &verdict.winner {
                lines.push(format!("Winner: {winner}"));
            }
            if let Some(reason) = &verdict.reason {
                lines.push(format!("Why: {reason}"));
            }
        }
        Some(VerdictView::Raw(text)) => {
            lines.push(String::new());
            lines.push(text.trim().to_string());
        }
        None => {}
    }

    lines.join("\n")
}

fn conditions(snapshot: &WeatherSnapshot) -> Vec<String> {
    vec![
        format!(
            "{}, {}: {:.1}°C (feels like {:.1}°C)",
            snapshot.location_name,
            snapshot.country,
            snapshot.temperature_c,
            snapshot.feels_like_c
        ),
        format!("{} ({})", snapshot.condition, snapshot.description),
        format!(
            "Humidity {}%  Wind {:.1} m/s  Pressure {} hPa",
            snapshot.humidity_pct, snapshot.wind_speed_mps, snapshot.pressure_hpa
        ),
    ]
}

fn side(side: &CitySide) -> Vec<String> {
    let mut lines = conditions(&side.snapshot);
    lines.push(format!(
        "Comfort: {}/10  Air quality: {}",
        side.score,
        air_quality(side.air_quality)
    ));
    lines
}

fn section(lines: &mut Vec<String>, title: &str, places: &[Place]) {
    if places.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(title.into());
    for (i, place) in places.iter().enumerate() {
        if place.description.is_empty() {
            lines.push(format!("  {}. {}", i + 1, place.name));
        } else {
            lines.push(format!("  {}. {} - {}", i + 1, place.name, place.description));
        }
    }
}

fn air_quality(aqi: Option<AirQuality>) -> String {
    match aqi {
        Some(aqi) => format!("{} ({}/5)", aqi.label(), aqi.index()),
        None => "unknown".into(),
    }
}

fn uv(uv: Option<UvIndex>) -> String {
    match uv {
        Some(uv) => format!("{:.1} ({})", uv.value(), uv.label()),
        None => "unknown".into(),
    }
}

fn tip_label(kind: TipKind) -> &'static str {
    match kind {
        TipKind::Wear => "Wear",
        TipKind::Eat => "Eat",
        TipKind::Alert => "Heads up",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use skycard_core::{
        ComfortScore, Coordinates, ForecastDay, GearItem, VerdictDocument, parse_advice,
    };

    fn snapshot(name: &str, temp: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            location_name: name.into(),
            country: "FR".into(),
            coords: Coordinates { lat: 48.85, lon: 2.35 },
            temperature_c: temp,
            feels_like_c: temp - 1.0,
            humidity_pct: 45,
            wind_speed_mps: 3.0,
            pressure_hpa: 1013,
            condition: "Clear".into(),
            description: "clear sky".into(),
            icon: "01d".into(),
            observation_time: Utc::now(),
        }
    }

    fn report() -> CityReport {
        CityReport {
            snapshot: snapshot("Paris", 22.0),
            air_quality: AirQuality::from_index(2),
            uv: None,
            score: ComfortScore::clamped(9.0),
            alerts: vec!["Poor air quality: wear a mask outdoors.".into()],
            gear: vec![GearItem {
                item: "Comfortable Shoes".into(),
                reason: "Great weather for walking".into(),
            }],
            advice: Some(parse_advice(
                "PLACES:\n1. Louvre - Art museum\n2. Montmartre\nWEAR: Light layers\nALERT: None",
            )),
            forecast: vec![ForecastDay {
                date: NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date"),
                min_c: 14.0,
                max_c: 23.0,
                condition: "Clouds".into(),
                max_wind_mps: 5.0,
            }],
        }
    }

    #[test]
    fn report_card_has_every_section() {
        let text = render_report(&report());

        assert!(text.starts_with("Paris, FR: 22.0°C (feels like 21.0°C)"));
        assert!(text.contains("Comfort: 9.0/10"));
        assert!(text.contains("Air quality: Fair (2/5)"));
        assert!(text.contains("UV index: unknown"));
        assert!(text.contains("  ! Poor air quality"));
        assert!(text.contains("  - Comfortable Shoes: Great weather for walking"));
        assert!(text.contains("  1. Louvre - Art museum"));
        assert!(text.contains("  2. Montmartre\n"));
        assert!(text.contains("  Wear: Light layers"));
        assert!(text.contains("Sat 01 Jun"));
    }

    #[test]
    fn none_alert_is_not_rendered() {
        let text = render_report(&report());
        assert!(!text.contains("Heads up"));
        assert!(!text.contains("None"));
    }

    #[test]
    fn report_without_advice_or_forecast() {
        let mut r = report();
        r.advice = None;
        r.forecast.clear();
        r.alerts.clear();

        let text = render_report(&r);
        assert!(!text.contains("Alerts:"));
        assert!(!text.contains("Places to visit:"));
        assert!(!text.contains("Forecast:"));
    }

    fn comparison(verdict: Option<VerdictView>) -> Comparison {
        Comparison {
            left: CitySide {
                snapshot: snapshot("Paris", 21.0),
                air_quality: None,
                score: ComfortScore::clamped(10.0),
            },
            right: CitySide {
                snapshot: snapshot("Lyon", 25.0),
                air_quality: AirQuality::from_index(1),
                score: ComfortScore::clamped(8.0),
            },
            distance_km: 391.6,
            verdict,
        }
    }

    #[test]
    fn structured_verdict() {
        let text = render_comparison(&comparison(Some(VerdictView::Structured(VerdictDocument {
            comparison: Some("Both are sunny.".into()),
            winner: Some("Paris".into()),
            reason: Some("Milder".into()),
        }))));

        assert!(text.contains("Distance: 392 km"));
        assert!(text.contains("Comfort: 10.0/10  Air quality: unknown"));
        assert!(text.contains("Both are sunny."));
        assert!(text.contains("Winner: Paris"));
        assert!(text.contains("Why: Milder"));
    }

    #[test]
    fn raw_verdict_is_shown_verbatim() {
        let text = render_comparison(&comparison(Some(VerdictView::Raw(
            "  Hard to pick one.  ".into(),
        ))));

        assert!(text.ends_with("Hard to pick one."));
        assert!(!text.contains("Winner:"));
    }
}
