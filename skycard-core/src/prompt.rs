//! Prompts for the generative-text service. Both ask for the labelled
//! section format understood by [`crate::parser`].

use crate::model::WeatherSnapshot;

fn describe(snapshot: &WeatherSnapshot) -> String {
    format!(
        "{}, {}: {:.0}°C (feels like {:.0}°C), {}, humidity {}%, wind {:.1} m/s",
        snapshot.location_name,
        snapshot.country,
        snapshot.temperature_c,
        snapshot.feels_like_c,
        snapshot.description,
        snapshot.humidity_pct,
        snapshot.wind_speed_mps,
    )
}

pub fn advice_prompt(snapshot: &WeatherSnapshot) -> String {
    format!(
        "You are a local travel guide. Current weather in {weather}.\n\
         Suggest what to do today given this weather. Answer using exactly these labels, \
         each at the start of a line, and nothing else:\n\
         PLACES:\n\
         1. Name - one-line description\n\
         (3 places in {city} suited to this weather)\n\
         NEARBY:\n\
         1. Name - distance, one-line description\n\
         (2 day trips near {city})\n\
         WEAR: one sentence on what to wear\n\
         EAT: one local dish or drink that fits the weather\n\
         ALERT: one safety note, or None if there is nothing notable",
        weather = describe(snapshot),
        city = snapshot.location_name,
    )
}

pub fn verdict_prompt(a: &WeatherSnapshot, b: &WeatherSnapshot) -> String {
    format!(
        "Compare the weather in two cities for a visitor today.\n\
         City A: {}\n\
         City B: {}\n\
         Answer using exactly these labels:\n\
         COMPARISON: two sentences comparing the conditions\n\
         WINNER: the name of the city with the better weather, nothing else\n\
         REASON: one short sentence",
        describe(a),
        describe(b),
    )
}
