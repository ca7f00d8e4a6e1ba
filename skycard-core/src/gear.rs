use crate::model::{GearItem, UvIndex, condition_matches};

const WET_CONDITIONS: &[&str] = &["rain", "drizzle", "thunderstorm"];

/// Items worth packing for the given conditions, in a stable order.
pub fn recommend_gear(temperature_c: f64, condition: &str, uv: Option<UvIndex>) -> Vec<GearItem> {
    let mut gear = Vec::new();

    if uv.is_some_and(|uv| uv.value() > 5.0) {
        gear.push(item("Sunscreen", "UV index is high"));
        gear.push(item("Hat/Sunglasses", "Protect your eyes and face from the sun"));
    }

    if WET_CONDITIONS
        .iter()
        .any(|token| condition_matches(condition, token))
    {
        gear.push(item("Umbrella", "Wet weather expected"));
    }

    if condition_matches(condition, "snow") {
        gear.push(item("Boots", "Snow on the ground"));
    }

    if temperature_c < 15.0 {
        gear.push(item("Coat/Jacket", "It's chilly outside"));
    } else if temperature_c > 30.0 {
        gear.push(item("Water Bottle", "Stay hydrated in the heat"));
    }

    if gear.is_empty() {
        gear.push(item("Comfortable Shoes", "Great weather for walking"));
    }

    gear
}

fn item(item: &str, reason: &str) -> GearItem {
    GearItem {
        item: item.to_owned(),
        reason: reason.to_owned(),
    }
}
