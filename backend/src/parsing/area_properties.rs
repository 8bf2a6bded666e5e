//! Normalization of a clicked feature's property bag into an [`Area`].

use serde_json::{Map, Value};
use tracing::debug;

use super::price_record::parse_price_record;
use crate::models::{AmenityCounts, AmenityKind, Area};

/// Raw property bag of one map feature.
pub type RawProperties = Map<String, Value>;

pub const AREA_NAME_KEY: &str = "AreaName";
pub const ZONE_INDEX_KEY: &str = "ZoneIndex";
pub const ACTUAL_PRICE_KEY: &str = "ActualPrice";
pub const PREDICT_PRICE_KEY: &str = "PredictPrice";

/// Build a canonical [`Area`] from raw feature properties.
///
/// Missing or malformed fields fall back to empty/zero values.
pub fn normalize_area(props: &RawProperties) -> Area {
    let area_name = props.get(AREA_NAME_KEY).map(text_value).unwrap_or_default();
    let zone_index = props.get(ZONE_INDEX_KEY).and_then(integer_value).unwrap_or(0);

    let amenity_counts = AmenityKind::ALL
        .iter()
        .map(|&kind| (kind, resolve_amenity(props, kind)))
        .collect::<AmenityCounts>();

    let area = Area {
        area_name,
        zone_index,
        amenity_counts,
        actual_prices: parse_price_record(props.get(ACTUAL_PRICE_KEY)),
        predicted_prices: parse_price_record(props.get(PREDICT_PRICE_KEY)),
    };

    debug!(
        area = %area.id(),
        housing_types = area.actual_prices.len(),
        predicted_types = area.predicted_prices.len(),
        "Normalized area properties"
    );
    area
}

/// Probe the exact key, then the capitalized key, then the lower-cased key.
/// The first one present wins.
fn resolve_amenity(props: &RawProperties, kind: AmenityKind) -> u32 {
    let key = kind.key();
    let candidates = [key.to_string(), capitalize(key), key.to_lowercase()];

    candidates
        .iter()
        .find_map(|candidate| props.get(candidate))
        .map(count_value)
        .unwrap_or(0)
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Non-negative amenity count; negatives clamp to zero, non-numbers read as zero.
fn count_value(value: &Value) -> u32 {
    integer_value(value)
        .map(|n| n.clamp(0, i64::from(u32::MAX)) as u32)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> RawProperties {
        match value {
            Value::Object(map) => map,
            _ => panic!("test properties must be an object"),
        }
    }

    #[test]
    fn test_normalize_full_payload() {
        let raw = props(json!({
            "AreaName": "Jumeirah",
            "ZoneIndex": 4,
            "ActualPrice": "{\"1BR\":{\"2020\":50}}{\"2BR\":{\"2020\":70}}",
            "PredictPrice": {"1BR": {"2024": 100}},
            "hospital": 2,
            "Metro": 1,
            "poi": 5
        }));
        let area = normalize_area(&raw);

        assert_eq!(area.area_name, "Jumeirah");
        assert_eq!(area.zone_index, 4);
        assert_eq!(area.actual_prices.len(), 2);
        assert_eq!(area.actual_prices["1BR"]["2020"], 50.0);
        assert_eq!(area.actual_prices["2BR"]["2020"], 70.0);
        assert_eq!(area.predicted_prices["1BR"]["2024"], 100.0);
        assert_eq!(area.amenity_counts.get(AmenityKind::Hospital), 2);
        assert_eq!(area.amenity_counts.get(AmenityKind::Metro), 1);
        assert_eq!(area.amenity_counts.get(AmenityKind::PointOfInterest), 5);
        assert_eq!(area.amenity_counts.get(AmenityKind::Cemetery), 0);
    }

    #[test]
    fn test_missing_fields_default() {
        let area = normalize_area(&RawProperties::new());
        assert_eq!(area.area_name, "");
        assert_eq!(area.zone_index, 0);
        assert_eq!(area.amenity_counts, AmenityCounts::zero());
        assert!(area.actual_prices.is_empty());
        assert!(area.predicted_prices.is_empty());
    }

    #[test]
    fn test_exact_key_wins_over_capitalized() {
        let raw = props(json!({"park": 3, "Park": 9}));
        let area = normalize_area(&raw);
        assert_eq!(area.amenity_counts.get(AmenityKind::Park), 3);
    }

    #[test]
    fn test_amenity_value_coercion() {
        let raw = props(json!({"bar": -4, "school": "6", "office": "many", "prison": 2.0}));
        let counts = normalize_area(&raw).amenity_counts;
        assert_eq!(counts.get(AmenityKind::Bar), 0);
        assert_eq!(counts.get(AmenityKind::School), 6);
        assert_eq!(counts.get(AmenityKind::Office), 0);
        assert_eq!(counts.get(AmenityKind::Prison), 2);
    }

    #[test]
    fn test_zone_index_as_string() {
        let raw = props(json!({"AreaName": "Deira", "ZoneIndex": "12"}));
        assert_eq!(normalize_area(&raw).zone_index, 12);
    }

    #[test]
    fn test_malformed_prices_collapse_to_empty() {
        let raw = props(json!({"AreaName": "Deira", "ActualPrice": "{{{", "PredictPrice": 17}));
        let area = normalize_area(&raw);
        assert!(area.actual_prices.is_empty());
        assert!(area.predicted_prices.is_empty());
    }

    #[test]
    fn test_same_name_and_zone_is_same_identity() {
        let a = normalize_area(&props(json!({"AreaName": "Deira", "ZoneIndex": 1, "bar": 1})));
        let b = normalize_area(&props(json!({"AreaName": "Deira", "ZoneIndex": 1, "bar": 7})));
        assert_eq!(a.id(), b.id());
        assert_eq!(a.id().feature_id(), "Deira_1");
    }
}
