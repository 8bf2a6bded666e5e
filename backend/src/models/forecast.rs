//! Payloads exchanged with the external prediction service.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::amenity::AmenityCounts;
use super::area::{Area, AreaId, HousingType};
use super::series::{Price, PriceTable, TimeSeriesPoint, Year};

/// Outbound request body for `POST {base_url}/predict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub zone_index: i64,
    pub area: String,
    pub rooms_en: HousingType,
    pub amenities_counter: AmenityCounts,
    pub actual_price: PriceTable,
    /// At most one entry: the latest predicted year for `rooms_en`.
    pub predict_price: BTreeMap<Year, Price>,
}

impl PredictionRequest {
    /// Build the request for the given inputs.
    pub fn build(area: &Area, housing_type: &HousingType, amenities: &AmenityCounts) -> Self {
        let predict_price = area
            .latest_predicted_point(housing_type)
            .and_then(|point| point.price.map(|price| (point.year, price)))
            .into_iter()
            .collect();

        Self {
            zone_index: area.zone_index,
            area: area.area_name.clone(),
            rooms_en: housing_type.clone(),
            amenities_counter: *amenities,
            actual_price: area.actual_prices.clone(),
            predict_price,
        }
    }

    /// The latest predicted point sent with this request, if any.
    pub fn latest_predicted_point(&self) -> Option<TimeSeriesPoint> {
        self.predict_price
            .iter()
            .next_back()
            .map(|(year, &price)| TimeSeriesPoint::new(year.clone(), price))
    }
}

/// Inputs a forecast was requested for.
///
/// Compared by value against the live inputs when a response arrives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForecastSnapshot {
    pub area: AreaId,
    pub housing_type: HousingType,
    pub amenities: AmenityCounts,
}

impl ForecastSnapshot {
    pub fn new(area: AreaId, housing_type: HousingType, amenities: AmenityCounts) -> Self {
        Self {
            area,
            housing_type,
            amenities,
        }
    }
}

/// Custom deserializer that accepts either a string or an integer year
fn deserialize_year<'de, D>(deserializer: D) -> Result<Year, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(i64),
    }

    match StringOrInt::deserialize(deserializer)? {
        StringOrInt::String(s) => Ok(Year::from(s)),
        StringOrInt::Int(i) => Ok(Year::from(i.to_string())),
    }
}

/// Accepts a number, a numeric string, or null. Anything else reads as absent.
fn deserialize_lenient_price<'de, D>(deserializer: D) -> Result<Option<Price>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|p| p.is_finite()),
        _ => None,
    })
}

/// One forecast entry as returned by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastPoint {
    #[serde(deserialize_with = "deserialize_year")]
    pub year: Year,
    #[serde(default, deserialize_with = "deserialize_lenient_price")]
    pub price: Option<Price>,
}

impl From<ForecastPoint> for TimeSeriesPoint {
    fn from(point: ForecastPoint) -> Self {
        TimeSeriesPoint {
            year: point.year,
            price: point.price,
        }
    }
}

/// Inbound response body. A body without `forecast` does not deserialize.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResponse {
    pub forecast: Vec<ForecastPoint>,
}

impl PredictionResponse {
    pub fn into_series(self) -> Vec<TimeSeriesPoint> {
        self.forecast.into_iter().map(TimeSeriesPoint::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::amenity::AmenityKind;
    use crate::models::series::YearlyPrices;

    fn sample_area() -> Area {
        let mut actual = PriceTable::new();
        actual.insert(
            HousingType::from("1BR"),
            [(Year::from("2020"), 50.0)].into_iter().collect::<YearlyPrices>(),
        );
        let mut predicted = PriceTable::new();
        predicted.insert(
            HousingType::from("1BR"),
            [(Year::from("2023"), 90.0), (Year::from("2024"), 100.0)]
                .into_iter()
                .collect::<YearlyPrices>(),
        );
        Area {
            area_name: "Marina".to_string(),
            zone_index: 7,
            amenity_counts: [(AmenityKind::Metro, 2)].into_iter().collect(),
            actual_prices: actual,
            predicted_prices: predicted,
        }
    }

    #[test]
    fn test_request_wire_shape() {
        let area = sample_area();
        let request =
            PredictionRequest::build(&area, &HousingType::from("1BR"), &area.amenity_counts);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["zone_index"], 7);
        assert_eq!(json["area"], "Marina");
        assert_eq!(json["rooms_en"], "1BR");
        assert_eq!(json["amenities_counter"]["metro"], 2);
        assert_eq!(json["amenities_counter"]["hospital"], 0);
        assert_eq!(json["actual_price"]["1BR"]["2020"], 50.0);
        let predict = json["predict_price"].as_object().unwrap();
        assert_eq!(predict.len(), 1);
        assert_eq!(predict["2024"], 100.0);
    }

    #[test]
    fn test_request_without_predictions_sends_empty_predict_price() {
        let area = sample_area();
        let request =
            PredictionRequest::build(&area, &HousingType::from("2BR"), &AmenityCounts::zero());
        assert!(request.predict_price.is_empty());
        assert!(request.latest_predicted_point().is_none());
    }

    #[test]
    fn test_response_accepts_integer_and_string_years() {
        let body = r#"{"forecast":[{"year":"2025","price":1.5},{"year":2026,"price":"2.5"},{"year":"2027","price":null}]}"#;
        let response: PredictionResponse = serde_json::from_str(body).unwrap();
        let series = response.into_series();
        assert_eq!(series[0], TimeSeriesPoint::new("2025", 1.5));
        assert_eq!(series[1], TimeSeriesPoint::new("2026", 2.5));
        assert_eq!(series[2], TimeSeriesPoint::absent("2027"));
    }

    #[test]
    fn test_response_without_forecast_key_is_rejected() {
        let body = r#"{"error":"model failed"}"#;
        assert!(serde_json::from_str::<PredictionResponse>(body).is_err());
    }
}
