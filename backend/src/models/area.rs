//! Canonical area record and housing types.

use std::fmt;

use serde::Serialize;

use super::amenity::AmenityCounts;
use super::series::{latest_point, series_from_prices, PriceTable, TimeSeriesPoint};
use crate::define_key_type;

define_key_type!(
    /// Unit-size category under which prices are keyed, e.g. `"1 B/R"`.
    HousingType
);

/// Housing type selected before any area is chosen and after a reset.
pub const DEFAULT_HOUSING_TYPE: &str = "1 B/R";

/// Housing types offered when an area carries no actual prices.
pub const FALLBACK_HOUSING_TYPES: [&str; 6] =
    ["Studio", "1 B/R", "2 B/R", "3 B/R", "4 B/R", "5 B/R"];

impl Default for HousingType {
    fn default() -> Self {
        HousingType::from(DEFAULT_HOUSING_TYPE)
    }
}

/// Stable identity of a map feature.
///
/// Two payloads with equal name and zone index denote the same area.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AreaId {
    pub area_name: String,
    pub zone_index: i64,
}

impl AreaId {
    pub fn new(area_name: impl Into<String>, zone_index: i64) -> Self {
        Self {
            area_name: area_name.into(),
            zone_index,
        }
    }

    /// Feature id used by the map layer for highlighting: `name_zone`.
    pub fn feature_id(&self) -> String {
        format!("{}_{}", self.area_name, self.zone_index)
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.area_name, self.zone_index)
    }
}

/// A selectable zone with its amenity counts and price tables.
///
/// Replaced wholesale on a new selection, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Area {
    pub area_name: String,
    pub zone_index: i64,
    pub amenity_counts: AmenityCounts,
    pub actual_prices: PriceTable,
    pub predicted_prices: PriceTable,
}

impl Area {
    pub fn id(&self) -> AreaId {
        AreaId::new(self.area_name.clone(), self.zone_index)
    }

    /// Housing types with actual prices, or the fallback set when there are none.
    pub fn housing_types(&self) -> Vec<HousingType> {
        if self.actual_prices.is_empty() {
            fallback_housing_types()
        } else {
            self.actual_prices.keys().cloned().collect()
        }
    }

    pub fn actual_series(&self, housing_type: &HousingType) -> Vec<TimeSeriesPoint> {
        self.actual_prices
            .get(housing_type)
            .map(series_from_prices)
            .unwrap_or_default()
    }

    pub fn predicted_series(&self, housing_type: &HousingType) -> Vec<TimeSeriesPoint> {
        self.predicted_prices
            .get(housing_type)
            .map(series_from_prices)
            .unwrap_or_default()
    }

    /// The highest-year predicted point for `housing_type`.
    pub fn latest_predicted_point(&self, housing_type: &HousingType) -> Option<TimeSeriesPoint> {
        self.predicted_prices.get(housing_type).and_then(latest_point)
    }
}

pub fn fallback_housing_types() -> Vec<HousingType> {
    FALLBACK_HOUSING_TYPES.iter().map(|&t| HousingType::from(t)).collect()
}

/// Housing types offered for an optional selection.
pub fn housing_type_options(area: Option<&Area>) -> Vec<HousingType> {
    area.map(Area::housing_types)
        .unwrap_or_else(fallback_housing_types)
}
