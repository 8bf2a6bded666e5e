//! Domain types: areas, amenities, price series and prediction-service payloads.

pub mod amenity;
pub mod area;
pub mod forecast;
pub mod macros;
pub mod series;

pub use amenity::{AmenityCounts, AmenityKind};
pub use area::{
    fallback_housing_types, housing_type_options, Area, AreaId, HousingType,
    DEFAULT_HOUSING_TYPE, FALLBACK_HOUSING_TYPES,
};
pub use forecast::{ForecastPoint, ForecastSnapshot, PredictionRequest, PredictionResponse};
pub use series::{Price, PriceTable, TimeSeriesPoint, Year, YearlyPrices};
