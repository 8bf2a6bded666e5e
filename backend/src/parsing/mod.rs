//! Parsing of raw map-feature properties into canonical domain records.
//!
//! Upstream feature properties are loosely structured: price tables arrive as
//! back-to-back concatenated JSON objects and amenity counts use inconsistent
//! key casing. Nothing in this module fails; malformed input collapses to the
//! canonical "no data" value.

pub mod area_properties;
pub mod price_record;


pub use area_properties::{normalize_area, RawProperties};
pub use price_record::{parse_price_blob, parse_price_record};
