//! Yearly price series types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::area::HousingType;
use crate::define_key_type;

define_key_type!(
    /// Period label of a price observation, e.g. `"2024"`.
    ///
    /// Treated as opaque text; ordering is lexical, which matches numeric
    /// ordering for the fixed-width four-digit years the upstream data uses.
    Year
);

/// Price value in the source currency.
pub type Price = f64;

/// Prices of one housing type keyed by year.
pub type YearlyPrices = BTreeMap<Year, Price>;

/// Canonical price table: housing type -> year -> price.
pub type PriceTable = BTreeMap<HousingType, YearlyPrices>;

/// A single `(year, price)` observation. The price may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub year: Year,
    pub price: Option<Price>,
}

impl TimeSeriesPoint {
    pub fn new(year: impl Into<Year>, price: Price) -> Self {
        Self {
            year: year.into(),
            price: Some(price),
        }
    }

    pub fn absent(year: impl Into<Year>) -> Self {
        Self {
            year: year.into(),
            price: None,
        }
    }
}

/// Convert a year map into an ascending sequence of points.
pub fn series_from_prices(prices: &YearlyPrices) -> Vec<TimeSeriesPoint> {
    prices
        .iter()
        .map(|(year, &price)| TimeSeriesPoint::new(year.clone(), price))
        .collect()
}

/// Highest-year entry of a year map, if any.
pub fn latest_point(prices: &YearlyPrices) -> Option<TimeSeriesPoint> {
    prices
        .iter()
        .next_back()
        .map(|(year, &price)| TimeSeriesPoint::new(year.clone(), price))
}
