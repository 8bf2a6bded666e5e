use serde_json::{Map, Value};
use tracing::debug;

use crate::models::{HousingType, Price, PriceTable, Year, YearlyPrices};

const FRAGMENT_BOUNDARY: &str = "}{";

/// Parse a raw price field into a canonical price table.
///
/// - absent / `null` / empty text -> empty table
/// - text -> concatenated-fragment parse via [`parse_price_blob`]
/// - object -> canonicalized as-is (a canonical table is returned unchanged)
/// - anything else -> empty table
pub fn parse_price_record(raw: Option<&Value>) -> PriceTable {
    match raw {
        None | Some(Value::Null) => PriceTable::new(),
        Some(Value::String(blob)) => parse_price_blob(blob),
        Some(Value::Object(map)) => table_from_object(map),
        Some(other) => {
            debug!(kind = value_kind(other), "Ignoring non-object price record");
            PriceTable::new()
        }
    }
}

/// Parse text made of JSON objects written back to back, e.g.
/// `{"1BR":{...}}{"2BR":{...}}`.
///
/// Each fragment is parsed on its own. Housing types from later fragments
/// overwrite identical keys from earlier ones. Fragments that fail to parse
/// are skipped.
pub fn parse_price_blob(blob: &str) -> PriceTable {
    let blob = blob.trim();
    let mut table = PriceTable::new();
    if blob.is_empty() {
        return table;
    }

    for (index, fragment) in split_fragments(blob).iter().enumerate() {
        match serde_json::from_str::<Map<String, Value>>(fragment) {
            Ok(object) => table.extend(table_from_object(&object)),
            Err(e) => debug!(fragment = index, error = %e, "Skipping malformed price fragment"),
        }
    }

    table
}

/// Split at every `}{` adjacency, restoring the braces on both sides.
fn split_fragments(blob: &str) -> Vec<String> {
    let pieces: Vec<&str> = blob.split(FRAGMENT_BOUNDARY).collect();
    let last = pieces.len() - 1;

    pieces
        .iter()
        .enumerate()
        .map(|(i, piece)| {
            let open = if i == 0 { "" } else { "{" };
            let close = if i == last { "" } else { "}" };
            format!("{}{}{}", open, piece, close)
        })
        .collect()
}

fn table_from_object(object: &Map<String, Value>) -> PriceTable {
    object
        .iter()
        .filter_map(|(housing_type, years)| match years {
            Value::Object(years) => Some((
                HousingType::from(housing_type.as_str()),
                yearly_prices(years),
            )),
            other => {
                debug!(
                    housing_type = housing_type.as_str(),
                    kind = value_kind(other),
                    "Dropping housing type without a year map"
                );
                None
            }
        })
        .collect()
}

fn yearly_prices(years: &Map<String, Value>) -> YearlyPrices {
    years
        .iter()
        .filter_map(|(year, price)| price_value(price).map(|p| (Year::from(year.as_str()), p)))
        .collect()
}

fn price_value(value: &Value) -> Option<Price> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    price.filter(|p| p.is_finite())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
