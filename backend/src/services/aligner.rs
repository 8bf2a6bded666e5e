//! Alignment of several yearly series onto one shared timeline.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::models::{Price, TimeSeriesPoint, Year};

/// The three series drawn on the price chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Actual,
    Predicted,
    Forecast,
}

impl SeriesKind {
    pub const fn label(self) -> &'static str {
        match self {
            SeriesKind::Actual => "Actual Price",
            SeriesKind::Predicted => "Predict Price",
            SeriesKind::Forecast => "Forecast",
        }
    }
}

/// One series projected onto the shared labels. `None` is a gap, never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedDataset {
    pub label: String,
    pub values: Vec<Option<Price>>,
}

/// Shared ascending labels plus one projection per non-empty input series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedSeriesTable {
    pub labels: Vec<Year>,
    pub datasets: Vec<AlignedDataset>,
}

impl AlignedSeriesTable {
    pub fn dataset(&self, label: &str) -> Option<&AlignedDataset> {
        self.datasets.iter().find(|d| d.label == label)
    }

    /// Cell for `label` at `year`; `None` when the series or the cell is absent.
    pub fn value(&self, label: &str, year: &str) -> Option<Price> {
        let column = self.labels.iter().position(|y| y.as_str() == year)?;
        self.dataset(label)?.values[column]
    }
}

/// Merge named series onto the sorted union of their years.
///
/// Empty series contribute no labels and produce no dataset. Returns `None`
/// when every series is empty. A year repeated within one series keeps its
/// last value.
pub fn align<'a, I>(series: I) -> Option<AlignedSeriesTable>
where
    I: IntoIterator<Item = (&'a str, &'a [TimeSeriesPoint])>,
{
    let present: Vec<(&str, &[TimeSeriesPoint])> = series
        .into_iter()
        .filter(|(_, points)| !points.is_empty())
        .collect();

    if present.is_empty() {
        return None;
    }

    let labels: Vec<Year> = present
        .iter()
        .flat_map(|(_, points)| points.iter().map(|p| &p.year))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect();

    let datasets = present
        .iter()
        .map(|(label, points)| {
            let by_year: BTreeMap<&Year, Option<Price>> =
                points.iter().map(|p| (&p.year, p.price)).collect();
            AlignedDataset {
                label: (*label).to_string(),
                values: labels
                    .iter()
                    .map(|year| by_year.get(year).copied().flatten())
                    .collect(),
            }
        })
        .collect();

    Some(AlignedSeriesTable { labels, datasets })
}

/// Align the chart's actual, predicted and forecast series.
pub fn align_chart(
    actual: &[TimeSeriesPoint],
    predicted: &[TimeSeriesPoint],
    forecast: &[TimeSeriesPoint],
) -> Option<AlignedSeriesTable> {
    align([
        (SeriesKind::Actual.label(), actual),
        (SeriesKind::Predicted.label(), predicted),
        (SeriesKind::Forecast.label(), forecast),
    ])
}
