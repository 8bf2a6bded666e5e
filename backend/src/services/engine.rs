//! Derived state of the dashboard as an explicit dependency graph.
//!
//! Three editable inputs (selected area, housing type, amenity working set)
//! feed a small acyclic graph of named values. Every mutation marks the nodes
//! it touched; one topological pass then recomputes each node whose inputs
//! changed. Recomputation is synchronous and a pure function of the inputs.
//!
//! ```text
//!   SelectedArea ──┬──────────────► HousingType ──┬──► ActualSeries
//!                  │                              ├──► PredictedSeries
//!                  ├──► ActiveAmenities ──┐       │
//!                  │                      ▼       ▼
//!                  └──────────────────► ForecastRequest
//! ```
//!
//! `HousingType` and `ActiveAmenities` are editable nodes that are also reset
//! by a new selection: the housing type is coerced into the offered set and
//! the amenities are reloaded from the area, discarding manual edits.

use serde::Serialize;
use tracing::debug;

use crate::models::{
    housing_type_options, AmenityCounts, AmenityKind, Area, ForecastSnapshot, HousingType,
    PredictionRequest, TimeSeriesPoint,
};

/// A named value in the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    SelectedArea,
    HousingType,
    ActiveAmenities,
    ActualSeries,
    PredictedSeries,
    ForecastRequest,
}

impl Node {
    /// Every node appears after all of its inputs.
    pub const TOPOLOGICAL_ORDER: [Node; 6] = [
        Node::SelectedArea,
        Node::HousingType,
        Node::ActiveAmenities,
        Node::ActualSeries,
        Node::PredictedSeries,
        Node::ForecastRequest,
    ];

    /// Direct inputs of this node.
    pub const fn inputs(self) -> &'static [Node] {
        match self {
            Node::SelectedArea => &[],
            Node::HousingType | Node::ActiveAmenities => &[Node::SelectedArea],
            Node::ActualSeries | Node::PredictedSeries => &[Node::SelectedArea, Node::HousingType],
            Node::ForecastRequest => &[
                Node::SelectedArea,
                Node::HousingType,
                Node::ActiveAmenities,
            ],
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of nodes touched during one propagation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSet(u8);

impl ChangeSet {
    pub fn of(nodes: &[Node]) -> Self {
        let mut set = Self::default();
        for &node in nodes {
            set.insert(node);
        }
        set
    }

    pub fn insert(&mut self, node: Node) {
        self.0 |= node.bit();
    }

    pub fn contains(self, node: Node) -> bool {
        self.0 & node.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn any(self, nodes: &[Node]) -> bool {
        nodes.iter().any(|&n| self.contains(n))
    }

    pub fn iter(self) -> impl Iterator<Item = Node> {
        Node::TOPOLOGICAL_ORDER
            .into_iter()
            .filter(move |&n| self.contains(n))
    }
}

/// Values computed from the inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedState {
    pub active_amenities: AmenityCounts,
    pub actual_series: Vec<TimeSeriesPoint>,
    pub predicted_series: Vec<TimeSeriesPoint>,
    pub forecast_request: Option<PredictionRequest>,
}

/// Amenity working set for a selection: the area's stored counts, or all zero.
pub fn derive_amenities(area: Option<&Area>) -> AmenityCounts {
    area.map(|a| a.amenity_counts).unwrap_or_default()
}

/// Keep `current` if the selection offers it, else the first offered type.
pub fn coerce_housing_type(area: Option<&Area>, current: &HousingType) -> HousingType {
    let options = housing_type_options(area);
    if options.contains(current) {
        current.clone()
    } else {
        options.into_iter().next().unwrap_or_default()
    }
}

pub fn derive_actual_series(area: Option<&Area>, housing_type: &HousingType) -> Vec<TimeSeriesPoint> {
    area.map(|a| a.actual_series(housing_type)).unwrap_or_default()
}

pub fn derive_predicted_series(
    area: Option<&Area>,
    housing_type: &HousingType,
) -> Vec<TimeSeriesPoint> {
    area.map(|a| a.predicted_series(housing_type)).unwrap_or_default()
}

pub fn derive_forecast_request(
    area: Option<&Area>,
    housing_type: &HousingType,
    amenities: &AmenityCounts,
) -> Option<PredictionRequest> {
    area.map(|a| PredictionRequest::build(a, housing_type, amenities))
}

/// Outcome of one propagation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recomputation {
    pub changed: ChangeSet,
}

impl Recomputation {
    /// Whether the pass produced a new outbound forecast request.
    pub fn requests_forecast(&self) -> bool {
        self.changed.contains(Node::ForecastRequest)
    }
}

/// Owner of the dashboard inputs and everything derived from them.
#[derive(Debug, Clone)]
pub struct DerivedStateEngine {
    area: Option<Area>,
    housing_type: HousingType,
    derived: DerivedState,
}

impl Default for DerivedStateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DerivedStateEngine {
    /// No selection, default housing type, all amenities zero.
    pub fn new() -> Self {
        let mut engine = Self {
            area: None,
            housing_type: HousingType::default(),
            derived: DerivedState::default(),
        };
        engine.propagate(ChangeSet::of(&[Node::SelectedArea, Node::HousingType]));
        engine
    }

    /// Replace the selection. `None` deselects.
    pub fn select_area(&mut self, area: Option<Area>) -> Recomputation {
        self.area = area;
        self.propagate(ChangeSet::of(&[Node::SelectedArea]))
    }

    /// Change the housing type. Any string is accepted; unknown types yield empty series.
    pub fn set_housing_type(&mut self, housing_type: HousingType) -> Recomputation {
        if housing_type == self.housing_type {
            return Recomputation::default();
        }
        self.housing_type = housing_type;
        self.propagate(ChangeSet::of(&[Node::HousingType]))
    }

    pub fn increment_amenity(&mut self, kind: AmenityKind) -> Recomputation {
        self.derived.active_amenities.increment(kind);
        self.propagate(ChangeSet::of(&[Node::ActiveAmenities]))
    }

    /// A decrement at zero changes nothing and triggers nothing.
    pub fn decrement_amenity(&mut self, kind: AmenityKind) -> Recomputation {
        if self.derived.active_amenities.get(kind) == 0 {
            return Recomputation::default();
        }
        self.derived.active_amenities.decrement(kind);
        self.propagate(ChangeSet::of(&[Node::ActiveAmenities]))
    }

    /// Deselect and restore the default housing type.
    pub fn reset(&mut self) -> Recomputation {
        self.area = None;
        self.housing_type = HousingType::default();
        self.propagate(ChangeSet::of(&[Node::SelectedArea, Node::HousingType]))
    }

    pub fn area(&self) -> Option<&Area> {
        self.area.as_ref()
    }

    pub fn housing_type(&self) -> &HousingType {
        &self.housing_type
    }

    pub fn housing_type_options(&self) -> Vec<HousingType> {
        housing_type_options(self.area.as_ref())
    }

    pub fn active_amenities(&self) -> &AmenityCounts {
        &self.derived.active_amenities
    }

    pub fn actual_series(&self) -> &[TimeSeriesPoint] {
        &self.derived.actual_series
    }

    pub fn predicted_series(&self) -> &[TimeSeriesPoint] {
        &self.derived.predicted_series
    }

    pub fn forecast_request(&self) -> Option<&PredictionRequest> {
        self.derived.forecast_request.as_ref()
    }

    pub fn derived(&self) -> &DerivedState {
        &self.derived
    }

    /// The live `(area, housing type, amenities)` inputs, if an area is selected.
    pub fn snapshot(&self) -> Option<ForecastSnapshot> {
        self.area.as_ref().map(|area| {
            ForecastSnapshot::new(
                area.id(),
                self.housing_type.clone(),
                self.derived.active_amenities,
            )
        })
    }

    fn propagate(&mut self, seeds: ChangeSet) -> Recomputation {
        let mut changed = seeds;

        for node in Node::TOPOLOGICAL_ORDER {
            if changed.any(node.inputs()) {
                self.recompute(node);
                changed.insert(node);
            }
        }

        debug!(
            nodes = ?changed.iter().collect::<Vec<_>>(),
            "Recomputed derived state"
        );
        Recomputation { changed }
    }

    fn recompute(&mut self, node: Node) {
        let area = self.area.as_ref();
        match node {
            Node::SelectedArea => {}
            Node::HousingType => {
                self.housing_type = coerce_housing_type(area, &self.housing_type);
            }
            Node::ActiveAmenities => {
                self.derived.active_amenities = derive_amenities(area);
            }
            Node::ActualSeries => {
                self.derived.actual_series = derive_actual_series(area, &self.housing_type);
            }
            Node::PredictedSeries => {
                self.derived.predicted_series = derive_predicted_series(area, &self.housing_type);
            }
            Node::ForecastRequest => {
                self.derived.forecast_request = derive_forecast_request(
                    area,
                    &self.housing_type,
                    &self.derived.active_amenities,
                );
            }
        }
    }
}
