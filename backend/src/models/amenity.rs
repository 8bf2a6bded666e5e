//! Amenity catalogue and the per-area amenity working set.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One of the fixed categories of nearby points of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AmenityKind {
    Hospital,
    Metro,
    School,
    University,
    Park,
    Office,
    #[serde(rename = "poi")]
    PointOfInterest,
    Landfill,
    Prison,
    Highway,
    Bar,
    Cemetery,
}

impl AmenityKind {
    /// All kinds in display order.
    pub const ALL: [AmenityKind; 12] = [
        AmenityKind::Hospital,
        AmenityKind::Metro,
        AmenityKind::School,
        AmenityKind::University,
        AmenityKind::Park,
        AmenityKind::Office,
        AmenityKind::PointOfInterest,
        AmenityKind::Landfill,
        AmenityKind::Prison,
        AmenityKind::Highway,
        AmenityKind::Bar,
        AmenityKind::Cemetery,
    ];

    /// Lower-case key used in feature properties and on the wire.
    pub const fn key(self) -> &'static str {
        match self {
            AmenityKind::Hospital => "hospital",
            AmenityKind::Metro => "metro",
            AmenityKind::School => "school",
            AmenityKind::University => "university",
            AmenityKind::Park => "park",
            AmenityKind::Office => "office",
            AmenityKind::PointOfInterest => "poi",
            AmenityKind::Landfill => "landfill",
            AmenityKind::Prison => "prison",
            AmenityKind::Highway => "highway",
            AmenityKind::Bar => "bar",
            AmenityKind::Cemetery => "cemetery",
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            AmenityKind::Hospital => "Hospital",
            AmenityKind::Metro => "Metro",
            AmenityKind::School => "School",
            AmenityKind::University => "University",
            AmenityKind::Park => "Park",
            AmenityKind::Office => "Office",
            AmenityKind::PointOfInterest => "Point of interest",
            AmenityKind::Landfill => "Landfill",
            AmenityKind::Prison => "Prison",
            AmenityKind::Highway => "Highway",
            AmenityKind::Bar => "Bar",
            AmenityKind::Cemetery => "Cemetery",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AmenityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AmenityKind {
    type Err = String;

    /// Parse an amenity key, ignoring case, spaces, underscores and dashes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        let kind = match normalized.as_str() {
            "hospital" => AmenityKind::Hospital,
            "metro" => AmenityKind::Metro,
            "school" => AmenityKind::School,
            "university" => AmenityKind::University,
            "park" => AmenityKind::Park,
            "office" => AmenityKind::Office,
            "poi" | "pointofinterest" => AmenityKind::PointOfInterest,
            "landfill" => AmenityKind::Landfill,
            "prison" => AmenityKind::Prison,
            "highway" => AmenityKind::Highway,
            "bar" => AmenityKind::Bar,
            "cemetery" => AmenityKind::Cemetery,
            _ => return Err(format!("Unknown amenity kind: {}", s)),
        };
        Ok(kind)
    }
}

/// Non-negative count per amenity kind.
///
/// Every kind is always materialized, so an absent key and an explicit zero
/// are the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AmenityCounts([u32; 12]);

impl AmenityCounts {
    /// All kinds set to zero.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: AmenityKind) -> u32 {
        self.0[kind.index()]
    }

    pub fn set(&mut self, kind: AmenityKind, count: u32) {
        self.0[kind.index()] = count;
    }

    /// Add one to `kind`, returning the new count.
    pub fn increment(&mut self, kind: AmenityKind) -> u32 {
        let slot = &mut self.0[kind.index()];
        *slot = slot.saturating_add(1);
        *slot
    }

    /// Remove one from `kind`, never going below zero. Returns the new count.
    pub fn decrement(&mut self, kind: AmenityKind) -> u32 {
        let slot = &mut self.0[kind.index()];
        *slot = slot.saturating_sub(1);
        *slot
    }

    /// Sum across all kinds.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&c| u64::from(c)).sum()
    }

    /// Iterate `(kind, count)` pairs in display order, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (AmenityKind, u32)> + '_ {
        AmenityKind::ALL.iter().map(move |&kind| (kind, self.get(kind)))
    }
}

impl FromIterator<(AmenityKind, u32)> for AmenityCounts {
    fn from_iter<I: IntoIterator<Item = (AmenityKind, u32)>>(iter: I) -> Self {
        let mut counts = Self::zero();
        for (kind, count) in iter {
            counts.set(kind, count);
        }
        counts
    }
}

impl Serialize for AmenityCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(AmenityKind::ALL.len()))?;
        for (kind, count) in self.iter() {
            map.serialize_entry(kind.key(), &count)?;
        }
        map.end()
    }
}
