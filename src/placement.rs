use crate::registry::{normalize_station_id, primary_id, ComplexRegistry, StationRegistry};
use mta_feed::EquipmentRecord;
use rustc_hash::FxHashMap;

/// Angular displacement between markers that would otherwise overlap,
/// roughly 11 meters at NYC's latitude. Shared by the per-batch offset
/// counters and the restacking pass.
pub const OFFSET_STEP: f64 = 0.0001;

/// Outcome of the base-coordinate fallback chain. Unresolved records stay in
/// the dataset with an explicit null coordinate, so failure has to be
/// structurally distinct from a resolved pair rather than a sentinel value
/// threaded through the offset arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseCoordinate {
    Resolved([f64; 2]),
    Unresolved,
}

impl BaseCoordinate {
    pub fn resolved(self) -> Option<[f64; 2]> {
        match self {
            BaseCoordinate::Resolved(coordinate) => Some(coordinate),
            BaseCoordinate::Unresolved => None,
        }
    }
}

/// Fallback chain for the base coordinate: station registry first (tighter
/// geometry), complex registry second, unresolved last. Station placement
/// always wins when both registries know the equipment.
pub fn resolve_base_coordinate(
    equipment: &EquipmentRecord,
    stations: &StationRegistry,
    complexes: &ComplexRegistry,
) -> BaseCoordinate {
    let station_id = primary_id(&equipment.elevatormrn).and_then(normalize_station_id);
    if let Some(coordinate) = station_id.and_then(|id| stations.coordinate(&id)) {
        return BaseCoordinate::Resolved(coordinate);
    }
    if let Some(coordinate) = complexes.coordinate(&equipment.stationcomplexid) {
        return BaseCoordinate::Resolved(coordinate);
    }
    BaseCoordinate::Unresolved
}

/// Per-batch placement state: how many elevators have already been placed in
/// each `(complex, street/platform)` group. Placement is a function of feed
/// order, so the counters live for exactly one run.
#[derive(Debug, Default)]
pub struct PlacementCounters(FxHashMap<(String, bool), u32>);

impl PlacementCounters {
    pub fn new() -> Self {
        PlacementCounters::default()
    }

    /// Displaces `base` so the new marker does not cover the ones already
    /// placed in its group. Street elevators alternate west/east of the
    /// anchor (west-1, east-1, west-2, east-2...); platform elevators stack
    /// strictly southward, closest slot first.
    pub fn place(&mut self, base: [f64; 2], group_id: &str, is_street: bool) -> [f64; 2] {
        let counter = self
            .0
            .entry((group_id.to_string(), is_street))
            .or_insert(0);
        let placed_before = *counter;
        *counter += 1;

        let [mut longitude, mut latitude] = base;
        if is_street {
            let magnitude = (placed_before / 2 + 1) as f64 * OFFSET_STEP;
            if placed_before % 2 == 0 {
                longitude -= magnitude;
            } else {
                longitude += magnitude;
            }
        } else {
            latitude -= (placed_before + 1) as f64 * OFFSET_STEP;
        }
        [longitude, latitude]
    }
}
