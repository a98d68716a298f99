use crate::dataset;
use crate::placement::OFFSET_STEP;
use crate::registry::primary_id;
use log::warn;
use rustc_hash::FxHashMap;
use serde_json::Value;

/// Direction labels that stack first, ordered roughly "towards uptown".
const UPTOWN_TERMS: [&str; 4] = ["uptown", "bronx-bound", "queens-bound", "northbound"];

/// Which registry anchors the stack. A complex coordinate averages several
/// stations, so the complex stack starts one extra step below the anchor to
/// clear the wider marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Station,
    Complex,
}

impl Anchor {
    fn id_property(self) -> &'static str {
        match self {
            Anchor::Station => "stationID",
            Anchor::Complex => "complexID",
        }
    }

    fn pullback(self) -> f64 {
        match self {
            Anchor::Station => OFFSET_STEP,
            Anchor::Complex => 2.0 * OFFSET_STEP,
        }
    }
}

#[derive(Debug, Default)]
pub struct RestackSummary {
    /// How many platform elevators received a new coordinate
    pub restacked: usize,
    /// Group ids that had no anchor coordinate and were left untouched
    pub missing_anchors: Vec<String>,
}

fn is_uptown(direction: &str) -> bool {
    let direction = direction.trim().to_lowercase();
    UPTOWN_TERMS.iter().any(|term| direction.contains(term))
}

/// Recomputes the placement of every platform elevator from its anchor:
/// group by primary station/complex id, sort uptown-bound elevators first
/// (stable, so ties keep feed order), then stack southward from the pulled-
/// back anchor point, closest slot first. Groups without an anchor keep
/// their current coordinates. Because the pass starts from the anchor and
/// not from the elevators' current positions, running it twice yields the
/// same coordinates.
pub fn restack_platform_elevators(
    collection: &mut Value,
    anchors: &FxHashMap<String, [f64; 2]>,
    anchor: Anchor,
) -> RestackSummary {
    let mut groups: FxHashMap<String, Vec<usize>> = FxHashMap::default();
    for (index, feature) in dataset::features(collection).iter().enumerate() {
        let raw_id = dataset::prop_str(feature, anchor.id_property());
        let is_street = !dataset::prop_str(feature, "isStreet").trim().is_empty();
        if raw_id.is_empty() || is_street {
            continue;
        }
        let Some(group_id) = primary_id(raw_id) else {
            continue;
        };
        groups.entry(group_id.to_string()).or_default().push(index);
    }

    let mut summary = RestackSummary::default();
    let mut moves: Vec<(usize, [f64; 2])> = Vec::new();

    for (group_id, mut members) in groups {
        let Some(&[base_longitude, anchor_latitude]) = anchors.get(&group_id) else {
            warn!("skipping {group_id}: no anchor coordinates found");
            summary.missing_anchors.push(group_id);
            continue;
        };
        let base_latitude = anchor_latitude - anchor.pullback();

        members.sort_by_key(|&index| {
            let feature = &dataset::features(collection)[index];
            if is_uptown(dataset::prop_str(feature, "directionLabel")) {
                0
            } else {
                1
            }
        });

        for (slot, index) in members.into_iter().enumerate() {
            moves.push((
                index,
                [base_longitude, base_latitude - slot as f64 * OFFSET_STEP],
            ));
        }
    }

    summary.restacked = moves.len();
    summary.missing_anchors.sort();

    if let Some(features) = dataset::features_mut(collection) {
        for (index, coordinate) in moves {
            dataset::set_coordinates(&mut features[index], coordinate);
        }
    }
    summary
}
