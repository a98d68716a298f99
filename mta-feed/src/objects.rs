use crate::serde_helpers::*;
use serde::{Deserialize, Serialize};

/// One record of the ENE equipment feed. Field names follow the feed
/// verbatim; every field is optional upstream so they all default to empty.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct EquipmentRecord {
    /// Equipment identifier, e.g. `EL123`. Unique across the feed.
    #[serde(default)]
    pub equipmentno: String,
    /// `EL` for elevators, `ES` for escalators
    #[serde(default)]
    pub equipmenttype: String,
    /// `Y` when the equipment serves an ADA accessible path
    #[serde(rename = "ADA", default)]
    pub ada: String,
    /// Station id(s) the equipment belongs to, `/`-joined when it spans
    /// several stations
    #[serde(default, deserialize_with = "de_scalar_to_string")]
    pub elevatormrn: String,
    /// Id of the station complex the equipment belongs to
    #[serde(default, deserialize_with = "de_scalar_to_string")]
    pub stationcomplexid: String,
    #[serde(default)]
    pub shortdescription: String,
    /// Free text describing what the equipment serves, e.g.
    /// `"Manhattan-bound platform"`
    #[serde(default)]
    pub serving: String,
    #[serde(default)]
    pub linesservedbyelevator: String,
    #[serde(default)]
    pub trainno: String,
    /// Whether another unit covers the same path
    #[serde(default, deserialize_with = "de_scalar_to_string")]
    pub redundant: String,
    #[serde(default)]
    pub alternativeroute: String,
    #[serde(default)]
    pub elevatorsgtfsstopid: String,
    /// Human readable station name
    #[serde(default)]
    pub station: String,
}

impl EquipmentRecord {
    /// The feed mixes elevators and escalators; the pipeline only keeps
    /// elevators.
    pub fn is_elevator(&self) -> bool {
        self.equipmenttype == "EL"
    }

    pub fn is_ada(&self) -> bool {
        self.ada.eq_ignore_ascii_case("y")
    }
}

/// One row of the stations-and-complexes CSV registry.
#[derive(Debug, Deserialize, Clone)]
pub struct ComplexRow {
    #[serde(rename = "Complex ID", default)]
    pub complex_id: String,
    #[serde(rename = "Is Complex", default)]
    pub is_complex: String,
    #[serde(
        rename = "Number Of Stations In Complex",
        default,
        deserialize_with = "de_with_optional_int"
    )]
    pub num_stations: Option<u32>,
    /// `; `-separated when the complex has more than one member station
    #[serde(rename = "Station IDs", default)]
    pub station_ids: String,
    #[serde(rename = "Stop Name", default)]
    pub stop_name: String,
    #[serde(
        rename = "Latitude",
        default,
        deserialize_with = "de_with_optional_float"
    )]
    pub latitude: Option<f64>,
    #[serde(
        rename = "Longitude",
        default,
        deserialize_with = "de_with_optional_float"
    )]
    pub longitude: Option<f64>,
    #[serde(rename = "ADA", default)]
    pub ada: String,
}
