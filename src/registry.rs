use geojson::{Feature, FeatureCollection, JsonObject, JsonValue, Value as GeoJsonValue};
use rustc_hash::FxHashMap;

/// Normalizes a station id to the form the registries are keyed by:
/// parsed as an integer and re-stringified, which strips leading zeros.
/// Returns `None` for empty or non-numeric ids.
pub fn normalize_station_id(raw: &str) -> Option<String> {
    raw.trim().parse::<i64>().ok().map(|id| id.to_string())
}

/// First token of a `/`-joined id list, trimmed. The first id is the primary
/// station/complex the equipment is anchored to.
pub fn primary_id(raw: &str) -> Option<&str> {
    let first = raw.split('/').next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first)
    }
}

/// Reads a property that may arrive as a string or a bare scalar, as the
/// open-data feeds do for ids and flags.
pub fn prop_string(properties: &JsonObject, key: &str) -> String {
    match properties.get(key) {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(JsonValue::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

pub fn point_coordinates(feature: &Feature) -> Option<[f64; 2]> {
    let geometry = feature.geometry.as_ref()?;
    match &geometry.value {
        GeoJsonValue::Point(point) if point.len() >= 2 => Some([point[0], point[1]]),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct StationEntry {
    pub coordinate: [f64; 2],
    pub ada: String,
}

/// Station lookup table keyed by normalized station id. Features with
/// malformed ids or missing coordinates are left out; the resolver treats
/// "not found" as an ordinary fallback case.
#[derive(Debug, Default)]
pub struct StationRegistry(FxHashMap<String, StationEntry>);

impl StationRegistry {
    pub fn from_features(collection: &FeatureCollection) -> Self {
        let mut registry = FxHashMap::default();
        for feature in &collection.features {
            let Some(properties) = &feature.properties else {
                continue;
            };
            let Some(station_id) = normalize_station_id(&prop_string(properties, "station_id"))
            else {
                continue;
            };
            let Some(coordinate) = point_coordinates(feature) else {
                continue;
            };
            registry.insert(
                station_id,
                StationEntry {
                    coordinate,
                    ada: prop_string(properties, "ada"),
                },
            );
        }
        StationRegistry(registry)
    }

    pub fn get(&self, station_id: &str) -> Option<&StationEntry> {
        self.0.get(station_id)
    }

    pub fn coordinate(&self, station_id: &str) -> Option<[f64; 2]> {
        self.0.get(station_id).map(|entry| entry.coordinate)
    }

    pub fn anchor_lookup(&self) -> FxHashMap<String, [f64; 2]> {
        self.0
            .iter()
            .map(|(id, entry)| (id.clone(), entry.coordinate))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Complex lookup table keyed by complex id, used as the coarser fallback
/// anchor when no station-level coordinate exists.
#[derive(Debug, Default)]
pub struct ComplexRegistry(FxHashMap<String, [f64; 2]>);

impl ComplexRegistry {
    pub fn from_features(collection: &FeatureCollection) -> Self {
        let mut registry = FxHashMap::default();
        for feature in &collection.features {
            let Some(properties) = &feature.properties else {
                continue;
            };
            let complex_id = prop_string(properties, "complex_id");
            if complex_id.is_empty() {
                continue;
            }
            let Some(coordinate) = point_coordinates(feature) else {
                continue;
            };
            registry.insert(complex_id, coordinate);
        }
        ComplexRegistry(registry)
    }

    pub fn coordinate(&self, complex_id: &str) -> Option<[f64; 2]> {
        self.0.get(complex_id).copied()
    }

    pub fn anchor_lookup(&self) -> FxHashMap<String, [f64; 2]> {
        self.0.clone()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn station_features(features: serde_json::Value) -> FeatureCollection {
        serde_json::from_value(json!({ "type": "FeatureCollection", "features": features }))
            .unwrap()
    }

    #[test]
    fn station_ids_lose_leading_zeros() {
        let collection = station_features(json!([
            {
                "type": "Feature",
                "properties": { "station_id": "083", "ada": "1" },
                "geometry": { "type": "Point", "coordinates": [-73.9, 40.7] }
            }
        ]));
        let registry = StationRegistry::from_features(&collection);
        assert_eq!(Some([-73.9, 40.7]), registry.coordinate("83"));
        assert_eq!(None, registry.coordinate("083"));
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let collection = station_features(json!([
            { "type": "Feature", "properties": { "station_id": "abc" },
              "geometry": { "type": "Point", "coordinates": [-73.9, 40.7] } },
            { "type": "Feature", "properties": { "station_id": "12" }, "geometry": null },
            { "type": "Feature", "properties": { "station_id": 7 },
              "geometry": { "type": "Point", "coordinates": [-73.8, 40.6] } }
        ]));
        let registry = StationRegistry::from_features(&collection);
        assert_eq!(1, registry.len());
        // numeric ids work too
        assert_eq!(Some([-73.8, 40.6]), registry.coordinate("7"));
    }

    #[test]
    fn primary_id_takes_the_first_token() {
        assert_eq!(Some("167"), primary_id("167/461"));
        assert_eq!(Some("617"), primary_id(" 617 "));
        assert_eq!(None, primary_id(""));
        assert_eq!(None, primary_id("  /461"));
    }

    #[test]
    fn normalize_rejects_non_numeric_ids() {
        assert_eq!(Some("12".to_string()), normalize_station_id("012"));
        assert_eq!(None, normalize_station_id("R32"));
        assert_eq!(None, normalize_station_id(""));
    }
}
