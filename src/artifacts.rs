use crate::configuration::Configuration;
use crate::dataset;
use crate::registry::{prop_string, StationRegistry};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoJsonValue};
use log::{info, warn};
use serde_json::{json, Map, Value};
use std::fs;

/// A filtered GeoJSON plus its compact `id -> [lon, lat]` companion, the two
/// shapes every geometry artifact ships in.
pub struct GeometryArtifacts {
    pub filtered: FeatureCollection,
    pub compact: Map<String, Value>,
}

fn ada_flag(properties: &JsonObject, key: &str) -> String {
    if properties.contains_key(key) {
        prop_string(properties, key)
    } else {
        "0".to_string()
    }
}

fn is_accessible(properties: &JsonObject) -> bool {
    ["ada", "ada_northbound", "ada_southbound"]
        .iter()
        .any(|key| ada_flag(properties, key) != "0")
}

fn id_keyed_feature(id_key: &str, id: &str, geometry: Geometry) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert(id_key.to_string(), Value::from(id));
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Stations that are ADA accessible in at least one direction, stripped down
/// to id plus geometry, with the compact coordinate map the front-end embeds.
pub fn accessible_station_geometry(stations: &FeatureCollection) -> GeometryArtifacts {
    geometry_artifacts(stations, "station_id", true)
}

/// Complex geometry keeps every complex; the map only filters stations.
pub fn complex_geometry(complexes: &FeatureCollection) -> GeometryArtifacts {
    geometry_artifacts(complexes, "complex_id", false)
}

fn geometry_artifacts(
    collection: &FeatureCollection,
    id_key: &str,
    ada_filter: bool,
) -> GeometryArtifacts {
    let mut filtered = Vec::new();
    let mut compact = Map::new();

    for feature in &collection.features {
        let Some(properties) = &feature.properties else {
            continue;
        };
        let id = prop_string(properties, id_key);
        if id.is_empty() {
            continue;
        }
        if ada_filter && !is_accessible(properties) {
            continue;
        }
        let Some(geometry) = feature.geometry.clone() else {
            continue;
        };
        let GeoJsonValue::Point(point) = &geometry.value else {
            continue;
        };

        compact.insert(id.clone(), json!(point));
        filtered.push(id_keyed_feature(id_key, &id, geometry));
    }

    GeometryArtifacts {
        filtered: FeatureCollection {
            bbox: None,
            features: filtered,
            foreign_members: None,
        },
        compact,
    }
}

/// Seed collection for the outage layer: one feature per transit elevator
/// with `isBroken` reset, plus the elevator-number -> coordinate map the
/// realtime outage feed is joined against.
pub fn outage_seed(collection: &Value) -> (Value, Map<String, Value>) {
    let mut features = Vec::new();
    let mut geometry_map = Map::new();

    for feature in dataset::features(collection) {
        let system = dataset::prop_str(feature, "system");
        if system != "nyc_mta" && system != "nyc_sir" {
            continue;
        }
        let elevatorno = dataset::prop_str(feature, "elevatorno");
        if elevatorno.is_empty() {
            continue;
        }
        let coordinates = feature
            .get("geometry")
            .and_then(|geometry| geometry.get("coordinates"))
            .cloned()
            .unwrap_or(Value::Null);
        let geometry_type = feature
            .get("geometry")
            .and_then(|geometry| geometry.get("type"))
            .cloned()
            .unwrap_or_else(|| json!("Point"));

        features.push(json!({
            "type": "Feature",
            "id": elevatorno,
            "properties": {
                "elevatorno": elevatorno,
                "isBroken": false
            },
            "geometry": {
                "coordinates": coordinates,
                "type": geometry_type
            }
        }));
        geometry_map.insert(elevatorno.to_string(), coordinates);
    }

    (
        json!({ "features": features, "type": "FeatureCollection" }),
        geometry_map,
    )
}

/// LineStrings joining each street elevator to its station, for the hover
/// highlight layer. Elevators without a resolvable station or without a
/// coordinate of their own cannot be drawn and are skipped.
pub fn street_to_station_lines(
    collection: &Value,
    stations: &StationRegistry,
) -> FeatureCollection {
    let mut lines = Vec::new();

    for feature in dataset::features(collection) {
        if dataset::prop_str(feature, "isStreet").trim().is_empty() {
            continue;
        }
        if dataset::prop_str(feature, "system") != "nyc_mta" {
            continue;
        }
        let station_id = dataset::prop_str(feature, "stationID");
        let Some(station_coordinate) = stations.coordinate(station_id) else {
            continue;
        };
        let elevatorno = dataset::prop_str(feature, "elevatorno");
        let Some(elevator_coordinate) = dataset::coordinates(feature) else {
            warn!("street elevator {elevatorno} has no coordinates, skipping connector line");
            continue;
        };

        let mut properties = JsonObject::new();
        properties.insert("station_id".to_string(), Value::from(station_id));
        properties.insert("elevator_no".to_string(), Value::from(elevatorno));
        properties.insert(
            "station_name".to_string(),
            Value::from(dataset::prop_str(feature, "title")),
        );

        lines.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoJsonValue::LineString(vec![
                elevator_coordinate.to_vec(),
                station_coordinate.to_vec(),
            ]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    FeatureCollection {
        bbox: None,
        features: lines,
        foreign_members: None,
    }
}

/// Writes every derived artifact: geometry triples (GeoJSON, compact JSON,
/// embeddable constant), the outage seed pair and the connector lines.
pub fn write_artifacts(
    configuration: &Configuration,
    stations: &FeatureCollection,
    complexes: &FeatureCollection,
    curated: &Value,
    station_registry: &StationRegistry,
) -> anyhow::Result<()> {
    let station_geometry = accessible_station_geometry(stations);
    dataset::write_pretty(
        &configuration.accessible_station_geojson(),
        &station_geometry.filtered,
    )?;
    dataset::write_pretty(&configuration.accessible_station_json(), &station_geometry.compact)?;
    write_embeddable(
        &configuration.accessible_station_ts(),
        &format!(
            "export const stationCoordinates: Record<string, [number, number]> = {};\n\nexport default stationCoordinates;",
            serde_json::to_string_pretty(&station_geometry.compact)?
        ),
    )?;
    info!(
        "Generated {} accessible station features",
        station_geometry.filtered.features.len()
    );

    let complex_geometry = complex_geometry(complexes);
    dataset::write_pretty(
        &configuration.complex_geometry_geojson(),
        &complex_geometry.filtered,
    )?;
    dataset::write_pretty(&configuration.complex_geometry_json(), &complex_geometry.compact)?;
    write_embeddable(
        &configuration.complex_geometry_js(),
        &format!(
            "export const complexCoordinates = {};\n\nexport default complexCoordinates;",
            serde_json::to_string_pretty(&complex_geometry.compact)?
        ),
    )?;
    info!(
        "Generated {} complex geometry features",
        complex_geometry.filtered.features.len()
    );

    let (outage_collection, outage_geometry) = outage_seed(curated);
    dataset::write_pretty(&configuration.outage_dataset_geojson(), &outage_collection)?;
    dataset::write_pretty(&configuration.outage_geometry_json(), &outage_geometry)?;
    write_embeddable(
        &configuration.outage_geometry_ts(),
        &format!(
            "export const elevatorCoordinates: Record<string, [number, number]> = {}",
            serde_json::to_string_pretty(&outage_geometry)?
        ),
    )?;
    info!("Generated {} outage seed features", outage_geometry.len());

    let connector_lines = street_to_station_lines(curated, station_registry);
    dataset::write_pretty(&configuration.street_lines_geojson(), &connector_lines)?;
    info!(
        "Generated {} street-to-station connector lines",
        connector_lines.features.len()
    );

    Ok(())
}

fn write_embeddable(path: &std::path::Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
