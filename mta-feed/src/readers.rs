use crate::{ComplexRow, EquipmentRecord, Error};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value as GeoJsonValue};
use std::io::Read;

/// Parses the equipment feed, either the raw API response or a saved
/// snapshot (snapshots carry `//` comment header lines that have to be
/// stripped before the JSON parser sees the body).
pub fn read_equipment_json(contents: &str) -> Result<Vec<EquipmentRecord>, Error> {
    let mut body = contents;
    while body.trim_start().starts_with("//") {
        body = body.trim_start().split_once('\n').map_or("", |(_, rest)| rest);
    }
    Ok(serde_json::from_str(body)?)
}

/// Reads the stations-and-complexes registry CSV. Rows that fail to
/// deserialize are dropped: the registry is best effort and the consumers
/// treat "not found" as a valid outcome.
pub fn read_complex_csv<R: Read>(reader: R) -> Result<Vec<ComplexRow>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        match record {
            Ok(row) => rows.push(row),
            Err(_) => continue,
        }
    }
    Ok(rows)
}

/// Converts registry rows into the complexes GeoJSON consumed by the rest of
/// the pipeline. Rows without an id, a coordinate pair or a station count are
/// skipped. Multi-station id lists are rewritten from `; `-separated to the
/// `/`-separated form the elevator dataset uses.
pub fn complexes_to_geojson(rows: &[ComplexRow]) -> FeatureCollection {
    let mut features = Vec::new();

    for row in rows {
        let (Some(latitude), Some(longitude), Some(num_stations)) =
            (row.latitude, row.longitude, row.num_stations)
        else {
            continue;
        };
        if row.complex_id.is_empty() {
            continue;
        }

        let station_ids = if num_stations > 1 && !row.station_ids.is_empty() {
            row.station_ids.replace("; ", "/")
        } else {
            row.station_ids.clone()
        };

        let mut properties = JsonObject::new();
        properties.insert("complex_id".to_string(), JsonValue::from(row.complex_id.clone()));
        properties.insert("station_ids".to_string(), JsonValue::from(station_ids));
        properties.insert("stop_name".to_string(), JsonValue::from(row.stop_name.clone()));
        properties.insert("ada".to_string(), JsonValue::from(row.ada.clone()));
        properties.insert(
            "num_stations_in_complex".to_string(),
            JsonValue::from(num_stations),
        );

        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoJsonValue::Point(vec![longitude, latitude]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
