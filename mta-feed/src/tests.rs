use crate::{complexes_to_geojson, read_complex_csv, read_equipment_json};
use geojson::Value as GeoJsonValue;

#[test]
fn equipment_json_with_snapshot_header() {
    let contents = r#"// This file is auto-generated. Do not edit manually.
[
  {"equipmentno": "EL123", "equipmenttype": "EL", "ADA": "Y", "elevatormrn": 617},
  {"equipmentno": "ES200", "equipmenttype": "ES", "redundant": true}
]"#;
    let records = read_equipment_json(contents).unwrap();
    assert_eq!(2, records.len());
    assert_eq!("EL123", records[0].equipmentno);
    assert!(records[0].is_elevator());
    assert!(records[0].is_ada());
    // numeric station ids coerce to their string form
    assert_eq!("617", records[0].elevatormrn);
    assert!(!records[1].is_elevator());
    assert!(!records[1].is_ada());
    assert_eq!("true", records[1].redundant);
}

#[test]
fn equipment_json_without_header() {
    let records = read_equipment_json(r#"[{"equipmentno": "EL1"}]"#).unwrap();
    assert_eq!(1, records.len());
    assert_eq!("", records[0].stationcomplexid);
}

const COMPLEXES_CSV: &str = "\
Complex ID,Is Complex,Number Of Stations In Complex,Station IDs,Stop Name,Latitude,Longitude,ADA
606,Y,2,461; 606,Court Sq,40.747023,-73.945264,1
167,N,1,167,Broadway,40.76182,-73.925508,0
999,N,1,999,No Coords,,,0
";

#[test]
fn complex_csv_rows() {
    let rows = read_complex_csv(COMPLEXES_CSV.as_bytes()).unwrap();
    assert_eq!(3, rows.len());
    assert_eq!("606", rows[0].complex_id);
    assert_eq!(Some(2), rows[0].num_stations);
    assert_eq!(Some(40.747023), rows[0].latitude);
    assert_eq!(None, rows[2].latitude);
}

#[test]
fn complexes_geojson_skips_incomplete_rows() {
    let rows = read_complex_csv(COMPLEXES_CSV.as_bytes()).unwrap();
    let collection = complexes_to_geojson(&rows);
    // the row without coordinates is dropped
    assert_eq!(2, collection.features.len());

    let first = &collection.features[0];
    let properties = first.properties.as_ref().unwrap();
    assert_eq!("606", properties["complex_id"]);
    // multi-station id lists switch to the `/` separator
    assert_eq!("461/606", properties["station_ids"]);
    assert_eq!(2, properties["num_stations_in_complex"]);

    match &first.geometry.as_ref().unwrap().value {
        GeoJsonValue::Point(point) => assert_eq!(&vec![-73.945264, 40.747023], point),
        other => panic!("expected a point, got {other:?}"),
    }

    // single-station rows keep their id untouched
    let second_properties = collection.features[1].properties.as_ref().unwrap();
    assert_eq!("167", second_properties["station_ids"]);
}
