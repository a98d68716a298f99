use crate::dataset;
use crate::direction::infer_direction;
use crate::placement::{resolve_base_coordinate, BaseCoordinate, PlacementCounters};
use crate::registry::{normalize_station_id, primary_id, ComplexRegistry, StationRegistry};
use log::warn;
use mta_feed::EquipmentRecord;
use serde_json::{json, Value};
use uuid::Uuid;

const IMAGE_BASE_URL: &str = "https://wheresthedamnelevator.com/assets/images/newyork/mta";

#[derive(Debug, Default)]
pub struct IngestSummary {
    pub added: Vec<AddedElevator>,
    /// Elevators appended with a `[null, null]` coordinate, for manual
    /// follow-up
    pub unresolved: Vec<String>,
}

#[derive(Debug)]
pub struct AddedElevator {
    pub elevatorno: String,
    pub title: String,
}

/// Merges the equipment feed into the curated dataset: keeps ADA elevators
/// not already present, resolves a coordinate for each through the
/// station→complex fallback chain, and spreads same-group markers apart with
/// the per-run placement counters. Records whose coordinate cannot be
/// resolved are appended anyway, flagged in the summary rather than dropped.
pub fn ingest_equipment(
    collection: &mut Value,
    equipment: &[EquipmentRecord],
    stations: &StationRegistry,
    complexes: &ComplexRegistry,
) -> IngestSummary {
    let mut existing = dataset::existing_elevator_index(collection);
    let mut counters = PlacementCounters::new();
    let mut summary = IngestSummary::default();

    for equip in equipment {
        if !equip.is_elevator() {
            continue;
        }
        let elevatorno = equip.equipmentno.as_str();
        if elevatorno.is_empty() || existing.contains(elevatorno) {
            continue;
        }
        if !equip.is_ada() {
            continue;
        }

        // street flag decides the offset pattern, so infer it before placing
        let is_street = equip.shortdescription.to_lowercase().contains("street");

        let coordinate = resolve_base_coordinate(equip, stations, complexes)
            .resolved()
            .map(|base| counters.place(base, &equip.stationcomplexid, is_street));

        let station_id = primary_id(&equip.elevatormrn)
            .map(|raw| normalize_station_id(raw).unwrap_or_else(|| raw.to_string()))
            .unwrap_or_default();

        let direction_label = infer_direction(&equip.serving, &equip.shortdescription);

        let slug = equip.station.replace('/', "-").replace(' ', "-");
        let image_url = format!("{IMAGE_BASE_URL}/{slug}_{elevatorno}.jpg");

        let description = if is_street {
            "This elevator gets you from the street to the main station mezzanine".to_string()
        } else if direction_label.is_empty() {
            format!(
                "This elevator gets you from the main station mezzanine to {} trains",
                equip.linesservedbyelevator
            )
        } else {
            format!(
                "This elevator gets you from the main station mezzanine to {direction_label} {} trains",
                equip.linesservedbyelevator
            )
        };

        let ada = stations
            .get(&station_id)
            .map(|entry| entry.ada.clone())
            .unwrap_or_default();
        let is_street_label = if is_street { "true" } else { "" };

        let coordinates_json = match coordinate {
            Some([longitude, latitude]) => json!([longitude, latitude]),
            None => {
                warn!("no coordinates resolved for elevator {elevatorno}, needs manual review");
                summary.unresolved.push(elevatorno.to_string());
                json!([null, null])
            }
        };

        let feature = json!({
            "type": "Feature",
            "properties": {
                "isRedundant": equip.redundant,
                "elevatorgtfsstopid": equip.elevatorsgtfsstopid,
                "route": equip.trainno,
                "complexID": equip.stationcomplexid,
                "stationID": station_id,
                "system": "nyc_mta",
                "elevatorno": elevatorno,
                "linesServed": equip.linesservedbyelevator,
                "directionLabel": direction_label,
                "title": equip.station,
                "image": image_url,
                "alternativeRoute": equip.alternativeroute,
                "ada": ada,
                "isBroken": "",
                "isStreet": is_street_label,
                "shortdescription": equip.shortdescription,
                "description_custom": description
            },
            "geometry": {
                "type": "Point",
                "coordinates": coordinates_json
            },
            "id": Uuid::new_v4().simple().to_string()
        });

        dataset::push_feature(collection, feature);
        existing.insert(elevatorno.to_string());
        summary.added.push(AddedElevator {
            elevatorno: elevatorno.to_string(),
            title: equip.station.clone(),
        });
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::OFFSET_STEP;
    use geojson::FeatureCollection;
    use serde_json::json;

    fn registries() -> (StationRegistry, ComplexRegistry) {
        let stations: FeatureCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "station_id": "167", "ada": "1" },
                "geometry": { "type": "Point", "coordinates": [-73.925508, 40.76182] }
            }]
        }))
        .unwrap();
        let complexes: FeatureCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "complex_id": "606" },
                "geometry": { "type": "Point", "coordinates": [-73.945264, 40.747023] }
            }]
        }))
        .unwrap();
        (
            StationRegistry::from_features(&stations),
            ComplexRegistry::from_features(&complexes),
        )
    }

    fn elevator(equipmentno: &str) -> EquipmentRecord {
        EquipmentRecord {
            equipmentno: equipmentno.to_string(),
            equipmenttype: "EL".to_string(),
            ada: "Y".to_string(),
            elevatormrn: "167".to_string(),
            stationcomplexid: "606".to_string(),
            serving: "Manhattan-bound platform".to_string(),
            shortdescription: "mezzanine to platform".to_string(),
            linesservedbyelevator: "N/W".to_string(),
            station: "Astoria Blvd/Hoyt Ave".to_string(),
            ..EquipmentRecord::default()
        }
    }

    fn empty_collection() -> Value {
        json!({ "type": "FeatureCollection", "features": [] })
    }

    #[test]
    fn adds_a_platform_elevator_with_station_coordinates() {
        let (stations, complexes) = registries();
        let mut collection = empty_collection();
        let summary =
            ingest_equipment(&mut collection, &[elevator("EL123")], &stations, &complexes);

        assert_eq!(1, summary.added.len());
        assert!(summary.unresolved.is_empty());

        let feature = &dataset::features(&collection)[0];
        assert_eq!("EL123", dataset::prop_str(feature, "elevatorno"));
        assert_eq!("167", dataset::prop_str(feature, "stationID"));
        assert_eq!("nyc_mta", dataset::prop_str(feature, "system"));
        assert_eq!("Manhattan-bound", dataset::prop_str(feature, "directionLabel"));
        assert_eq!("", dataset::prop_str(feature, "isStreet"));
        assert_eq!(
            "This elevator gets you from the main station mezzanine to Manhattan-bound N/W trains",
            dataset::prop_str(feature, "description_custom")
        );
        assert_eq!(
            format!("{IMAGE_BASE_URL}/Astoria-Blvd-Hoyt-Ave_EL123.jpg"),
            dataset::prop_str(feature, "image")
        );
        assert_eq!("1", dataset::prop_str(feature, "ada"));
        // station coordinate with the first platform slot below it
        assert_eq!(
            Some([-73.925508, 40.76182 - OFFSET_STEP]),
            dataset::coordinates(feature)
        );
    }

    #[test]
    fn street_elevators_get_the_street_description() {
        let (stations, complexes) = registries();
        let mut collection = empty_collection();
        let mut street = elevator("EL200");
        street.shortdescription = "Street to mezzanine".to_string();
        street.serving = "street".to_string();
        ingest_equipment(&mut collection, &[street], &stations, &complexes);

        let feature = &dataset::features(&collection)[0];
        assert_eq!("true", dataset::prop_str(feature, "isStreet"));
        assert_eq!(
            "This elevator gets you from the street to the main station mezzanine",
            dataset::prop_str(feature, "description_custom")
        );
        assert_eq!(
            Some([-73.925508 - OFFSET_STEP, 40.76182]),
            dataset::coordinates(feature)
        );
    }

    #[test]
    fn rerunning_the_same_feed_adds_nothing() {
        let (stations, complexes) = registries();
        let mut collection = empty_collection();
        let feed = vec![elevator("EL123"), elevator("EL124")];

        let first = ingest_equipment(&mut collection, &feed, &stations, &complexes);
        assert_eq!(2, first.added.len());

        let second = ingest_equipment(&mut collection, &feed, &stations, &complexes);
        assert!(second.added.is_empty());
        assert_eq!(2, dataset::features(&collection).len());
    }

    #[test]
    fn escalators_and_non_ada_equipment_are_skipped() {
        let (stations, complexes) = registries();
        let mut collection = empty_collection();

        let mut escalator = elevator("ES1");
        escalator.equipmenttype = "ES".to_string();
        let mut not_ada = elevator("EL300");
        not_ada.ada = "N".to_string();

        let summary =
            ingest_equipment(&mut collection, &[escalator, not_ada], &stations, &complexes);
        assert!(summary.added.is_empty());
        assert!(dataset::features(&collection).is_empty());
    }

    #[test]
    fn unresolved_equipment_is_appended_with_null_coordinates() {
        let (stations, complexes) = registries();
        let mut collection = empty_collection();
        let mut unknown = elevator("EL400");
        unknown.elevatormrn = "999".to_string();
        unknown.stationcomplexid = "999".to_string();

        let summary = ingest_equipment(&mut collection, &[unknown], &stations, &complexes);
        assert_eq!(vec!["EL400".to_string()], summary.unresolved);
        assert_eq!(1, summary.added.len());

        let feature = &dataset::features(&collection)[0];
        assert_eq!(None, dataset::coordinates(feature));
        assert_eq!(
            &json!([null, null]),
            feature.get("geometry").unwrap().get("coordinates").unwrap()
        );
    }

    #[test]
    fn same_complex_street_elevators_spread_west_then_east() {
        let (stations, complexes) = registries();
        let mut collection = empty_collection();
        let feed: Vec<EquipmentRecord> = (0..2)
            .map(|i| {
                let mut equip = elevator(&format!("EL{i}"));
                equip.shortdescription = "Street level".to_string();
                equip
            })
            .collect();

        ingest_equipment(&mut collection, &feed, &stations, &complexes);
        let features = dataset::features(&collection);
        assert_eq!(
            Some([-73.925508 - OFFSET_STEP, 40.76182]),
            dataset::coordinates(&features[0])
        );
        assert_eq!(
            Some([-73.925508 + OFFSET_STEP, 40.76182]),
            dataset::coordinates(&features[1])
        );
    }
}
