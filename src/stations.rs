use crate::configuration::Configuration;
use crate::dataset;
use crate::fetch;
use crate::registry::prop_string;
use geojson::{Feature, FeatureCollection};
use log::info;
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value;
use std::fs;

#[derive(Debug)]
pub struct PropertyChange {
    pub key: String,
    pub old: Option<Value>,
    pub new: Value,
}

#[derive(Debug)]
pub struct ModifiedStation {
    pub gtfs_stop_id: String,
    pub stop_name: String,
    pub changes: Vec<PropertyChange>,
}

#[derive(Debug, Default)]
pub struct StationDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<ModifiedStation>,
}

impl StationDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

fn stop_id(feature: &Feature) -> Option<String> {
    let properties = feature.properties.as_ref()?;
    let id = prop_string(properties, "gtfs_stop_id");
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Field-level diff between two station snapshots, keyed by GTFS stop id
/// (the only station identifier that is stable across refreshes). Only the
/// properties are compared; geometry edits show up upstream as property
/// changes anyway.
pub fn diff_station_snapshots(old: &[Feature], new: &[Feature]) -> StationDiff {
    let old_by_id: FxHashMap<String, &Feature> = old
        .iter()
        .filter_map(|feature| stop_id(feature).map(|id| (id, feature)))
        .collect();
    let new_ids: FxHashSet<String> = new.iter().filter_map(stop_id).collect();

    let mut diff = StationDiff::default();

    for feature in old {
        if let Some(id) = stop_id(feature) {
            if !new_ids.contains(&id) {
                diff.removed.push(id);
            }
        }
    }

    for feature in new {
        let Some(id) = stop_id(feature) else {
            continue;
        };
        let Some(old_feature) = old_by_id.get(&id) else {
            diff.added.push(id);
            continue;
        };

        let empty = geojson::JsonObject::new();
        let new_properties = feature.properties.as_ref().unwrap_or(&empty);
        let old_properties = old_feature.properties.as_ref().unwrap_or(&empty);

        let mut changes = Vec::new();
        for (key, new_value) in new_properties {
            let old_value = old_properties.get(key.as_str());
            if old_value != Some(new_value) {
                changes.push(PropertyChange {
                    key: key.clone(),
                    old: old_value.cloned(),
                    new: new_value.clone(),
                });
            }
        }

        if !changes.is_empty() {
            diff.modified.push(ModifiedStation {
                gtfs_stop_id: id,
                stop_name: prop_string(new_properties, "stop_name"),
                changes,
            });
        }
    }

    diff
}

pub fn log_station_diff(diff: &StationDiff) {
    if diff.is_empty() {
        info!("No station changes detected.");
        return;
    }
    info!(
        "Station changes -- added: {} | removed: {} | modified: {}",
        diff.added.len(),
        diff.removed.len(),
        diff.modified.len()
    );
    for id in &diff.added {
        info!("  added {id}");
    }
    for id in &diff.removed {
        info!("  removed {id}");
    }
    for station in &diff.modified {
        for change in &station.changes {
            info!(
                "  {} ({}): {} {:?} -> {}",
                station.gtfs_stop_id, station.stop_name, change.key, change.old, change.new
            );
        }
    }
}

/// Fetches the latest station snapshot, reports the diff against the
/// previous one and overwrites it. The previous snapshot may be missing
/// (first run diffs against nothing) but a corrupt one is a fatal error, so
/// bad registry data never silently reads as "everything changed".
pub async fn refresh_stations(
    configuration: &Configuration,
    client: &reqwest::Client,
) -> anyhow::Result<FeatureCollection> {
    info!("Fetching latest MTA station data...");
    let body = fetch::fetch_text(client, &configuration.stations_url, None).await?;
    let new_features = parse_features(&body)?;

    let stations_file = configuration.stations_file();
    let old_features = if stations_file.exists() {
        parse_features(&fs::read_to_string(&stations_file)?)?
    } else {
        Vec::new()
    };

    log_station_diff(&diff_station_snapshots(&old_features, &new_features));

    let collection = FeatureCollection {
        bbox: None,
        features: new_features,
        foreign_members: None,
    };
    dataset::write_pretty(&stations_file, &collection)?;
    info!("Saved latest MTA station data to {}", stations_file.display());
    Ok(collection)
}

/// The endpoint answers with a FeatureCollection, but older snapshots were
/// stored as a bare feature array; accept both.
fn parse_features(contents: &str) -> anyhow::Result<Vec<Feature>> {
    let value: Value = serde_json::from_str(contents)?;
    let features = match value {
        Value::Object(mut object) => object
            .remove("features")
            .ok_or_else(|| anyhow::anyhow!("station data has no features array"))?,
        array @ Value::Array(_) => array,
        _ => anyhow::bail!("station data is neither a feature collection nor a feature list"),
    };
    Ok(serde_json::from_value(features)?)
}
