use anyhow::Context;
use rustc_hash::FxHashSet;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// The curated elevator dataset is handled as untyped JSON: hand-maintained
/// features carry properties we must pass through untouched, and unresolved
/// elevators sit at an explicit `[null, null]` coordinate that a typed
/// GeoJSON point cannot represent.
pub fn load_feature_collection(path: &Path) -> anyhow::Result<Value> {
    if !path.exists() {
        return Err(mta_feed::Error::MissingFile(path.display().to_string()).into());
    }
    let contents = fs::read_to_string(path)?;
    let collection: Value =
        serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
    anyhow::ensure!(
        collection.get("features").map_or(false, Value::is_array),
        "{} is not a feature collection",
        path.display()
    );
    Ok(collection)
}

pub fn save_feature_collection(path: &Path, collection: &Value) -> anyhow::Result<()> {
    write_pretty(path, collection)
}

/// Whole-file overwrite, 2-space pretty JSON like the rest of the dataset
/// files in the repository.
pub fn write_pretty<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn features(collection: &Value) -> &[Value] {
    collection
        .get("features")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn features_mut(collection: &mut Value) -> Option<&mut Vec<Value>> {
    collection.get_mut("features").and_then(Value::as_array_mut)
}

pub fn push_feature(collection: &mut Value, feature: Value) {
    if let Some(features) = features_mut(collection) {
        features.push(feature);
    }
}

/// String property of a feature, empty when absent or not a string.
pub fn prop_str<'a>(feature: &'a Value, key: &str) -> &'a str {
    feature
        .get("properties")
        .and_then(|properties| properties.get(key))
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// The feature's point coordinate, `None` when either component is null.
pub fn coordinates(feature: &Value) -> Option<[f64; 2]> {
    let coordinates = feature.get("geometry")?.get("coordinates")?.as_array()?;
    match (coordinates.first()?.as_f64(), coordinates.get(1)?.as_f64()) {
        (Some(longitude), Some(latitude)) => Some([longitude, latitude]),
        _ => None,
    }
}

pub fn set_coordinates(feature: &mut Value, coordinate: [f64; 2]) {
    if let Some(geometry) = feature.get_mut("geometry").and_then(Value::as_object_mut) {
        geometry.insert(
            "coordinates".to_string(),
            serde_json::json!([coordinate[0], coordinate[1]]),
        );
    }
}

/// Elevator numbers already present in the curated dataset. Equipment whose
/// number is a member is skipped wholesale, which is what makes re-running
/// the ingestion against the same snapshot a no-op.
pub fn existing_elevator_index(collection: &Value) -> FxHashSet<String> {
    features(collection)
        .iter()
        .map(|feature| prop_str(feature, "elevatorno"))
        .filter(|elevatorno| !elevatorno.is_empty())
        .map(str::to_string)
        .collect()
}
