mod artifacts;
mod configuration;
mod dataset;
mod direction;
mod fetch;
mod ingest;
mod placement;
mod registry;
mod reposition;
mod stations;

use crate::configuration::Configuration;
use crate::ingest::IngestSummary;
use crate::registry::{ComplexRegistry, StationRegistry};
use crate::reposition::{Anchor, RestackSummary};
use anyhow::Context;
use geojson::FeatureCollection;
use log::{error, info, warn};
use std::fs::File;

fn main() {
    env_logger::init();

    let configuration = Configuration::from_env();
    let rt = tokio::runtime::Runtime::new().unwrap();
    if let Err(e) = rt.block_on(run(&configuration)) {
        error!("batch aborted: {e:#}");
        std::process::exit(1);
    }
}

async fn run(configuration: &Configuration) -> anyhow::Result<()> {
    let client = reqwest::Client::new();

    let stations = stations::refresh_stations(configuration, &client).await?;
    let equipment = fetch::fetch_equipment(configuration, &client).await?;

    let complexes = load_complexes(configuration)?;
    dataset::write_pretty(&configuration.complexes_geojson(), &complexes)?;

    let station_registry = StationRegistry::from_features(&stations);
    let complex_registry = ComplexRegistry::from_features(&complexes);
    info!(
        "Registries loaded: {} stations, {} complexes",
        station_registry.len(),
        complex_registry.len()
    );
    if station_registry.is_empty() {
        warn!("station registry is empty; every elevator will fall back to complex placement");
    }
    if complex_registry.is_empty() {
        warn!("complex registry is empty; unresolvable stations have no fallback anchor");
    }

    let mut curated = dataset::load_feature_collection(&configuration.curated_file())?;
    let ingest_summary =
        ingest::ingest_equipment(&mut curated, &equipment, &station_registry, &complex_registry);

    let anchors = station_registry.anchor_lookup();
    let restack_summary =
        reposition::restack_platform_elevators(&mut curated, &anchors, Anchor::Station);

    dataset::save_feature_collection(&configuration.curated_file(), &curated)?;

    artifacts::write_artifacts(configuration, &stations, &complexes, &curated, &station_registry)?;

    report(&ingest_summary, &restack_summary);
    Ok(())
}

fn load_complexes(configuration: &Configuration) -> anyhow::Result<FeatureCollection> {
    let path = configuration.complexes_csv();
    let file = File::open(&path)
        .map_err(|_| mta_feed::Error::MissingFile(path.display().to_string()))?;
    let rows = mta_feed::read_complex_csv(file)
        .with_context(|| format!("reading {}", path.display()))?;
    let collection = mta_feed::complexes_to_geojson(&rows);
    info!(
        "Converted {} complex entries to GeoJSON",
        collection.features.len()
    );
    Ok(collection)
}

fn report(ingest: &IngestSummary, restack: &RestackSummary) {
    if ingest.added.is_empty() {
        info!("All accessible MTA elevators already present. No new elevators were added.");
    } else {
        info!("Added {} new elevators:", ingest.added.len());
        for added in &ingest.added {
            info!("  {} - {}", added.elevatorno, added.title);
        }
    }
    if !ingest.unresolved.is_empty() {
        warn!(
            "{} elevator(s) without coordinates need manual review: {}",
            ingest.unresolved.len(),
            ingest.unresolved.join(", ")
        );
    }
    info!("Restacked {} platform elevators", restack.restacked);
    if !restack.missing_anchors.is_empty() {
        warn!(
            "{} station group(s) had no anchor coordinates: {}",
            restack.missing_anchors.len(),
            restack.missing_anchors.join(", ")
        );
    }
}
