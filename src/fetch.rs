use crate::configuration::Configuration;
use anyhow::Context;
use log::info;
use mta_feed::EquipmentRecord;
use std::fs;

pub async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
    api_key: Option<&str>,
) -> anyhow::Result<String> {
    let mut request = client.get(url);
    if let Some(key) = api_key {
        request = request.header("x-api-key", key);
    }
    let response = request
        .send()
        .await
        .with_context(|| format!("fetching {url}"))?
        .error_for_status()?;
    Ok(response.text().await?)
}

/// Fetches the ENE equipment feed and saves the snapshot next to the other
/// generated files. The snapshot keeps the comment header marking it as
/// machine-written.
pub async fn fetch_equipment(
    configuration: &Configuration,
    client: &reqwest::Client,
) -> anyhow::Result<Vec<EquipmentRecord>> {
    let api_key = configuration
        .api_key
        .as_deref()
        .context("MTA_API_KEY is not set")?;

    info!("Fetching latest MTA equipment data...");
    let body = fetch_text(client, &configuration.equipment_url, Some(api_key)).await?;
    let records = mta_feed::read_equipment_json(&body)?;

    let snapshot_file = configuration.equipment_snapshot_file();
    if let Some(parent) = snapshot_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let snapshot = format!(
        "// This file is auto-generated. Do not edit manually.\n{}",
        serde_json::to_string_pretty(&records)?
    );
    fs::write(&snapshot_file, snapshot)
        .with_context(|| format!("writing {}", snapshot_file.display()))?;
    info!("Saved latest equipment data to {}", snapshot_file.display());

    Ok(records)
}
