use std::env;
use std::path::PathBuf;

const EQUIPMENT_URL: &str =
    "https://api-endpoint.mta.info/Dataservice/mtagtfsfeeds/nyct%2Fnyct_ene_equipments.json";
const STATIONS_URL: &str = "https://data.ny.gov/resource/39hk-dx4f.geojson";

/// Where the input datasets live and where the derived artifacts go. The
/// directory layout follows the front-end repository: datasets under
/// `resources/`, machine-written files under `resources/generated/`, and the
/// embeddable constants under `utils/` where the map imports them from.
pub struct Configuration {
    pub resources_dir: PathBuf,
    pub utils_dir: PathBuf,
    pub equipment_url: String,
    pub stations_url: String,
    pub api_key: Option<String>,
}

impl Configuration {
    pub fn from_env() -> Self {
        let resources_dir = env::var_os("TRANSIT_ACCESS_RESOURCES")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("resources"));
        let utils_dir = env::var_os("TRANSIT_ACCESS_UTILS")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("utils"));
        Configuration {
            resources_dir,
            utils_dir,
            equipment_url: EQUIPMENT_URL.to_string(),
            stations_url: STATIONS_URL.to_string(),
            api_key: env::var("MTA_API_KEY").ok(),
        }
    }

    fn generated_dir(&self) -> PathBuf {
        self.resources_dir.join("generated")
    }

    pub fn stations_file(&self) -> PathBuf {
        self.resources_dir.join("mta_subway_stations_all.json")
    }

    pub fn curated_file(&self) -> PathBuf {
        self.resources_dir.join("custom_elevator_dataset.json")
    }

    pub fn complexes_csv(&self) -> PathBuf {
        self.resources_dir.join("mta_subway_stations_and_complexes.csv")
    }

    pub fn complexes_geojson(&self) -> PathBuf {
        self.resources_dir.join("mta_subway_complexes.geojson")
    }

    pub fn equipment_snapshot_file(&self) -> PathBuf {
        self.generated_dir().join("mta_equipments.json")
    }

    pub fn accessible_station_geojson(&self) -> PathBuf {
        self.resources_dir.join("accessibleStationGeometry.geojson")
    }

    pub fn accessible_station_json(&self) -> PathBuf {
        self.resources_dir.join("accessibleStationGeometry.json")
    }

    pub fn accessible_station_ts(&self) -> PathBuf {
        self.utils_dir.join("accessibleStationGeometry.ts")
    }

    pub fn complex_geometry_geojson(&self) -> PathBuf {
        self.resources_dir.join("ComplexGeometry.geojson")
    }

    pub fn complex_geometry_json(&self) -> PathBuf {
        self.resources_dir.join("ComplexGeometry.json")
    }

    pub fn complex_geometry_js(&self) -> PathBuf {
        self.utils_dir.join("ComplexGeometry.js")
    }

    pub fn outage_dataset_geojson(&self) -> PathBuf {
        self.generated_dir().join("elevatorOutagesDataset.geojson")
    }

    pub fn outage_geometry_json(&self) -> PathBuf {
        self.generated_dir().join("elevatorOutageGeometry.json")
    }

    pub fn outage_geometry_ts(&self) -> PathBuf {
        self.utils_dir.join("elevatorOutageGeometry.ts")
    }

    pub fn street_lines_geojson(&self) -> PathBuf {
        self.resources_dir.join("street_to_station_lines.geojson")
    }
}
