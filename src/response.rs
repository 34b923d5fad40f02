/// JSON payload shapes returned to API callers.
///
/// Field names are fixed by existing clients and do not follow Rust naming:
/// stations use `Station`/`Name`/`Lat`/`Lon`/`Elevation`, the per-station
/// series is wrapped in `Temperatures`, and the range statistics come back
/// as one positional `[min, avg, max]` array under `min_avg_max_Temps`.
/// Missing values serialize as `null`.

use crate::model::{Station, TemperatureStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// `date -> precipitation`, keys ascending.
pub type PrecipitationResponse = BTreeMap<String, Option<f64>>;

/// One entry of the station catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationResponse {
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Lat")]
    pub lat: f64,
    #[serde(rename = "Lon")]
    pub lon: f64,
    #[serde(rename = "Elevation")]
    pub elevation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSeriesResponse {
    #[serde(rename = "Temperatures")]
    pub temperatures: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureStatsResponse {
    #[serde(rename = "min_avg_max_Temps")]
    pub min_avg_max_temps: [Option<f64>; 3],
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

impl From<&Station> for StationResponse {
    fn from(station: &Station) -> Self {
        StationResponse {
            station: station.station_id.clone(),
            name: station.name.clone(),
            lat: station.latitude,
            lon: station.longitude,
            elevation: station.elevation,
        }
    }
}

pub fn format_precipitation(series: BTreeMap<String, Option<f64>>) -> PrecipitationResponse {
    series
}

pub fn format_stations(stations: &[Station]) -> Vec<StationResponse> {
    stations.iter().map(StationResponse::from).collect()
}

pub fn format_temperatures(temperatures: Vec<f64>) -> TemperatureSeriesResponse {
    TemperatureSeriesResponse { temperatures }
}

pub fn format_temperature_stats(stats: &TemperatureStats) -> TemperatureStatsResponse {
    TemperatureStatsResponse {
        min_avg_max_temps: stats.as_triple(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
