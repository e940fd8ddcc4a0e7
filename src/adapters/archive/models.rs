//! Columnar JSON archive document
//!
//! One document holds one UTC day for every configured station. Each
//! station has its own time axis in `index_map`; its datasets reference the
//! axis by name and hold one value (or `null`) per axis entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version of the document layout
pub const ARCHIVE_VERSION: &str = "4.0.0";

/// A day file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveDocument {
    pub attributes: GlobalAttributes,
    /// Time axes by name, epoch seconds
    pub index_map: BTreeMap<String, Vec<i64>>,
    /// Station groups by station name
    pub stations: BTreeMap<String, StationGroup>,
}

impl ArchiveDocument {
    /// Name of `station`'s time axis
    pub fn axis_name(station: &str) -> String {
        format!("station_time_{station}")
    }

    /// Samples across all stations
    pub fn record_count(&self) -> usize {
        self.index_map.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalAttributes {
    pub software_version: String,
    pub system_user: String,
    pub collection_server: String,
    pub instrument_name: String,
    pub archive_version: String,
    pub acquisition_name: String,
    pub acquisition_type: String,
    /// `YYYY-MM-DD`
    pub day: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationGroup {
    pub attributes: StationAttributes,
    pub datasets: BTreeMap<String, Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationAttributes {
    /// Where the samples were read from, without credentials
    pub source: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub axis: String,
    pub units: String,
    pub data: Vec<Option<f64>>,
}
