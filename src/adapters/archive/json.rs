//! JSON day-file writer

use crate::adapters::archive::layout::{ArchiveLayout, ACQUISITION_TYPE};
use crate::adapters::archive::models::{
    ArchiveDocument, Dataset, GlobalAttributes, StationAttributes, StationGroup, ARCHIVE_VERSION,
};
use crate::adapters::archive::traits::{ArchiveRecord, ArchiveWriter};
use crate::core::transform::{to_columns, StationColumns};
use crate::core::verification::checksum::calculate_checksum_bytes;
use crate::domain::{ExportError, StationId, StationSamples, UtcDay, OBSERVABLES};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Descriptive attributes written for a station
#[derive(Debug, Clone, PartialEq)]
pub struct StationMetadata {
    pub station: StationId,
    pub source: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub description: String,
}

impl StationMetadata {
    pub fn new(station: StationId) -> Self {
        Self {
            station,
            source: String::new(),
            longitude: None,
            latitude: None,
            description: String::new(),
        }
    }

    fn attributes(&self) -> StationAttributes {
        StationAttributes {
            source: self.source.clone(),
            longitude: self.longitude,
            latitude: self.latitude,
            description: self.description.clone(),
        }
    }
}

/// Writes each day as a columnar JSON document below an archive root
pub struct JsonArchiveWriter {
    layout: ArchiveLayout,
    stations: Vec<StationMetadata>,
    system_user: String,
    collection_server: String,
}

impl JsonArchiveWriter {
    pub fn new(layout: ArchiveLayout, stations: Vec<StationMetadata>) -> Self {
        let system_user = std::env::var("USER")
            .or_else(|_| std::env::var("LOGNAME"))
            .unwrap_or_else(|_| "unknown".to_string());
        let collection_server = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string());

        Self {
            layout,
            stations,
            system_user,
            collection_server,
        }
    }

    pub fn layout(&self) -> &ArchiveLayout {
        &self.layout
    }

    /// Build the document for `day`
    ///
    /// Every configured station gets a group, with empty axes when it has no
    /// samples. Samples of unconfigured stations are written with blank attributes.
    pub fn build_document(&self, day: UtcDay, stations: &[StationSamples]) -> ArchiveDocument {
        let mut index_map = BTreeMap::new();
        let mut groups = BTreeMap::new();

        let mut names: Vec<&StationId> = self.stations.iter().map(|m| &m.station).collect();
        for s in stations {
            if !names.contains(&&s.station) {
                names.push(&s.station);
            }
        }

        for station in names {
            let columns = match stations.iter().find(|s| &s.station == station) {
                Some(samples) => to_columns(day, samples),
                None => StationColumns::empty(),
            };
            let axis = ArchiveDocument::axis_name(station.as_str());

            let datasets = OBSERVABLES
                .iter()
                .zip(columns.columns)
                .map(|(observable, data)| {
                    (
                        observable.name.to_string(),
                        Dataset {
                            axis: axis.clone(),
                            units: observable.quantity.archive_unit().to_string(),
                            data,
                        },
                    )
                })
                .collect();

            let attributes = self
                .stations
                .iter()
                .find(|m| &m.station == station)
                .map(StationMetadata::attributes)
                .unwrap_or_else(|| StationMetadata::new(station.clone()).attributes());

            index_map.insert(axis, columns.times);
            groups.insert(
                station.to_string(),
                StationGroup {
                    attributes,
                    datasets,
                },
            );
        }

        ArchiveDocument {
            attributes: GlobalAttributes {
                software_version: env!("CARGO_PKG_VERSION").to_string(),
                system_user: self.system_user.clone(),
                collection_server: self.collection_server.clone(),
                instrument_name: self.layout.instrument().to_string(),
                archive_version: ARCHIVE_VERSION.to_string(),
                acquisition_name: self.layout.acquisition_name(day),
                acquisition_type: ACQUISITION_TYPE.to_string(),
                day: day.to_string(),
            },
            index_map,
            stations: groups,
        }
    }

    async fn write_locked(&self, day: UtcDay, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        let path = self.layout.day_file(day);
        let temp_path = self.layout.temp_file(day);
        let write_error = |e: std::io::Error| ExportError::WriteFailed {
            path: path.clone(),
            message: e.to_string(),
        };

        let mut file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(write_error)?;
        file.write_all(bytes).await.map_err(write_error)?;
        file.sync_all().await.map_err(write_error)?;
        drop(file);

        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(write_error)?;

        #[cfg(unix)]
        {
            let dir = tokio::fs::File::open(self.layout.acquisition_dir(day))
                .await
                .map_err(write_error)?;
            dir.sync_all().await.map_err(write_error)?;
        }

        Ok(path)
    }
}

/// Create the in-progress marker for a day file
///
/// A marker left by a killed run is reused; the day file is rewritten.
async fn mark_in_progress(marker: &Path, day_file: &Path) -> Result<(), ExportError> {
    if tokio::fs::try_exists(marker).await.unwrap_or(false) {
        tracing::warn!(
            path = %marker.display(),
            "Found marker from an interrupted export, rewriting day file"
        );
    }

    tokio::fs::File::create(marker)
        .await
        .map(|_| ())
        .map_err(|e| ExportError::WriteFailed {
            path: day_file.to_path_buf(),
            message: format!("cannot create marker {}: {e}", marker.display()),
        })
}

#[async_trait]
impl ArchiveWriter for JsonArchiveWriter {
    async fn export(
        &self,
        day: UtcDay,
        stations: &[StationSamples],
    ) -> Result<ArchiveRecord, ExportError> {
        let root = self.layout.root();
        if !tokio::fs::metadata(root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            return Err(ExportError::ArchiveRootMissing(root.to_path_buf()));
        }

        let document = self.build_document(day, stations);
        let records = document.record_count();
        let bytes = serde_json::to_vec(&document).map_err(|e| ExportError::EncodeFailed {
            day: day.to_string(),
            message: e.to_string(),
        })?;
        let checksum = calculate_checksum_bytes(&bytes);

        let dir = self.layout.acquisition_dir(day);
        let day_file = self.layout.day_file(day);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ExportError::WriteFailed {
                path: day_file.clone(),
                message: e.to_string(),
            })?;

        let lock_path = self.layout.lock_file(day);
        mark_in_progress(&lock_path, &day_file).await?;

        let result = self.write_locked(day, &bytes).await;
        if result.is_err() {
            let _ = tokio::fs::remove_file(self.layout.temp_file(day)).await;
        }
        if let Err(e) = tokio::fs::remove_file(&lock_path).await {
            tracing::warn!(path = %lock_path.display(), error = %e, "Failed to remove in-progress marker");
        }
        let path = result?;

        tracing::debug!(
            day = %day,
            path = %path.display(),
            records,
            bytes = bytes.len(),
            "Archive file written"
        );

        Ok(ArchiveRecord {
            day,
            path,
            records,
            checksum,
        })
    }

    fn location(&self) -> String {
        self.layout.root().display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{slot_start, Sample, UnitSystem};
    use tempfile::TempDir;

    fn roof() -> StationId {
        StationId::new("roof").unwrap()
    }

    fn writer(root: &Path) -> JsonArchiveWriter {
        let mut metadata = StationMetadata::new(roof());
        metadata.longitude = Some(16.37);
        metadata.latitude = Some(48.21);
        metadata.description = "Rooftop".to_string();
        JsonArchiveWriter::new(ArchiveLayout::new(root, "aws-test"), vec![metadata])
    }

    fn samples(day: UtcDay, count: usize) -> Vec<StationSamples> {
        let samples = (0..count)
            .map(|slot| {
                let mut s = Sample::empty(slot_start(day, slot), UnitSystem::Us);
                s.values[4] = Some(50.0);
                s
            })
            .collect();
        vec![StationSamples::new(roof(), samples)]
    }

    #[tokio::test]
    async fn test_export_writes_day_file() {
        let temp = TempDir::new().unwrap();
        let writer = writer(temp.path());
        let day = UtcDay::from_ymd(2024, 3, 11).unwrap();

        let record = writer.export(day, &samples(day, 3)).await.unwrap();

        assert_eq!(record.records, 3);
        assert_eq!(record.path, writer.layout().day_file(day));
        assert!(!writer.layout().lock_file(day).exists());
        assert!(!writer.layout().temp_file(day).exists());

        let bytes = std::fs::read(&record.path).unwrap();
        assert_eq!(calculate_checksum_bytes(&bytes), record.checksum);

        let document: ArchiveDocument = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(document.attributes.day, "2024-03-11");
        assert_eq!(document.attributes.acquisition_type, "weather");
        let out_temp = &document.stations["roof"].datasets["outTemp"];
        assert_eq!(out_temp.units, "deg C");
        assert!((out_temp.data[0].unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(document.index_map["station_time_roof"].len(), 3);
    }

    #[tokio::test]
    async fn test_export_requires_root() {
        let temp = TempDir::new().unwrap();
        let writer = writer(&temp.path().join("missing"));
        let day = UtcDay::from_ymd(2024, 3, 11).unwrap();

        let result = writer.export(day, &samples(day, 1)).await;
        assert!(matches!(result, Err(ExportError::ArchiveRootMissing(_))));
    }

    #[tokio::test]
    async fn test_export_rewrites_day_left_by_killed_run() {
        let temp = TempDir::new().unwrap();
        let writer = writer(temp.path());
        let day = UtcDay::from_ymd(2024, 3, 11).unwrap();

        std::fs::create_dir_all(writer.layout().acquisition_dir(day)).unwrap();
        std::fs::write(writer.layout().lock_file(day), b"").unwrap();
        std::fs::write(writer.layout().day_file(day), b"{\"partial\":").unwrap();

        let record = writer.export(day, &samples(day, 2)).await.unwrap();

        assert_eq!(record.records, 2);
        assert!(!writer.layout().lock_file(day).exists());
        let document: ArchiveDocument =
            serde_json::from_slice(&std::fs::read(&record.path).unwrap()).unwrap();
        assert_eq!(document.record_count(), 2);
    }

    #[tokio::test]
    async fn test_reexport_overwrites() {
        let temp = TempDir::new().unwrap();
        let writer = writer(temp.path());
        let day = UtcDay::from_ymd(2024, 3, 11).unwrap();

        writer.export(day, &samples(day, 1)).await.unwrap();
        let record = writer.export(day, &samples(day, 5)).await.unwrap();

        let document: ArchiveDocument =
            serde_json::from_slice(&std::fs::read(&record.path).unwrap()).unwrap();
        assert_eq!(document.record_count(), 5);
    }

    #[test]
    fn test_configured_station_without_samples_gets_empty_group() {
        let writer = writer(Path::new("/unused"));
        let day = UtcDay::from_ymd(2024, 3, 11).unwrap();

        let document = writer.build_document(day, &[]);
        assert_eq!(document.record_count(), 0);
        assert_eq!(document.stations["roof"].attributes.latitude, Some(48.21));
        assert_eq!(document.stations["roof"].datasets.len(), OBSERVABLES.len());
    }
}
