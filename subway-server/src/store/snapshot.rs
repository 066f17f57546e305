//! JSON snapshot of the whole network on disk.
//!
//! The snapshot is written after every successful mutation and read once at
//! startup. Lines are rebuilt by replaying their sections through
//! [`Line::add_section`], so a snapshot that describes a broken chain is
//! rejected rather than trusted.

use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::SnapshotError;
use super::tables::Tables;
use crate::domain::{Distance, Line, LineId, Section, Station, StationId};

/// On-disk layout of the snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    saved_at: DateTime<Utc>,
    last_station_id: u64,
    last_line_id: u64,
    stations: Vec<StationRecord>,
    lines: Vec<LineRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StationRecord {
    id: StationId,
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct LineRecord {
    id: LineId,
    name: String,
    color: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    /// Sections in up→down order.
    sections: Vec<SectionRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SectionRecord {
    up_station: StationId,
    down_station: StationId,
    distance: Distance,
}

/// A snapshot file location.
#[derive(Debug, Clone)]
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the tables from disk.
    ///
    /// Returns `Ok(None)` if the file does not exist yet.
    pub fn load(&self) -> Result<Option<Tables>, SnapshotError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no snapshot found");
                return Ok(None);
            }
            Err(source) => {
                return Err(SnapshotError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let file: SnapshotFile = serde_json::from_str(&contents)?;
        let tables = rebuild(file)?;
        info!(
            path = %self.path.display(),
            stations = tables.stations().count(),
            lines = tables.lines().count(),
            "loaded snapshot"
        );
        Ok(Some(tables))
    }

    /// Write the tables to disk.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, tables: &Tables) -> Result<(), SnapshotError> {
        let file = SnapshotFile {
            saved_at: Utc::now(),
            last_station_id: tables.last_station_id(),
            last_line_id: tables.last_line_id(),
            stations: tables
                .stations()
                .map(|s| StationRecord {
                    id: s.id(),
                    name: s.name().to_string(),
                })
                .collect(),
            lines: tables.lines().map(line_record).collect(),
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|source| SnapshotError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, json).map_err(|source| SnapshotError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), "saved snapshot");
        Ok(())
    }
}

fn line_record(line: &Line) -> LineRecord {
    LineRecord {
        id: line.id(),
        name: line.name().to_string(),
        color: line.color().to_string(),
        created_at: line.created_at(),
        modified_at: line.modified_at(),
        sections: line
            .sections()
            .iter()
            .map(|s| SectionRecord {
                up_station: s.up_station().id(),
                down_station: s.down_station().id(),
                distance: s.distance(),
            })
            .collect(),
    }
}

fn rebuild(file: SnapshotFile) -> Result<Tables, SnapshotError> {
    let mut tables = Tables::new();
    let mut stations: HashMap<StationId, Station> = HashMap::new();
    let mut station_names = HashSet::new();
    let mut line_names = HashSet::new();

    for record in file.stations {
        let station = Station::new(record.id, &record.name)
            .map_err(|e| SnapshotError::Corrupt(format!("station {}: {e}", record.id)))?;
        if stations.insert(station.id(), station.clone()).is_some() {
            return Err(SnapshotError::Corrupt(format!(
                "station {} appears twice",
                record.id
            )));
        }
        if !station_names.insert(station.name().to_string()) {
            return Err(SnapshotError::Corrupt(format!(
                "station name {:?} appears twice",
                station.name()
            )));
        }
        tables.insert_station(station);
    }

    for record in file.lines {
        if tables.line(record.id).is_some() {
            return Err(SnapshotError::Corrupt(format!(
                "line {} appears twice",
                record.id
            )));
        }
        let mut line = Line::new(record.id, &record.name, &record.color)
            .map_err(|e| SnapshotError::Corrupt(format!("line {}: {e}", record.id)))?;
        if !line_names.insert(line.name().to_string()) {
            return Err(SnapshotError::Corrupt(format!(
                "line name {:?} appears twice",
                line.name()
            )));
        }

        for section in record.sections {
            let lookup = |id: StationId| {
                stations.get(&id).cloned().ok_or_else(|| {
                    SnapshotError::Corrupt(format!(
                        "line {} references unknown station {id}",
                        record.id
                    ))
                })
            };
            let up = lookup(section.up_station)?;
            let down = lookup(section.down_station)?;
            let section = Section::new(record.id, up, down, i64::from(section.distance.get()))
                .map_err(|e| SnapshotError::Corrupt(format!("line {}: {e}", record.id)))?;
            line.add_section(section)
                .map_err(|e| SnapshotError::Corrupt(format!("line {}: {e}", record.id)))?;
        }

        tables.insert_line(line.with_timestamps(record.created_at, record.modified_at));
    }

    tables.restore_sequences(file.last_station_id, file.last_line_id);
    Ok(tables)
}
