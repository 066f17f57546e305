//! In-memory tables of stations and lines.

use std::collections::BTreeMap;

use crate::domain::{Line, LineId, Station, StationId};

/// Registry of all stations and lines, with their id sequences.
///
/// Ids are handed out from monotonically increasing counters starting at 1 and
/// are never reused, even after a delete.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    stations: BTreeMap<StationId, Station>,
    lines: BTreeMap<LineId, Line>,
    last_station_id: u64,
    last_line_id: u64,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next station allocation will return, without reserving it.
    pub fn next_station_id(&self) -> StationId {
        StationId(self.last_station_id + 1)
    }

    /// The id the next line allocation will return, without reserving it.
    pub fn next_line_id(&self) -> LineId {
        LineId(self.last_line_id + 1)
    }

    /// Reserve the next station id.
    pub fn allocate_station_id(&mut self) -> StationId {
        self.last_station_id += 1;
        StationId(self.last_station_id)
    }

    /// Reserve the next line id.
    pub fn allocate_line_id(&mut self) -> LineId {
        self.last_line_id += 1;
        LineId(self.last_line_id)
    }

    pub(crate) fn last_station_id(&self) -> u64 {
        self.last_station_id
    }

    pub(crate) fn last_line_id(&self) -> u64 {
        self.last_line_id
    }

    /// Restore the id sequences, never moving them behind an existing id.
    pub(crate) fn restore_sequences(&mut self, last_station_id: u64, last_line_id: u64) {
        let max_station = self.stations.keys().next_back().map_or(0, |id| id.0);
        let max_line = self.lines.keys().next_back().map_or(0, |id| id.0);
        self.last_station_id = last_station_id.max(max_station);
        self.last_line_id = last_line_id.max(max_line);
    }

    pub fn insert_station(&mut self, station: Station) {
        self.stations.insert(station.id(), station);
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(&id)
    }

    /// Stations ordered by id.
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn remove_station(&mut self, id: StationId) -> Option<Station> {
        self.stations.remove(&id)
    }

    pub fn insert_line(&mut self, line: Line) {
        self.lines.insert(line.id(), line);
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(&id)
    }

    pub fn line_mut(&mut self, id: LineId) -> Option<&mut Line> {
        self.lines.get_mut(&id)
    }

    /// Lines ordered by id.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    pub fn remove_line(&mut self, id: LineId) -> Option<Line> {
        self.lines.remove(&id)
    }
}
