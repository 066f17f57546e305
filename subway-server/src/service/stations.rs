//! Station registry operations.

use tracing::info;

use super::error::ServiceError;
use crate::domain::{Station, StationId, validate_name};
use crate::store::Store;

/// Create, list and delete stations.
#[derive(Clone)]
pub struct StationService {
    store: Store,
}

impl StationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Register a new station. Names are unique.
    pub async fn create_station(&self, name: &str) -> Result<Station, ServiceError> {
        let name = validate_name(name)?;
        let station = self
            .store
            .transact(|tables| {
                if tables.stations().any(|s| s.name() == name) {
                    return Err(ServiceError::DuplicateStationName(name.clone()));
                }
                let station = Station::new(tables.next_station_id(), &name)?;
                tables.allocate_station_id();
                tables.insert_station(station.clone());
                Ok(station)
            })
            .await?;

        info!(id = %station.id(), name = station.name(), "created station");
        Ok(station)
    }

    /// All stations, ordered by id.
    pub async fn stations(&self) -> Vec<Station> {
        self.store
            .view(|tables| tables.stations().cloned().collect())
            .await
    }

    /// Look up one station.
    pub async fn station(&self, id: StationId) -> Result<Station, ServiceError> {
        self.store
            .view(|tables| tables.station(id).cloned())
            .await
            .ok_or(ServiceError::StationNotFound(id))
    }

    /// Delete a station that no line references.
    pub async fn delete_station(&self, id: StationId) -> Result<(), ServiceError> {
        self.store
            .transact(|tables| {
                if tables.station(id).is_none() {
                    return Err(ServiceError::StationNotFound(id));
                }
                if let Some(line) = tables
                    .lines()
                    .find(|line| line.sections().contains_station(id))
                {
                    return Err(ServiceError::StationInUse {
                        station: id,
                        line: line.id(),
                    });
                }
                tables.remove_station(id);
                Ok(())
            })
            .await?;

        info!(%id, "deleted station");
        Ok(())
    }
}
