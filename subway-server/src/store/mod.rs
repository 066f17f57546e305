//! Persistence for stations and lines.
//!
//! The store keeps the whole network in memory behind a single lock and,
//! when configured, mirrors it to a JSON snapshot on disk. Mutations go
//! through [`Store::transact`], which holds the write lock for the whole
//! check-and-mutate and only publishes the new state once the snapshot has
//! been written.

mod error;
mod snapshot;
mod tables;

use std::sync::Arc;

use tokio::sync::RwLock;

pub use error::SnapshotError;
pub use snapshot::Snapshot;
pub use tables::Tables;

/// Shared handle to the network tables.
#[derive(Clone)]
pub struct Store {
    tables: Arc<RwLock<Tables>>,
    snapshot: Option<Arc<Snapshot>>,
}

impl Store {
    /// Create a store that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::new())),
            snapshot: None,
        }
    }

    /// Open a store backed by a snapshot file, loading it if it exists.
    pub fn open(snapshot: Snapshot) -> Result<Self, SnapshotError> {
        let tables = snapshot.load()?.unwrap_or_default();
        Ok(Self {
            tables: Arc::new(RwLock::new(tables)),
            snapshot: Some(Arc::new(snapshot)),
        })
    }

    /// Run a read-only query against the tables.
    pub async fn view<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        let guard = self.tables.read().await;
        f(&*guard)
    }

    /// Run a mutation against the tables.
    ///
    /// With a snapshot configured, `f` runs against a staged copy that replaces
    /// the live tables only after it succeeds and the snapshot is saved. `f`
    /// must leave the tables untouched when it returns an error.
    pub async fn transact<T, E>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<SnapshotError>,
    {
        let mut guard = self.tables.write().await;
        match &self.snapshot {
            None => f(&mut *guard),
            Some(snapshot) => {
                let mut staged = (*guard).clone();
                let value = f(&mut staged)?;
                snapshot.save(&staged)?;
                *guard = staged;
                Ok(value)
            }
        }
    }
}
