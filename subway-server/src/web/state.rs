//! Application state for the web layer.

use crate::service::{LineService, StationService};
use crate::store::Store;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Station registry
    pub stations: StationService,

    /// Lines and their section chains
    pub lines: LineService,
}

impl AppState {
    /// Create a new app state over one store.
    pub fn new(store: Store) -> Self {
        Self {
            stations: StationService::new(store.clone()),
            lines: LineService::new(store),
        }
    }
}
