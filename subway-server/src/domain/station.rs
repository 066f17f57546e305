//! Station type.

use std::fmt;

use super::error::{InvalidName, validate_name};
use super::ids::StationId;

/// A named point on the network.
///
/// Stations are immutable once created. The name is guaranteed non-empty and
/// free of surrounding whitespace by construction.
///
/// # Examples
///
/// ```
/// use subway_server::domain::{Station, StationId};
///
/// let gangnam = Station::new(StationId(1), " Gangnam ").unwrap();
/// assert_eq!(gangnam.name(), "Gangnam");
///
/// // Blank names are rejected
/// assert!(Station::new(StationId(2), "  ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Station {
    id: StationId,
    name: String,
}

impl Station {
    /// Create a station, validating its name.
    pub fn new(id: StationId, name: &str) -> Result<Self, InvalidName> {
        Ok(Self {
            id,
            name: validate_name(name)?,
        })
    }

    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether both values denote the same station.
    pub fn is_same_as(&self, other: &Station) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Station({}, {})", self.id, self.name)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
