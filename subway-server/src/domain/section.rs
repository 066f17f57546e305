//! Sections: directed, distance-weighted edges between two stations.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::error::SectionError;
use super::ids::LineId;
use super::station::Station;

/// Length of a section. Always strictly positive.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distance(NonZeroU32);

impl Distance {
    /// Create a distance, rejecting zero and negative values.
    ///
    /// # Examples
    ///
    /// ```
    /// use subway_server::domain::Distance;
    ///
    /// assert_eq!(Distance::new(10).unwrap().get(), 10);
    /// assert!(Distance::new(0).is_err());
    /// assert!(Distance::new(-3).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, SectionError> {
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Distance)
            .ok_or(SectionError::IllegalSection("distance must be positive"))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// `self - other`, or `None` when the result would not be positive.
    pub fn checked_sub(self, other: Distance) -> Option<Distance> {
        self.get()
            .checked_sub(other.get())
            .and_then(NonZeroU32::new)
            .map(Distance)
    }
}

impl fmt::Debug for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance({})", self.get())
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// One edge of a line's chain.
///
/// A section is scoped to exactly one line and always joins two distinct
/// stations. Once added to a [`Sections`](super::Sections) it is owned by that
/// collection; its distance only changes when a later insertion splits it.
#[derive(Clone, PartialEq, Eq)]
pub struct Section {
    line: LineId,
    up_station: Station,
    down_station: Station,
    distance: Distance,
}

impl Section {
    /// Create a section.
    ///
    /// Fails with [`SectionError::IllegalSection`] if both ends are the same
    /// station or the distance is not positive.
    pub fn new(
        line: LineId,
        up_station: Station,
        down_station: Station,
        distance: i64,
    ) -> Result<Self, SectionError> {
        if up_station.is_same_as(&down_station) {
            return Err(SectionError::IllegalSection(
                "up and down stations are the same",
            ));
        }
        let distance = Distance::new(distance)?;
        Ok(Self {
            line,
            up_station,
            down_station,
            distance,
        })
    }

    pub fn line(&self) -> LineId {
        self.line
    }

    pub fn up_station(&self) -> &Station {
        &self.up_station
    }

    pub fn down_station(&self) -> &Station {
        &self.down_station
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Whether this section joins exactly the same pair, in the same direction.
    pub fn has_same_stations(&self, other: &Section) -> bool {
        self.up_station.is_same_as(&other.up_station)
            && self.down_station.is_same_as(&other.down_station)
    }

    /// Shorten the section by `amount`.
    ///
    /// Fails, leaving the section untouched, if the remaining distance would
    /// not be positive.
    pub(crate) fn shorten(&mut self, amount: Distance) -> Result<(), SectionError> {
        self.distance = self.distance.checked_sub(amount).ok_or(
            SectionError::IllegalSection("split distance must be shorter than the section"),
        )?;
        Ok(())
    }

    /// Move the up end. Only the split algorithm calls this, after `shorten`.
    pub(crate) fn set_up_station(&mut self, station: Station) {
        self.up_station = station;
    }

    /// Move the down end. Only the split algorithm calls this, after `shorten`.
    pub(crate) fn set_down_station(&mut self, station: Station) {
        self.down_station = station;
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Section({} -> {}, {})",
            self.up_station.name(),
            self.down_station.name(),
            self.distance
        )
    }
}
