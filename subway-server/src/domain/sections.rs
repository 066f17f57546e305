//! The section chain of a single line.
//!
//! A line's sections always form one simple directed path: every station is the
//! up end of at most one section and the down end of at most one section, and
//! there are no cycles. [`Sections::add`] is the only way in, and it either
//! moves the chain to a new valid state or leaves it untouched.
//!
//! Sections are indexed by up station and by down station so that terminal
//! lookup and each hop of a walk are O(1).

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use super::error::SectionError;
use super::ids::StationId;
use super::section::Section;
use super::station::Station;

/// The ordered chain of sections belonging to one line.
#[derive(Clone, Default)]
pub struct Sections {
    /// Every section, keyed by its up station.
    by_up: HashMap<StationId, Section>,
    /// Down station → up station of the section that ends there.
    up_of_down: HashMap<StationId, StationId>,
    up_terminal: Option<StationId>,
    down_terminal: Option<StationId>,
}

impl Sections {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_up.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_up.is_empty()
    }

    /// Whether the station is an endpoint of any section in the chain.
    pub fn contains_station(&self, station: StationId) -> bool {
        self.by_up.contains_key(&station) || self.up_of_down.contains_key(&station)
    }

    /// Add a section to the chain.
    ///
    /// The candidate either extends the chain at one of its terminals or is
    /// inserted inside an existing section, which is shortened so that total
    /// distance is conserved. Rejected candidates leave the chain unchanged.
    ///
    /// # Errors
    ///
    /// - [`SectionError::IllegalSection`] if the candidate loops on one station,
    ///   shares no station with a non-empty chain, would join two stations that
    ///   are both already on the chain, or is not strictly shorter than the
    ///   section it splits.
    /// - [`SectionError::DuplicatedSection`] if the exact (up, down) pair exists.
    pub fn add(&mut self, candidate: Section) -> Result<(), SectionError> {
        let up = candidate.up_station().id();
        let down = candidate.down_station().id();

        if up == down {
            return Err(SectionError::IllegalSection(
                "up and down stations are the same",
            ));
        }

        if self.is_empty() {
            debug!(?candidate, "first section of the line");
            self.up_terminal = Some(up);
            self.down_terminal = Some(down);
            self.insert(candidate);
            return Ok(());
        }

        let has_up = self.contains_station(up);
        let has_down = self.contains_station(down);
        if !has_up && !has_down {
            return Err(SectionError::IllegalSection(
                "neither station is on the line",
            ));
        }
        if self
            .by_up
            .get(&up)
            .is_some_and(|existing| existing.has_same_stations(&candidate))
        {
            return Err(SectionError::DuplicatedSection);
        }
        if has_up && has_down {
            return Err(SectionError::IllegalSection(
                "both stations are already on the line",
            ));
        }

        if self.up_terminal == Some(down) {
            debug!(?candidate, "extending up terminal");
            self.up_terminal = Some(up);
            self.insert(candidate);
            return Ok(());
        }
        if self.down_terminal == Some(up) {
            debug!(?candidate, "extending down terminal");
            self.down_terminal = Some(down);
            self.insert(candidate);
            return Ok(());
        }

        if has_up {
            return self.split_below(candidate);
        }
        self.split_above(candidate)
    }

    /// Insert `candidate` (U→D) into the section U→X, which becomes D→X.
    fn split_below(&mut self, candidate: Section) -> Result<(), SectionError> {
        let up = candidate.up_station().id();
        let down = candidate.down_station().id();

        let Some(mut existing) = self.by_up.remove(&up) else {
            return Err(SectionError::InconsistentChain(
                "interior station has no outgoing section",
            ));
        };
        if let Err(e) = existing.shorten(candidate.distance()) {
            self.by_up.insert(up, existing);
            return Err(e);
        }

        debug!(?candidate, ?existing, "splitting section from its up station");
        let far = existing.down_station().id();
        existing.set_up_station(candidate.down_station().clone());
        self.up_of_down.insert(far, down);
        self.by_up.insert(down, existing);
        self.insert(candidate);
        Ok(())
    }

    /// Insert `candidate` (U→D) into the section Y→D, which becomes Y→U.
    fn split_above(&mut self, candidate: Section) -> Result<(), SectionError> {
        let up = candidate.up_station().id();
        let down = candidate.down_station().id();

        let Some(&near) = self.up_of_down.get(&down) else {
            return Err(SectionError::InconsistentChain(
                "candidate shares no endpoint with the chain",
            ));
        };
        let Some(mut existing) = self.by_up.remove(&near) else {
            return Err(SectionError::InconsistentChain(
                "down index points at a missing section",
            ));
        };
        if let Err(e) = existing.shorten(candidate.distance()) {
            self.by_up.insert(near, existing);
            return Err(e);
        }

        debug!(?candidate, ?existing, "splitting section from its down station");
        existing.set_down_station(candidate.up_station().clone());
        self.up_of_down.insert(up, near);
        self.by_up.insert(near, existing);
        self.insert(candidate);
        Ok(())
    }

    fn insert(&mut self, section: Section) {
        let up = section.up_station().id();
        let down = section.down_station().id();
        self.up_of_down.insert(down, up);
        self.by_up.insert(up, section);
    }

    /// The section starting at the line's first station.
    pub fn up_terminal_section(&self) -> Result<&Section, SectionError> {
        let station = self.up_terminal.ok_or(SectionError::SectionNotFound)?;
        self.by_up
            .get(&station)
            .ok_or(SectionError::InconsistentChain("up terminal has no section"))
    }

    /// The section ending at the line's last station.
    pub fn down_terminal_section(&self) -> Result<&Section, SectionError> {
        let station = self.down_terminal.ok_or(SectionError::SectionNotFound)?;
        self.up_of_down
            .get(&station)
            .and_then(|up| self.by_up.get(up))
            .ok_or(SectionError::InconsistentChain(
                "down terminal has no section",
            ))
    }

    /// Stations from `section`'s up station down to the line's down terminal.
    ///
    /// `section` is expected to belong to this chain. The result is computed
    /// fresh on every call.
    pub fn all_stations_sorted_from(&self, section: &Section) -> Vec<Station> {
        let mut stations = vec![section.up_station().clone()];
        let mut current = section.down_station();
        // Bounded by the chain length; a walk can never revisit a station.
        for _ in 0..=self.by_up.len() {
            stations.push(current.clone());
            match self.by_up.get(&current.id()) {
                Some(next) => current = next.down_station(),
                None => break,
            }
        }
        stations
    }

    /// All stations of the line in up→down order. Empty for an empty chain.
    pub fn stations(&self) -> Vec<Station> {
        match self.up_terminal_section() {
            Ok(first) => self.all_stations_sorted_from(first),
            Err(_) => Vec::new(),
        }
    }

    /// Sections in up→down order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> + '_ {
        let first = self.up_terminal.and_then(|id| self.by_up.get(&id));
        std::iter::successors(first, move |s| self.by_up.get(&s.down_station().id()))
    }

    /// Sum of all section distances.
    pub fn total_distance(&self) -> u64 {
        self.by_up
            .values()
            .map(|s| u64::from(s.distance().get()))
            .sum()
    }
}

impl fmt::Debug for Sections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
