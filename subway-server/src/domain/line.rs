//! Line aggregate root.

use chrono::{DateTime, Utc};

use super::error::{InvalidName, SectionError, validate_name};
use super::ids::LineId;
use super::section::Section;
use super::sections::Sections;
use super::station::Station;

/// A named, colored route made of a chain of sections.
///
/// The line owns its [`Sections`] exclusively; every topology change goes
/// through [`Line::add_section`].
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    name: String,
    color: String,
    sections: Sections,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl Line {
    /// Create a line with no sections.
    pub fn new(id: LineId, name: &str, color: &str) -> Result<Self, InvalidName> {
        let now = Utc::now();
        Ok(Self {
            id,
            name: validate_name(name)?,
            color: color.trim().to_string(),
            sections: Sections::new(),
            created_at: now,
            modified_at: now,
        })
    }

    /// Replace the creation and modification times, e.g. when loading a snapshot.
    pub(crate) fn with_timestamps(
        mut self,
        created_at: DateTime<Utc>,
        modified_at: DateTime<Utc>,
    ) -> Self {
        self.created_at = created_at;
        self.modified_at = modified_at;
        self
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Replace name and color.
    pub fn edit(&mut self, name: &str, color: &str) -> Result<(), InvalidName> {
        self.name = validate_name(name)?;
        self.color = color.trim().to_string();
        self.touch();
        Ok(())
    }

    /// Add a section to this line's chain.
    ///
    /// A section scoped to a different line is rejected as illegal.
    pub fn add_section(&mut self, section: Section) -> Result<(), SectionError> {
        if section.line() != self.id {
            return Err(SectionError::IllegalSection(
                "section belongs to another line",
            ));
        }
        self.sections.add(section)?;
        self.touch();
        Ok(())
    }

    /// Stations in up→down order. Empty if the line has no sections.
    pub fn stations(&self) -> Vec<Station> {
        self.sections.stations()
    }

    fn touch(&mut self) {
        self.modified_at = Utc::now().max(self.created_at);
    }
}
