//! Service error types.

use crate::domain::{InvalidName, LineId, SectionError, StationId};
use crate::store::SnapshotError;

/// Errors returned by the station and line services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("line {0} not found")]
    LineNotFound(LineId),

    #[error("station {0} not found")]
    StationNotFound(StationId),

    #[error("a line named {0:?} already exists")]
    DuplicateLineName(String),

    #[error("a station named {0:?} already exists")]
    DuplicateStationName(String),

    /// The station is an endpoint of a section on some line
    #[error("station {station} is used by line {line}")]
    StationInUse { station: StationId, line: LineId },

    #[error(transparent)]
    Section(#[from] SectionError),

    #[error(transparent)]
    InvalidName(#[from] InvalidName),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl ServiceError {
    /// Whether the error means a referenced identity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ServiceError::LineNotFound(_)
                | ServiceError::StationNotFound(_)
                | ServiceError::Section(SectionError::SectionNotFound)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            ServiceError::LineNotFound(LineId(3)).to_string(),
            "line 3 not found"
        );
        assert_eq!(
            ServiceError::DuplicateStationName("Gangnam".into()).to_string(),
            "a station named \"Gangnam\" already exists"
        );
        assert_eq!(
            ServiceError::StationInUse {
                station: StationId(1),
                line: LineId(2)
            }
            .to_string(),
            "station 1 is used by line 2"
        );
        assert_eq!(
            ServiceError::from(SectionError::DuplicatedSection).to_string(),
            "section already exists on the line"
        );
    }

    #[test]
    fn not_found_kinds() {
        assert!(ServiceError::LineNotFound(LineId(1)).is_not_found());
        assert!(ServiceError::StationNotFound(StationId(1)).is_not_found());
        assert!(ServiceError::Section(SectionError::SectionNotFound).is_not_found());
        assert!(!ServiceError::Section(SectionError::DuplicatedSection).is_not_found());
        assert!(!ServiceError::DuplicateLineName("A".into()).is_not_found());
    }
}
