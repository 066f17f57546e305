//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Line, Station, StationId};
use crate::service::{NewLine, NewSection};

/// Request to create a station.
#[derive(Debug, Deserialize)]
pub struct StationRequest {
    pub name: String,
}

/// A station in responses.
#[derive(Debug, Serialize)]
pub struct StationResponse {
    pub id: u64,
    pub name: String,
}

impl StationResponse {
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id().0,
            name: station.name().to_string(),
        }
    }
}

/// Request to create a line.
///
/// The first section is optional, but its three fields must be given together.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub name: String,

    #[serde(default)]
    pub color: String,

    pub up_station_id: Option<u64>,

    pub down_station_id: Option<u64>,

    pub distance: Option<i64>,
}

impl LineRequest {
    /// Convert into a service request.
    ///
    /// Returns an error message if the first section is only partly given.
    pub fn into_new_line(self) -> Result<NewLine, &'static str> {
        let section = match (self.up_station_id, self.down_station_id, self.distance) {
            (Some(up), Some(down), Some(distance)) => Some(NewSection {
                up_station: StationId(up),
                down_station: StationId(down),
                distance,
            }),
            (None, None, None) => None,
            _ => return Err("upStationId, downStationId and distance must be given together"),
        };
        Ok(NewLine {
            name: self.name,
            color: self.color,
            section,
        })
    }
}

/// Request to edit a line's name and color.
#[derive(Debug, Deserialize)]
pub struct LineEditRequest {
    pub name: String,

    #[serde(default)]
    pub color: String,
}

/// Request to add a section to a line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRequest {
    pub up_station_id: u64,
    pub down_station_id: u64,
    pub distance: i64,
}

impl From<SectionRequest> for NewSection {
    fn from(req: SectionRequest) -> Self {
        NewSection {
            up_station: StationId(req.up_station_id),
            down_station: StationId(req.down_station_id),
            distance: req.distance,
        }
    }
}

/// A line in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineResponse {
    pub id: u64,

    pub name: String,

    pub color: String,

    /// Stations in up→down order
    pub stations: Vec<StationResponse>,

    /// Sum of all section distances
    pub total_distance: u64,

    /// RFC 3339 creation time
    pub created_date: String,

    /// RFC 3339 time of the last edit or added section
    pub modified_date: String,
}

impl LineResponse {
    pub fn from_line(line: &Line) -> Self {
        Self {
            id: line.id().0,
            name: line.name().to_string(),
            color: line.color().to_string(),
            stations: line
                .stations()
                .iter()
                .map(StationResponse::from_station)
                .collect(),
            total_distance: line.sections().total_distance(),
            created_date: line.created_at().to_rfc3339(),
            modified_date: line.modified_at().to_rfc3339(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
