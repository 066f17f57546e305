//! Application services for stations and lines.
//!
//! Services resolve identities through the [`Store`](crate::store::Store),
//! enforce name uniqueness, and hand every topology decision to the domain.

mod error;
mod lines;
mod stations;

pub use error::ServiceError;
pub use lines::{LineService, NewLine, NewSection};
pub use stations::StationService;
