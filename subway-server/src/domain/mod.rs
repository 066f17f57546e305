//! Domain types for subway lines.
//!
//! This module contains the section-chain model: stations, sections, the
//! invariant-preserving [`Sections`] collection and the [`Line`] aggregate.
//! All types enforce their invariants at construction time, so code that
//! receives these types can trust their validity.

mod error;
mod ids;
mod line;
mod section;
mod sections;
mod station;

pub use error::{InvalidName, SectionError};
pub use ids::{LineId, StationId};
pub use line::Line;
pub use section::{Distance, Section};
pub use sections::Sections;
pub use station::Station;

pub(crate) use error::validate_name;
