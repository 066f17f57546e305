//! Domain error types.
//!
//! These errors are rejections of a requested chain mutation or query.
//! None of them is transient; retrying the same request fails the same way.

/// Errors raised by the section chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    /// Self-looping, disconnected, or oversized split
    #[error("illegal section: {0}")]
    IllegalSection(&'static str),

    /// The exact (up, down) pair is already on the line
    #[error("section already exists on the line")]
    DuplicatedSection,

    /// A terminal or traversal query ran against an empty chain
    #[error("no section found")]
    SectionNotFound,

    /// The chain indexes disagree with each other
    #[error("section chain is inconsistent: {0}")]
    InconsistentChain(&'static str),
}

/// Error returned when a station or line name is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid name: {reason}")]
pub struct InvalidName {
    pub(crate) reason: &'static str,
}

/// Validate and normalise a display name.
///
/// Surrounding whitespace is trimmed; a name that is empty afterwards is rejected.
pub(crate) fn validate_name(name: &str) -> Result<String, InvalidName> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(InvalidName {
            reason: "must not be empty",
        });
    }
    Ok(trimmed.to_string())
}
