//! Free-text attribute normalisation shared by the log entities.

/// Why a text attribute was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("must not be empty")]
    Empty,
    #[error("must be at most {max} characters")]
    TooLong { max: usize },
}

/// Trim a required attribute and enforce its length bound.
pub(crate) fn required(value: &str, max: usize) -> Result<String, TextError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TextError::Empty);
    }
    bounded(trimmed, max)
}

/// Trim an optional attribute; blank values collapse to `None`.
pub(crate) fn optional(value: Option<&str>, max: usize) -> Result<Option<String>, TextError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => bounded(trimmed, max).map(Some),
    }
}

impl TextError {
    /// Stable machine-readable code reported in error details.
    pub fn code(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TooLong { .. } => "too_long",
        }
    }
}

fn bounded(trimmed: &str, max: usize) -> Result<String, TextError> {
    if trimmed.chars().count() > max {
        return Err(TextError::TooLong { max });
    }
    Ok(trimmed.to_owned())
}
