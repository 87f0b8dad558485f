/// Convenience result type used across promoclip.
pub type PromoResult<T> = Result<T, PromoError>;

/// Error taxonomy surfaced by the composition and rendering pipeline.
///
/// Every stage fails loudly with one of these kinds; nothing is retried internally.
#[derive(thiserror::Error, Debug)]
pub enum PromoError {
    /// A required input file is missing or unreadable.
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// The input file extension is not in the allowed set.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Duration or dimensions of a source could not be read.
    #[error("corrupt source: {0}")]
    CorruptSource(String),

    /// None of the configured font candidates could be loaded.
    #[error("font unavailable: {0}")]
    FontUnavailable(String),

    /// The encoder (or the decoder feeding it) failed.
    #[error("render error: {0}")]
    Render(String),

    /// Malformed caller-provided values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PromoError {
    /// Build a [`PromoError::SourceNotFound`] value.
    pub fn source_not_found(msg: impl Into<String>) -> Self {
        Self::SourceNotFound(msg.into())
    }

    /// Build a [`PromoError::UnsupportedFormat`] value.
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`PromoError::CorruptSource`] value.
    pub fn corrupt_source(msg: impl Into<String>) -> Self {
        Self::CorruptSource(msg.into())
    }

    /// Build a [`PromoError::FontUnavailable`] value.
    pub fn font_unavailable(msg: impl Into<String>) -> Self {
        Self::FontUnavailable(msg.into())
    }

    /// Build a [`PromoError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PromoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
