/// Convenience result type used across Showreel.
pub type ShowreelResult<T> = Result<T, ShowreelError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ShowreelError {
    /// A source image could not be read or decoded.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// Invalid scene parameters or a violated lifecycle ordering.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No candidate output format is usable. Negotiation treats this as a
    /// fallback trigger, not a failure.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The encoder failed while recording was in progress.
    #[error("recorder error: {0}")]
    Recorder(String),

    /// Chunk assembly failed after the encoder was stopped.
    #[error("encoding finalize error: {0}")]
    EncodingFinalize(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShowreelError {
    /// Build a [`ShowreelError::ImageLoad`] value.
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Build a [`ShowreelError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`ShowreelError::UnsupportedFormat`] value.
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`ShowreelError::Recorder`] value.
    pub fn recorder(msg: impl Into<String>) -> Self {
        Self::Recorder(msg.into())
    }

    /// Build a [`ShowreelError::EncodingFinalize`] value.
    pub fn encoding_finalize(msg: impl Into<String>) -> Self {
        Self::EncodingFinalize(msg.into())
    }

    /// Classify this error for status reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ImageLoad(_) => ErrorKind::ImageLoad,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Self::Recorder(_) => ErrorKind::Recorder,
            Self::EncodingFinalize(_) => ErrorKind::EncodingFinalize,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

/// Payload-free projection of [`ShowreelError`], carried by terminal render
/// statuses so callers can branch on failure class without holding the error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ShowreelError::ImageLoad`].
    ImageLoad,
    /// See [`ShowreelError::Configuration`].
    Configuration,
    /// See [`ShowreelError::UnsupportedFormat`].
    UnsupportedFormat,
    /// See [`ShowreelError::Recorder`].
    Recorder,
    /// See [`ShowreelError::EncodingFinalize`].
    EncodingFinalize,
    /// See [`ShowreelError::Other`].
    Other,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
