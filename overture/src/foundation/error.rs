/// Convenience result type used across Overture.
pub type OvertureResult<T> = Result<T, OvertureError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum OvertureError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while streaming frames into a sink.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OvertureError {
    /// Build a [`OvertureError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`OvertureError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`OvertureError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`OvertureError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
