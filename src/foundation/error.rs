/// Convenience result type used across propdrive.
pub type PropdriveResult<T> = Result<T, PropdriveError>;

/// Top-level error taxonomy used by binding APIs.
#[derive(thiserror::Error, Debug)]
pub enum PropdriveError {
    /// A configured property path does not resolve against the target store.
    #[error("member not found: {0}")]
    MemberNotFound(String),

    /// An incoming value shape is incompatible with the target member's shape.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The target member's type has no codec rule.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Invalid user-provided configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PropdriveError {
    /// Build a [`PropdriveError::MemberNotFound`] value.
    pub fn member_not_found(msg: impl Into<String>) -> Self {
        Self::MemberNotFound(msg.into())
    }

    /// Build a [`PropdriveError::ShapeMismatch`] value.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Build a [`PropdriveError::UnsupportedType`] value.
    pub fn unsupported_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedType(msg.into())
    }

    /// Build a [`PropdriveError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
