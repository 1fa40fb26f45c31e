use thiserror::Error;

/// Errors reported by the checked constructors of this crate.
/// The thinning loop itself cannot fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThinningError {
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("the foreground value must not be zero")]
    ZeroForeground,
}

pub type Result<T> = std::result::Result<T, ThinningError>;
