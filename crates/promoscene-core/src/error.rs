//! Error taxonomy for the composition engine.

use crate::objects::ObjectId;
use thiserror::Error;

/// Engine errors.
///
/// `NotFound` and `ResourceLoad` are recoverable: callers treat them as
/// no-ops or substitute placeholders, and they are reported through the
/// event sink rather than surfaced. `MalformedDocument` and
/// `InvalidConfig` indicate unusable caller input and propagate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("object not found: {0}")]
    NotFound(ObjectId),
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    #[error("resource load failed: {0}")]
    ResourceLoad(String),
    #[error("invalid layout config: {0}")]
    InvalidConfig(String),
}

/// Result type for engine operations.
pub type CoreResult<T> = Result<T, CoreError>;
