use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PixError {
    #[error("Missing mandatory field: {0}")]
    MissingField(&'static str),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Validation error on '{field}': {message}")]
    Validation { field: &'static str, message: String },

    // A value that reached the encoder without fitting its length prefix.
    #[error("Encoding overflow in field {id}: length {len} exceeds maximum {max}")]
    EncodingOverflow { id: String, len: usize, max: usize },

    #[error("Malformed payload at offset {offset}: {reason}")]
    Malformed { offset: usize, reason: String },

    #[error("CRC mismatch: expected {expected}, found {found}")]
    Checksum { expected: String, found: String },

    #[error("QR rendering failed: {0}")]
    Render(String),

    #[error("Template error: {0}")]
    Template(String),
}

impl PixError {
    /// True for failures the caller can fix by changing the request.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            PixError::MissingField(_) | PixError::InvalidAmount(_) | PixError::Validation { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PixError>;
