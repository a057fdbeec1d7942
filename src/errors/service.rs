use thiserror::Error;

use super::StoreError;

/// Errors produced while shortening or resolving links
#[derive(Debug, Error)]
pub enum ShortenError {
    /// Bad or missing URL, malformed request shape
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requested alias is outside the allowed charset or reserved
    #[error("Invalid alias: {0}")]
    InvalidAlias(String),

    /// Requested alias is already allocated
    #[error("Alias '{0}' is already taken")]
    AliasTaken(String),

    /// Every random candidate collided
    #[error("Could not allocate a unique short id after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ShortenError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => Self::NotFound(msg),
            StoreError::InvalidData(msg) => Self::Validation(msg),
            other => Self::Store(other),
        }
    }
}

impl From<validator::ValidationErrors> for ShortenError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Flatten field errors into a single string
        let mut fields = errors.field_errors().into_iter().collect::<Vec<_>>();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .iter()
            .map(|(field, errs)| {
                let reasons = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .clone()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: {}", field, reasons)
            })
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation(message)
    }
}
