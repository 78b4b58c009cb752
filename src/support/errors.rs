use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found ({field}={value})")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// The table device could not be reached
    #[error("Device error: {0}")]
    Device(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: value.into(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        let message = e.to_string();
        if message.contains("UNIQUE") || message.contains("duplicate") {
            Self::Conflict(message)
        } else if message.contains("FOREIGN KEY") {
            Self::Conflict("Record is referenced by other records".to_string())
        } else {
            Self::Storage(message)
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
