use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Owner not found with id: {id}")]
    OwnerNotFound { id: i32 },

    #[error("Pet not found with id: {id}")]
    PetNotFound { id: i32 },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn owner_not_found(id: i32) -> Self {
        Self::OwnerNotFound { id }
    }

    pub fn pet_not_found(id: i32) -> Self {
        Self::PetNotFound { id }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
