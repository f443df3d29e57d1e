use med_types::TypesError;
use std::path::PathBuf;

/// Failures of the on-disk document.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("data file does not exist: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read data file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write data file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to deserialize data file: {0}")]
    Deserialization(serde_json::Error),
    #[error("failed to serialize document: {0}")]
    Serialization(serde_json::Error),
    #[error("malformed data file: {0}")]
    InvalidShape(String),
}

#[derive(Debug, thiserror::Error)]
pub enum MedicineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Medicine name cannot be empty.")]
    EmptyName,
    #[error("New medicine name cannot be empty.")]
    EmptyNewName,
    #[error("Price must be a positive number greater than 0.")]
    InvalidPrice,
    #[error("A medicine with this name already exists.")]
    DuplicateName,
    #[error("Nothing to update.")]
    NothingToUpdate,
    #[error("Medicine not found")]
    NotFound,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Coarse classification used by API layers to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
}

impl MedicineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MedicineError::EmptyName
            | MedicineError::EmptyNewName
            | MedicineError::InvalidPrice
            | MedicineError::DuplicateName
            | MedicineError::NothingToUpdate => ErrorKind::Validation,
            MedicineError::NotFound => ErrorKind::NotFound,
            MedicineError::InvalidConfig(_) | MedicineError::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<TypesError> for MedicineError {
    fn from(err: TypesError) -> Self {
        match err {
            TypesError::EmptyName => MedicineError::EmptyName,
            TypesError::InvalidPrice => MedicineError::InvalidPrice,
        }
    }
}

pub type MedicineResult<T> = std::result::Result<T, MedicineError>;
