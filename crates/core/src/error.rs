#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    InvalidId(#[from] catalog_id::IdError),
    #[error("{entity} validation failed: {source}")]
    InvalidDocument {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read document store: {0}")]
    StoreRead(std::io::Error),
    #[error("failed to write document: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read document: {0}")]
    FileRead(std::io::Error),
    #[error("failed to delete document: {0}")]
    FileDelete(std::io::Error),
    #[error("failed to serialize document: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize document: {0}")]
    Deserialization(serde_json::Error),
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
