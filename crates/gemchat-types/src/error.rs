use thiserror::Error;

/// Errors from repository operations (used by trait definitions in gemchat-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),
}

/// Failures of an image upload. `Io` is a server-side write failure; the
/// other variants reject the client's file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("no file in field 'image'")]
    MissingFile,

    #[error("empty file name")]
    EmptyFilename,

    #[error("unsupported image format: '{0}'")]
    UnsupportedExtension(String),

    #[error("failed to store upload: {0}")]
    Io(String),
}

/// Errors while allocating a new chat session.
#[derive(Debug, Error)]
pub enum NamingError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to create session placeholder: {0}")]
    Io(#[from] std::io::Error),
}
