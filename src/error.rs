use thiserror::Error;

#[derive(Error, Debug)]
/// Batch error
pub enum BatchError {
    /// The markup writer of a document could not be opened.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// A record is predicted to overshoot an otherwise empty document.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The item mapper failed while emitting a record.
    #[error("Mapping error: {0}")]
    Mapping(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("ItemWriter from: {0}")]
    ItemWriter(String),

    #[error("ItemReader from: {0}")]
    ItemReader(String),
}
