//! Error type definition.

use thiserror::Error;

/// Error type for data.
#[derive(Error, Debug)]
pub enum Error {
    #[error("knowledge base access failed: {0}")]
    DataAccess(String),
    #[error("remote annotation failed: {0}")]
    RemoteAnnotation(String),
    #[error("could not open knowledge base JSON file: {0}")]
    JsonOpen(String),
    #[error("could not parse knowledge base JSON file: {0}")]
    JsonParse(String),
    #[error("no gene found for {0}")]
    NoGeneFound(String),
}
