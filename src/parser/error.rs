//! Error type definition.

use thiserror::Error;

/// Error type for parsing of enumerated names.
///
/// Unparseable variant notation is not an error; it is classified as `NA`.
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown reference genome name.
    #[error("{0} is not a valid reference genome")]
    InvalidReferenceGenome(String),
    /// Unknown alteration type name.
    #[error("{0} is not a valid alteration type")]
    InvalidAlterationType(String),
}
