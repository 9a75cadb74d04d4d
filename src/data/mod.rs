//! Access to curated knowledge and the other collaborators.

pub mod cache;
pub mod error;
pub mod interface;
pub mod memory;

pub use crate::data::error::Error;
