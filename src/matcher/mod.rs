//! Resolution of the curated alterations relevant to a query alteration.

pub mod allele;
pub mod filter;
pub mod fusion;
pub mod overlap;
mod relevance;

use serde::{Deserialize, Serialize};

use crate::static_data::{ReferenceGenome, DEFAULT_REFERENCE_GENOME};

pub use crate::matcher::error::Error;
pub use crate::matcher::relevance::Resolver;

/// Configuration for the `Resolver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Genome of queries that do not name one.
    pub default_reference_genome: ReferenceGenome,
    /// Whether the knowledge base should fall back to inferred alterations,
    /// e.g., "Oncogenic Mutations".
    pub include_inferred: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_reference_genome: DEFAULT_REFERENCE_GENOME,
            include_inferred: true,
        }
    }
}

pub mod error {
    //! Error type definition.

    use thiserror::Error;

    /// Error type for relevance resolution.
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("parsing failed")]
        ParsingFailed(#[from] crate::parser::Error),
        #[error("problem accessing data")]
        DataError(#[from] crate::data::error::Error),
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::Config;
    use crate::static_data::ReferenceGenome;

    #[test]
    fn config_from_json() -> Result<(), anyhow::Error> {
        let config: Config = serde_json::from_str(r#"{"default_reference_genome": "GRCh38"}"#)?;
        assert_eq!(
            config,
            Config {
                default_reference_genome: ReferenceGenome::Grch38,
                include_inferred: true,
            }
        );
        assert_eq!(serde_json::from_str::<Config>("{}")?, Config::default());

        Ok(())
    }
}
