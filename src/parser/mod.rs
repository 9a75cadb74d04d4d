//! Parsing and annotation of alteration notation.

mod classify;
mod display;
mod ds;
mod error;
mod query;
mod tokenize;

pub use crate::parser::classify::{
    annotate_alteration, annotated, classify, clean_protein_change, consequence_related,
    Classification,
};
pub use crate::parser::ds::*;
pub use crate::parser::error::Error;
pub use crate::parser::query::{
    alteration_from_genomic_query, build_alteration, trim_alteration_name, AlterationQuery,
};
pub use crate::parser::tokenize::{display_name, parse_mutation_string, reference_genome_tag};
