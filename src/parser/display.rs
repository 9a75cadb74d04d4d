//! Implementation of Display trait.

use std::fmt::Display;

use crate::{
    parser::ds::{Alteration, Gene},
    static_data::{AlterationType, VariantConsequence},
};

impl Display for Gene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hugo_symbol)
    }
}

impl Display for VariantConsequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.term)
    }
}

impl Display for AlterationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AlterationType::Mutation => "MUTATION",
            AlterationType::CopyNumberAlteration => "COPY_NUMBER_ALTERATION",
            AlterationType::StructuralVariant => "STRUCTURAL_VARIANT",
            AlterationType::Fusion => "FUSION",
        };
        write!(f, "{name}")
    }
}

/// Gene symbol and alteration string, e.g., `BRAF V600E`.
impl Display for Alteration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.gene {
            Some(gene) => write!(f, "{} {}", gene, self.alteration),
            None => write!(f, "{}", self.alteration),
        }
    }
}
