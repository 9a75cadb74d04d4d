//! Utility code for working with protein sequences.

use crate::{
    data::interface::SequenceProvider,
    parser::Gene,
    static_data::ReferenceGenome,
};

pub use crate::sequences::error::Error;

mod error {
    /// Error type for protein sequence handling.
    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("invalid 1-letter aminoacid: {0} at {1}")]
        InvalidOneLetterAminoAcid(char, usize),
        #[error("problem accessing protein sequence")]
        DataAccess(#[from] crate::data::error::Error),
    }
}

/// One-letter amino acid codes, including `*` for termination.
pub static AA1: &str = "ACDEFGHIKLMNPQRSTVWYXU*";

/// Normalize a protein sequence to upper case without whitespace.
///
/// Fails on characters that are not 1-letter amino acid codes.
pub fn normalize_sequence(seq: &str) -> Result<String, Error> {
    let mut result = String::with_capacity(seq.len());

    for (i, c) in seq.chars().filter(|c| !c.is_whitespace()).enumerate() {
        let c = c.to_ascii_uppercase();
        if AA1.contains(c) {
            result.push(c);
        } else {
            return Err(Error::InvalidOneLetterAminoAcid(c, i + 1));
        }
    }

    Ok(result)
}

/// Return `length` residues starting at the 1-based position `start`.
///
/// Returns an empty string if the range is not fully contained in the sequence.
pub fn amino_acids(sequence: &str, start: i32, length: i32) -> String {
    if start < 1 || length < 0 {
        return String::new();
    }
    let begin = (start - 1) as usize;
    let end = begin + length as usize;
    sequence
        .get(begin..end)
        .map(|residues| residues.to_string())
        .unwrap_or_default()
}

/// Return `length` residues of the gene's canonical protein starting at `start`.
///
/// An unknown sequence yields an empty string.
pub fn protein_amino_acids(
    provider: &dyn SequenceProvider,
    reference_genome: ReferenceGenome,
    gene: &Gene,
    start: i32,
    length: i32,
) -> Result<String, Error> {
    let Some(sequence) = provider.protein_sequence(reference_genome, gene)? else {
        log::debug!("no {} protein sequence for {}", reference_genome, gene);
        return Ok(String::new());
    };
    Ok(amino_acids(&normalize_sequence(&sequence)?, start, length))
}
