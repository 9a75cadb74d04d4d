//! Positional comparison of alterations.

use std::cmp::Ordering;

use indexmap::IndexSet;

use crate::{
    parser::{consequence_related, Alteration, Gene},
    static_data::{ReferenceGenome, VariantConsequence, POSITION_END_BOUNDARY, POSITION_START_BOUNDARY},
};

fn same_gene_and_genome(
    alteration: &Alteration,
    gene: &Gene,
    reference_genome: Option<ReferenceGenome>,
) -> bool {
    alteration.gene.as_ref() == Some(gene)
        && reference_genome
            .map(|genome| alteration.applies_to(genome))
            .unwrap_or(true)
}

/// Alterations of `gene` with a related consequence overlapping `[start, end]`.
///
/// A query without bound position (either end a sentinel) must be contained
/// in the alteration's range; otherwise any overlap counts.  Alterations
/// without consequence or positions never overlap.
pub fn find_overlap_alteration<'a>(
    alterations: impl IntoIterator<Item = &'a Alteration>,
    gene: &Gene,
    reference_genome: Option<ReferenceGenome>,
    consequence: &VariantConsequence,
    start: i32,
    end: i32,
) -> IndexSet<Alteration> {
    let unbound = start <= POSITION_START_BOUNDARY || end >= POSITION_END_BOUNDARY;
    alterations
        .into_iter()
        .filter(|alteration| {
            same_gene_and_genome(alteration, gene, reference_genome)
                && alteration.consequence.is_some()
                && consequence_related(Some(consequence), alteration.consequence.as_ref())
        })
        .filter(|alteration| match (alteration.protein_start, alteration.protein_end) {
            (Some(alt_start), Some(alt_end)) => {
                if unbound {
                    start >= alt_start && end <= alt_end
                } else {
                    end >= alt_start && start <= alt_end
                }
            }
            _ => false,
        })
        .cloned()
        .collect()
}

/// Alterations of `gene` with a related consequence at exactly `[start, end]`
/// whose reference residues agree with `ref_residues` (unknown on either side
/// agrees).
pub fn find_on_same_position<'a>(
    alterations: impl IntoIterator<Item = &'a Alteration>,
    gene: &Gene,
    reference_genome: Option<ReferenceGenome>,
    consequence: &VariantConsequence,
    start: i32,
    end: i32,
    ref_residues: Option<&str>,
) -> Vec<Alteration> {
    alterations
        .into_iter()
        .filter(|alteration| {
            same_gene_and_genome(alteration, gene, reference_genome)
                && alteration.consequence.is_some()
                && consequence_related(Some(consequence), alteration.consequence.as_ref())
                && alteration.protein_start == Some(start)
                && alteration.protein_end == Some(end)
                && match (ref_residues, alteration.ref_residues.as_deref()) {
                    (Some(query), Some(other)) => query == other,
                    _ => true,
                }
        })
        .cloned()
        .collect()
}

/// Sort alterations by their overlap with `[start, end]`.
///
/// Larger overlap first, then narrower span, then notation.  Alterations
/// without positions go last.
pub fn sort_alterations_by_the_range(alterations: &mut [Alteration], start: i32, end: i32) {
    alterations.sort_by(|a, b| {
        match (
            a.protein_start.zip(a.protein_end),
            b.protein_start.zip(b.protein_end),
        ) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some((a_start, a_end)), Some((b_start, b_end))) => {
                let a_overlap = a_end.min(end) - a_start.max(start);
                let b_overlap = b_end.min(end) - b_start.max(start);
                b_overlap
                    .cmp(&a_overlap)
                    .then_with(|| (a_end - a_start).cmp(&(b_end - b_start)))
                    .then_with(|| a.alteration.cmp(&b.alteration))
            }
        }
    });
}
