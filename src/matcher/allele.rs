//! Alternative alleles and positional variants of missense alterations.

use indexmap::IndexSet;
use regex::Regex;

use crate::{
    data::{error::Error, interface::AlterationProvider},
    parser::Alteration,
    static_data::{
        AlterationType, ReferenceGenome, VariantConsequence, ABL1_EXCLUDED_ALTERATION,
        ABL1_HUGO_SYMBOL, MISSENSE_VARIANT, NA, PDGFRA_ENTREZ_GENE_ID, PDGFRA_EXCLUDED_ALLELE,
        POSITION_END_BOUNDARY, POSITION_START_BOUNDARY,
    },
    utils::char_at,
};

lazy_static::lazy_static! {
    static ref DELINS_RESIDUES: Regex =
        Regex::new(r"delins(\w+)").expect("should not happen; invalid delins regex");
    static ref DELINS_QUERY: Regex =
        Regex::new(r"^.*delins([A-Z]+)$").expect("should not happen; invalid delins regex");
}

/// ABL1 T315I inherits from neither alleles nor positional variants.
pub(crate) fn is_abl1_t315i(alteration: &Alteration) -> bool {
    alteration.hugo_symbol() == Some(ABL1_HUGO_SYMBOL)
        && alteration.alteration == ABL1_EXCLUDED_ALTERATION
}

fn is_unbound(position: i32) -> bool {
    position == POSITION_START_BOUNDARY || position == POSITION_END_BOUNDARY
}

/// Other curated missense alleles at the position of a single-residue
/// missense `alteration`, sorted by notation.
///
/// The query is recognized by notation, so its curated entry is excluded
/// even if it covers other reference genomes.  Alleles with a different
/// reference residue are skipped unless either side does not know its
/// reference residue.  In PDGFRA, D842V is never the alternative allele of
/// another D842 allele.
pub fn allele_alterations(
    alterations: &dyn AlterationProvider,
    reference_genome: Option<ReferenceGenome>,
    alteration: &Alteration,
    pool: &IndexSet<Alteration>,
) -> Result<Vec<Alteration>, Error> {
    if !alteration.has_consequence(MISSENSE_VARIANT) || is_abl1_t315i(alteration) {
        return Ok(Vec::new());
    }
    let (Some(gene), Some(start), Some(end)) =
        (&alteration.gene, alteration.protein_start, alteration.protein_end)
    else {
        return Ok(Vec::new());
    };

    let missense = VariantConsequence::find_or_adhoc(MISSENSE_VARIANT);
    let mut alleles = alterations
        .find_mutations_by_consequence_and_position(gene, reference_genome, &missense, start, end, pool)?
        .into_iter()
        .filter(|allele| {
            allele.is_single_position()
                && !allele.alteration.eq_ignore_ascii_case(&alteration.alteration)
                && match (&alteration.ref_residues, &allele.ref_residues) {
                    (Some(query), Some(other)) => query == other,
                    _ => true,
                }
        })
        .collect::<Vec<_>>();

    if gene.entrez_gene_id == PDGFRA_ENTREZ_GENE_ID
        && alteration.alteration != PDGFRA_EXCLUDED_ALLELE
    {
        alleles.retain(|allele| allele.alteration != PDGFRA_EXCLUDED_ALLELE);
    }

    alleles.sort_by(|a, b| a.alteration.cmp(&b.alteration));
    log::trace!("{} alternative alleles of {}", alleles.len(), alteration);
    Ok(alleles)
}

/// Curated positional variants (e.g., `V600`) at the position of a missense
/// `alteration` with a compatible reference residue.
pub fn positioned_alterations(
    alterations: &dyn AlterationProvider,
    reference_genome: Option<ReferenceGenome>,
    alteration: &Alteration,
    pool: &IndexSet<Alteration>,
) -> Result<Vec<Alteration>, Error> {
    if is_abl1_t315i(alteration) || !alteration.has_consequence(MISSENSE_VARIANT) {
        return Ok(Vec::new());
    }
    match (&alteration.gene, alteration.protein_start, alteration.protein_end) {
        (Some(gene), Some(start), Some(end)) if !is_unbound(start) => alterations
            .find_mutations_by_consequence_and_position_on_same_position(
                gene,
                reference_genome,
                &VariantConsequence::adhoc(NA),
                start,
                end,
                alteration.ref_residues.as_deref(),
                pool,
            ),
        _ => Ok(Vec::new()),
    }
}

/// Variant residue of `alteration` at `position`.
///
/// For delins notation the inserted residue at the offset of `position`,
/// otherwise the first variant residue.
fn missense_variant_allele(alteration: &Alteration, position: i32) -> Option<String> {
    if let Some(caps) = DELINS_RESIDUES.captures(&alteration.alteration) {
        let index = position - alteration.protein_start?;
        if index < 0 {
            return None;
        }
        return char_at(&caps[1], index as usize);
    }
    alteration
        .variant_residues
        .as_deref()
        .and_then(|residues| char_at(residues, 0))
}

fn same_residue(residue: &str, other: Option<&str>) -> bool {
    other
        .map(|other| residue.eq_ignore_ascii_case(other))
        .unwrap_or(false)
}

/// Remove alternative alleles from `relevant` whose variant residue disagrees
/// with the missense `alteration`.
///
/// A multi-residue query (e.g., `S768_V769delinsIL`) keeps an allele if the
/// residue at any of its positions agrees, so `S768I` stays relevant.  A
/// positional query without variant residue drops all alleles.
pub fn remove_alternative_allele(
    alterations: &dyn AlterationProvider,
    reference_genome: Option<ReferenceGenome>,
    alteration: &Alteration,
    relevant: &mut IndexSet<Alteration>,
) -> Result<(), Error> {
    let Some(consequence) = alteration
        .consequence
        .as_ref()
        .filter(|c| c.term == MISSENSE_VARIANT)
    else {
        return Ok(());
    };
    let (Some(gene), Some(start), Some(end)) =
        (&alteration.gene, alteration.protein_start, alteration.protein_end)
    else {
        return Ok(());
    };

    let variant_residues = alteration
        .variant_residues
        .as_deref()
        .filter(|residues| !residues.is_empty());
    let is_positional = variant_residues.is_none() && start == end;

    let candidates = alterations.find_mutations_by_consequence_and_position(
        gene,
        reference_genome,
        consequence,
        start,
        end,
        relevant,
    )?;
    for allele in candidates {
        let allele_has_variant = allele
            .variant_residues
            .as_deref()
            .map(|residues| !residues.is_empty())
            .unwrap_or(false);
        if is_positional && allele_has_variant {
            relevant.shift_remove(&allele);
            continue;
        }
        if !allele.has_consequence(MISSENSE_VARIANT) {
            continue;
        }

        let keep = match variant_residues {
            Some(residues) if start == end => {
                if allele.is_single_position() {
                    same_residue(residues, allele.variant_residues.as_deref())
                } else {
                    missense_variant_allele(&allele, start)
                        .map(|other| residues.eq_ignore_ascii_case(&other))
                        .unwrap_or(true)
                }
            }
            _ => (start..=end).any(|position| {
                let Some(residue) = missense_variant_allele(alteration, position) else {
                    return false;
                };
                if allele.is_single_position() {
                    same_residue(&residue, allele.variant_residues.as_deref())
                } else {
                    missense_variant_allele(&allele, position)
                        .map(|other| residue.eq_ignore_ascii_case(&other))
                        .unwrap_or(true)
                }
            }),
        };
        if !keep {
            log::trace!("{} is not an allele of {}", allele, alteration);
            relevant.shift_remove(&allele);
        }
    }
    Ok(())
}

/// Curated alterations considered the same as the annotated `alteration`.
///
/// The exact match, and for multi-residue missense delins (e.g.,
/// `D842_I843delinsIM`) every single-residue missense variant in `pool`
/// carrying the inserted residue at its position.
pub fn find_matched_alterations(
    alterations: &dyn AlterationProvider,
    reference_genome: Option<ReferenceGenome>,
    alteration: &Alteration,
    pool: &IndexSet<Alteration>,
) -> Result<IndexSet<Alteration>, Error> {
    let mut matches = IndexSet::new();
    let Some(gene) = &alteration.gene else {
        return Ok(matches);
    };
    if let Some(matched) = alterations.find_alteration(
        gene,
        Some(AlterationType::Mutation),
        reference_genome,
        &alteration.alteration,
    )? {
        matches.insert(matched);
    }

    let (Some(consequence), Some(start), Some(end)) = (
        alteration.consequence.as_ref(),
        alteration.protein_start,
        alteration.protein_end,
    ) else {
        return Ok(matches);
    };
    if consequence.term != MISSENSE_VARIANT || is_unbound(start) || is_unbound(end) || start == end
    {
        return Ok(matches);
    }
    let Some(caps) = DELINS_QUERY.captures(&alteration.alteration) else {
        return Ok(matches);
    };

    for (offset, residue) in caps[1].chars().enumerate() {
        let Some(position) = i32::try_from(offset).ok().and_then(|o| start.checked_add(o)) else {
            break;
        };
        let candidates = alterations.find_mutations_by_consequence_and_position(
            gene,
            reference_genome,
            consequence,
            position,
            position,
            pool,
        )?;
        matches.extend(candidates.into_iter().filter(|candidate| {
            reference_genome
                .map(|genome| candidate.applies_to(genome))
                .unwrap_or(true)
                && candidate
                    .variant_residues
                    .as_deref()
                    .and_then(|residues| residues.chars().next())
                    == Some(residue)
        }));
    }
    Ok(matches)
}
