//! Fusion notation, e.g., `ABL1-BCR fusion`.

use indexmap::IndexSet;
use regex::Regex;

use crate::{
    data::{error::Error, interface::AlterationProvider},
    parser::Alteration,
    static_data::ReferenceGenome,
};

lazy_static::lazy_static! {
    static ref FUSION: Regex = Regex::new(r"^(([A-Za-z0-9_]+)-([A-Za-z0-9_]+))\s+(?i:fusion)$")
        .expect("should not happen; invalid fusion regex");
}

/// Whether the variant is written as `<geneA>-<geneB> fusion`.
pub fn is_fusion(variant: &str) -> bool {
    FUSION.is_match(variant)
}

/// Return the reversed fusion name `<geneB>-<geneA> fusion`.
///
/// `None` if the name is not a fusion.
pub fn revert_fusion_name(fusion_name: &str) -> Option<String> {
    let caps = FUSION.captures(fusion_name)?;
    Some(format!("{}-{} fusion", &caps[3], &caps[2]))
}

/// Find the curated alteration named like the reversed fusion of `alteration`.
///
/// With a `pool`, the first alteration of the same gene whose notation equals
/// the reversed name ignoring case is returned.  Without one, the knowledge
/// base is asked.
pub fn revert_fusion(
    alterations: &dyn AlterationProvider,
    reference_genome: Option<ReferenceGenome>,
    alteration: &Alteration,
    pool: Option<&IndexSet<Alteration>>,
) -> Result<Option<Alteration>, Error> {
    let Some(reverted) = revert_fusion_name(&alteration.alteration) else {
        return Ok(None);
    };
    match pool {
        Some(pool) => Ok(pool
            .iter()
            .find(|candidate| {
                candidate.gene == alteration.gene
                    && candidate.alteration.eq_ignore_ascii_case(&reverted)
            })
            .cloned()),
        None => match &alteration.gene {
            Some(gene) => alterations.find_alteration(
                gene,
                alteration.alteration_type,
                reference_genome,
                &reverted,
            ),
            None => Ok(None),
        },
    }
}
