//! Classification of alteration names and filtering of alteration lists.

use indexmap::IndexSet;
use regex::Regex;

use crate::{
    data::{
        error::Error,
        interface::{AlterationCache, Evidence, EvidenceProvider, EvidenceType},
    },
    parser::{Alteration, Gene},
    static_data::{INFERRED_MUTATIONS, SPECIAL_VARIANTS, STRUCTURAL_ALTERATIONS},
    utils::{contains_ignore_case, ends_with_ignore_case},
};

lazy_static::lazy_static! {
    static ref LIKELY: Regex = Regex::new(r"(?i)likely").expect("should not happen; invalid regex");
    static ref MUTATIONS_SUFFIX: Regex =
        Regex::new(r"(?i)\s+mutations").expect("should not happen; invalid regex");
}

/// Inferred mutations, structural alterations and special variants.
pub fn general_variants() -> impl Iterator<Item = &'static str> {
    INFERRED_MUTATIONS
        .iter()
        .chain(STRUCTURAL_ALTERATIONS)
        .chain(SPECIAL_VARIANTS)
        .copied()
}

pub fn is_positioned_alteration(alteration: &Alteration) -> bool {
    alteration.is_positioned()
}

/// Whether the name is an inferred mutation, e.g., "Oncogenic Mutations".
pub fn is_inferred_alteration(alteration: &str) -> bool {
    INFERRED_MUTATIONS
        .iter()
        .any(|inferred| inferred.eq_ignore_ascii_case(alteration))
}

/// Whether the name is a "likely" inferred mutation, e.g., "Likely Oncogenic Mutations".
pub fn is_likely_inferred_alteration(alteration: &str) -> bool {
    if !alteration.trim().to_lowercase().starts_with("likely") {
        return false;
    }
    is_inferred_alteration(LIKELY.replace_all(alteration, "").trim())
}

/// Known effect named by an inferred mutation, e.g., "Oncogenic" for
/// "Oncogenic Mutations".
pub fn inferred_alteration_known_effect(inferred: &str) -> String {
    MUTATIONS_SUFFIX.replace_all(inferred, "").into_owned()
}

/// Whether the variant is one of the general variants, ignoring case.
pub fn is_general_alteration(variant: &str) -> bool {
    general_variants().any(|general| general.eq_ignore_ascii_case(variant))
}

/// Like [`is_general_alteration`]; if not `exact`, the variant only has to
/// contain a general variant and end with one, e.g., "Oncogenic Mutations
/// {excluding V600}" does not qualify but "Likely Oncogenic Mutations" does.
pub fn is_general_alteration_with(variant: &str, exact: bool) -> bool {
    if exact {
        is_general_alteration(variant)
    } else {
        general_variants().any(|general| contains_ignore_case(variant, general))
            && general_variants().any(|general| ends_with_ignore_case(variant, general))
    }
}

/// Drop the alterations curated as VUS of their gene.
pub fn exclude_vus(
    cache: &dyn AlterationCache,
    alterations: &[Alteration],
) -> Result<Vec<Alteration>, Error> {
    let mut result = Vec::with_capacity(alterations.len());
    for alteration in alterations {
        let is_vus = match &alteration.gene {
            Some(gene) => cache.get_vus(gene.entrez_gene_id)?.contains(alteration),
            None => false,
        };
        if !is_vus {
            result.push(alteration.clone());
        }
    }
    Ok(result)
}

/// Drop the alterations curated as VUS of `gene`.
pub fn exclude_vus_of_gene(
    cache: &dyn AlterationCache,
    gene: &Gene,
    alterations: &[Alteration],
) -> Result<Vec<Alteration>, Error> {
    let vus = cache.get_vus(gene.entrez_gene_id)?;
    Ok(alterations
        .iter()
        .filter(|alteration| !vus.contains(*alteration))
        .cloned()
        .collect())
}

pub fn exclude_inferred_alterations(alterations: &[Alteration]) -> Vec<Alteration> {
    alterations
        .iter()
        .filter(|alteration| !is_inferred_alteration(&alteration.alteration))
        .cloned()
        .collect()
}

pub fn exclude_positioned_alterations(alterations: &[Alteration]) -> Vec<Alteration> {
    alterations
        .iter()
        .filter(|alteration| !alteration.is_positioned())
        .cloned()
        .collect()
}

/// Deduplicate, keeping the first occurrence.
pub fn unique_alterations(alterations: &[Alteration]) -> Vec<Alteration> {
    alterations
        .iter()
        .cloned()
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

pub fn remove_alterations_from_list(
    alterations: &[Alteration],
    to_remove: &[Alteration],
) -> Vec<Alteration> {
    alterations
        .iter()
        .filter(|alteration| !to_remove.contains(*alteration))
        .cloned()
        .collect()
}

/// Alterations whose notation or name contains `query`, ignoring case.
pub fn lookup_variant<'a>(
    query: &str,
    alterations: impl IntoIterator<Item = &'a Alteration>,
) -> Vec<Alteration> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    alterations
        .into_iter()
        .filter(|alteration| {
            contains_ignore_case(&alteration.alteration, query)
                || contains_ignore_case(&alteration.name, query)
        })
        .cloned()
        .collect()
}

/// Join the notations with `", "`.
pub fn alterations_to_string<'a>(alterations: impl IntoIterator<Item = &'a Alteration>) -> String {
    alterations
        .into_iter()
        .map(|alteration| alteration.alteration.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Alterations supported by VUS evidences.
pub fn find_vus_from_evidences(evidences: &[Evidence]) -> IndexSet<Alteration> {
    evidences
        .iter()
        .filter(|evidence| evidence.evidence_type == EvidenceType::Vus)
        .flat_map(|evidence| evidence.alterations.iter().cloned())
        .collect()
}

/// Alterations supported by any of the evidences.
pub fn evidences_alterations(evidences: &[Evidence]) -> IndexSet<Alteration> {
    evidences
        .iter()
        .flat_map(|evidence| evidence.alterations.iter().cloned())
        .collect()
}

/// Alterations of `gene` with evidence of the given known effect, ignoring
/// case.  With `include_likely`, "Likely <effect>" evidences count as well.
pub fn alterations_by_known_effect(
    evidences: &dyn EvidenceProvider,
    gene: &Gene,
    known_effect: &str,
    include_likely: bool,
) -> Result<IndexSet<Alteration>, Error> {
    let likely = format!("likely {known_effect}");
    Ok(evidences
        .find_evidences_by_gene(gene)?
        .into_iter()
        .filter(|evidence| {
            evidence.known_effect.as_deref().is_some_and(|effect| {
                effect.eq_ignore_ascii_case(known_effect)
                    || (include_likely && effect.eq_ignore_ascii_case(&likely))
            })
        })
        .flat_map(|evidence| evidence.alterations)
        .collect())
}

#[cfg(test)]
mod test {
    use indexmap::IndexSet;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::parser::annotated;

    fn braf(name: &str) -> Alteration {
        annotated(Alteration::new(Some(Gene::new(673, "BRAF")), name))
    }

    fn names(alterations: impl IntoIterator<Item = Alteration>) -> Vec<String> {
        alterations.into_iter().map(|a| a.alteration).collect()
    }

    #[rstest]
    #[case("Oncogenic Mutations", true)]
    #[case("oncogenic mutations", true)]
    #[case("Loss-of-function Mutations", true)]
    #[case("Likely Oncogenic Mutations", false)]
    #[case("Truncating Mutations", false)]
    fn inferred(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_inferred_alteration(name), expected);
    }

    #[rstest]
    #[case("Likely Oncogenic Mutations", true)]
    #[case(" likely Gain-of-function Mutations", true)]
    #[case("Oncogenic Mutations", false)]
    #[case("Likely Truncating Mutations", false)]
    fn likely_inferred(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_likely_inferred_alteration(name), expected);
    }

    #[test]
    fn known_effect() {
        assert_eq!(inferred_alteration_known_effect("Oncogenic Mutations"), "Oncogenic");
        assert_eq!(
            inferred_alteration_known_effect("Gain-of-function  MUTATIONS"),
            "Gain-of-function"
        );
        assert_eq!(inferred_alteration_known_effect("Fusions"), "Fusions");
    }

    #[rstest]
    #[case("Amplification", true, true)]
    #[case("wildtype", true, true)]
    #[case("Likely Oncogenic Mutations", false, true)]
    #[case("Oncogenic Mutations {excluding V600}", false, false)]
    #[case("V600E", false, false)]
    fn general(#[case] variant: &str, #[case] exact: bool, #[case] fuzzy: bool) {
        assert_eq!(is_general_alteration(variant), exact);
        assert_eq!(is_general_alteration_with(variant, true), exact);
        assert_eq!(is_general_alteration_with(variant, false), fuzzy);
    }

    #[test]
    fn list_helpers() {
        let alterations = vec![
            braf("V600E"),
            braf("V600"),
            braf("Oncogenic Mutations"),
            braf("V600E"),
            braf("K601E"),
        ];
        assert_eq!(
            names(exclude_inferred_alterations(&alterations)),
            vec!["V600E", "V600", "V600E", "K601E"]
        );
        assert_eq!(
            names(exclude_positioned_alterations(&alterations)),
            vec!["V600E", "Oncogenic Mutations", "V600E", "K601E"]
        );
        assert_eq!(
            names(unique_alterations(&alterations)),
            vec!["V600E", "V600", "Oncogenic Mutations", "K601E"]
        );
        assert_eq!(
            names(remove_alterations_from_list(&alterations, &[braf("V600E")])),
            vec!["V600", "Oncogenic Mutations", "K601E"]
        );
        assert_eq!(
            alterations_to_string(&unique_alterations(&alterations)),
            "V600E, V600, Oncogenic Mutations, K601E"
        );
        assert!(is_positioned_alteration(&alterations[1]));
    }

    #[test]
    fn lookup() {
        let mut named = braf("V600");
        named.name = "V600 Missense Mutations".to_string();
        let alterations = vec![braf("V600E"), named, braf("K601E")];
        assert_eq!(names(lookup_variant("v600", &alterations)), vec!["V600E", "V600"]);
        assert_eq!(names(lookup_variant(" missense ", &alterations)), vec!["V600"]);
        assert!(lookup_variant("  ", &alterations).is_empty());
    }

    #[test]
    fn evidence_alterations() {
        let evidences = vec![
            Evidence {
                evidence_type: EvidenceType::Vus,
                known_effect: None,
                gene: None,
                alterations: IndexSet::from([braf("V600Q")]),
            },
            Evidence {
                evidence_type: EvidenceType::Oncogenic,
                known_effect: Some("Oncogenic".to_string()),
                gene: None,
                alterations: IndexSet::from([braf("V600E"), braf("V600Q")]),
            },
        ];
        assert_eq!(names(find_vus_from_evidences(&evidences)), vec!["V600Q"]);
        assert_eq!(names(evidences_alterations(&evidences)), vec!["V600Q", "V600E"]);
    }
}
