//! Oncogenicity labels and their ranking.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    data::{
        error::Error,
        interface::{Evidence, EvidenceProvider, EvidenceType, HotspotProvider},
    },
    parser::Alteration,
};

/// Curated oncogenicity, ordered from least to most relevant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Oncogenicity {
    #[serde(rename = "Unknown")]
    Unknown,
    #[serde(rename = "Inconclusive")]
    Inconclusive,
    #[serde(rename = "Likely Neutral")]
    LikelyNeutral,
    #[serde(rename = "Likely Oncogenic")]
    Likely,
    #[serde(rename = "Oncogenic")]
    Yes,
    #[serde(rename = "Resistance")]
    Resistance,
}

impl Oncogenicity {
    /// The label used as known effect of evidences.
    pub fn label(&self) -> &'static str {
        match self {
            Oncogenicity::Unknown => "Unknown",
            Oncogenicity::Inconclusive => "Inconclusive",
            Oncogenicity::LikelyNeutral => "Likely Neutral",
            Oncogenicity::Likely => "Likely Oncogenic",
            Oncogenicity::Yes => "Oncogenic",
            Oncogenicity::Resistance => "Resistance",
        }
    }

    /// Oncogenicity named by the evidence's known effect, if any.
    pub fn by_evidence(evidence: &Evidence) -> Option<Oncogenicity> {
        evidence
            .known_effect
            .as_deref()
            .and_then(|effect| effect.parse().ok())
    }
}

impl fmt::Display for Oncogenicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Oncogenicity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Oncogenicity::Unknown,
            Oncogenicity::Inconclusive,
            Oncogenicity::LikelyNeutral,
            Oncogenicity::Likely,
            Oncogenicity::Yes,
            Oncogenicity::Resistance,
        ]
        .into_iter()
        .find(|o| o.label().eq_ignore_ascii_case(s.trim()))
        .ok_or(())
    }
}

/// Ranked known-effect labels, lowest first.
pub const ONCOGENIC_RANK: &[&str] = &[
    "",
    "Inconclusive",
    "Likely Neutral",
    "Likely Oncogenic",
    "Oncogenic",
];

fn rank(label: Option<&str>) -> i32 {
    label
        .and_then(|label| ONCOGENIC_RANK.iter().position(|ranked| *ranked == label))
        .map(|idx| idx as i32)
        .unwrap_or(-1)
}

/// Reduce known-effect labels to the highest ranked one.
///
/// Starts from `""`; a label replaces the current one unless it ranks lower.
/// Unknown labels rank below `""` and thus never win.
pub fn find_highest_oncogenic<'a>(labels: impl IntoIterator<Item = Option<&'a str>>) -> String {
    let mut highest = String::new();
    for label in labels {
        if rank(label) >= rank(Some(&highest)) {
            highest = label.unwrap_or_default().to_string();
        }
    }
    highest
}

/// Highest oncogenicity label over the ONCOGENIC evidences of the alterations.
pub fn get_oncogenic(
    evidences: &dyn EvidenceProvider,
    alterations: &[Alteration],
) -> Result<String, Error> {
    let evidences = evidences.find_evidences_by_alteration(alterations, &[EvidenceType::Oncogenic])?;
    Ok(find_highest_oncogenic(
        evidences.iter().map(|evidence| evidence.known_effect.as_deref()),
    ))
}

/// Whether the alteration is oncogenic, `None` if undecided.
///
/// Curated (likely) oncogenic evidence decides.  Without a decision a hotspot
/// counts as oncogenic.
pub fn is_oncogenic_alteration(
    evidences: &dyn EvidenceProvider,
    hotspots: &dyn HotspotProvider,
    alteration: &Alteration,
) -> Result<Option<bool>, Error> {
    let oncogenic_evidences = evidences
        .find_evidences_by_alteration(std::slice::from_ref(alteration), &[EvidenceType::Oncogenic])?;

    let mut is_oncogenic = None;
    for evidence in &oncogenic_evidences {
        let oncogenicity = Oncogenicity::by_evidence(evidence);
        if matches!(oncogenicity, Some(Oncogenicity::Yes | Oncogenicity::Likely)) {
            is_oncogenic = Some(true);
            break;
        } else if oncogenicity == Some(Oncogenicity::LikelyNeutral)
            && oncogenicity == Some(Oncogenicity::Inconclusive)
        {
            // Unreachable: one evidence carries a single oncogenicity.
            is_oncogenic = Some(false);
        }
        if is_oncogenic.is_some() {
            break;
        }
    }

    if is_oncogenic.is_none() && hotspots.is_hotspot(alteration)? {
        log::trace!("{} is oncogenic as hotspot", alteration);
        is_oncogenic = Some(true);
    }
    Ok(is_oncogenic)
}

/// Oncogenicities of the alteration's ONCOGENIC evidences.
pub fn curated_oncogenicities(
    evidences: &dyn EvidenceProvider,
    alteration: &Alteration,
) -> Result<BTreeSet<Oncogenicity>, Error> {
    Ok(evidences
        .find_evidences_by_alteration(std::slice::from_ref(alteration), &[EvidenceType::Oncogenic])?
        .iter()
        .filter_map(Oncogenicity::by_evidence)
        .collect())
}

/// Any curated oncogenicity other than `Unknown`.
pub fn has_important_curated_oncogenicity(oncogenicities: &BTreeSet<Oncogenicity>) -> bool {
    oncogenicities.iter().any(|o| {
        matches!(
            o,
            Oncogenicity::Resistance
                | Oncogenicity::Yes
                | Oncogenicity::Likely
                | Oncogenicity::LikelyNeutral
                | Oncogenicity::Inconclusive
        )
    })
}

/// Oncogenic or likely oncogenic.
pub fn has_oncogenic(oncogenicities: &BTreeSet<Oncogenicity>) -> bool {
    oncogenicities.contains(&Oncogenicity::Yes) || oncogenicities.contains(&Oncogenicity::Likely)
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use anyhow::Error;
    use indexmap::IndexSet;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{data, parser::Gene};

    #[rstest]
    #[case(vec![Some("Likely Neutral"), Some("Oncogenic"), Some("Inconclusive")], "Oncogenic")]
    #[case(vec![Some("Inconclusive"), Some("Likely Neutral")], "Likely Neutral")]
    #[case(vec![Some("Likely Oncogenic"), Some("Resistance")], "Likely Oncogenic")]
    #[case(vec![Some("Resistance")], "")]
    #[case(vec![None, Some("Inconclusive"), None], "Inconclusive")]
    #[case(vec![Some(""), Some("")], "")]
    #[case(vec![], "")]
    fn highest(#[case] labels: Vec<Option<&str>>, #[case] expected: &str) {
        assert_eq!(find_highest_oncogenic(labels), expected);
    }

    #[test_log::test]
    fn ordering_and_labels() {
        assert!(Oncogenicity::Inconclusive < Oncogenicity::LikelyNeutral);
        assert!(Oncogenicity::LikelyNeutral < Oncogenicity::Likely);
        assert!(Oncogenicity::Likely < Oncogenicity::Yes);
        assert!(Oncogenicity::Yes < Oncogenicity::Resistance);
        assert_eq!("likely oncogenic".parse(), Ok(Oncogenicity::Likely));
        assert_eq!("Predicted Oncogenic".parse::<Oncogenicity>(), Err(()));
        assert_eq!(format!("{}", Oncogenicity::Yes), "Oncogenic");
    }

    #[test_log::test]
    fn important_and_oncogenic() {
        let set = BTreeSet::from([Oncogenicity::Unknown]);
        assert!(!has_important_curated_oncogenicity(&set));
        assert!(!has_oncogenic(&set));
        let set = BTreeSet::from([Oncogenicity::Unknown, Oncogenicity::Inconclusive]);
        assert!(has_important_curated_oncogenicity(&set));
        assert!(!has_oncogenic(&set));
        let set = BTreeSet::from([Oncogenicity::Likely]);
        assert!(has_oncogenic(&set));
    }

    /// Evidences keyed by alteration notation, hotspots by notation.
    struct Curation {
        effects: Vec<(&'static str, &'static str)>,
        hotspots: Vec<&'static str>,
    }

    fn kit(name: &str) -> Alteration {
        Alteration::new(Some(Gene::new(3815, "KIT")), name)
    }

    impl EvidenceProvider for Curation {
        fn find_evidences_by_alteration(
            &self,
            alterations: &[Alteration],
            evidence_types: &[EvidenceType],
        ) -> Result<Vec<Evidence>, data::Error> {
            assert_eq!(evidence_types, &[EvidenceType::Oncogenic]);
            Ok(self
                .effects
                .iter()
                .filter(|(name, _)| alterations.iter().any(|a| a.alteration == *name))
                .map(|(name, effect)| Evidence {
                    evidence_type: EvidenceType::Oncogenic,
                    known_effect: Some(effect.to_string()),
                    gene: None,
                    alterations: IndexSet::from([kit(name)]),
                })
                .collect())
        }

        fn find_evidences_by_gene(&self, _gene: &Gene) -> Result<Vec<Evidence>, data::Error> {
            Ok(Vec::new())
        }
    }

    impl HotspotProvider for Curation {
        fn is_hotspot(&self, alteration: &Alteration) -> Result<bool, data::Error> {
            Ok(self.hotspots.contains(&alteration.alteration.as_str()))
        }
    }

    fn curation() -> Curation {
        Curation {
            effects: vec![
                ("V654A", "Oncogenic"),
                ("T670I", "Likely Oncogenic"),
                ("D816V", "Likely Neutral"),
                ("D816V", "Inconclusive"),
                ("K642E", "Likely Neutral"),
            ],
            hotspots: vec!["D816V", "N822K"],
        }
    }

    #[rstest]
    #[case("V654A", Some(true))]
    #[case("T670I", Some(true))]
    #[case("N822K", Some(true))]
    #[case("K642E", None)]
    #[case("A1B", None)]
    fn oncogenic_alteration(#[case] name: &str, #[case] expected: Option<bool>) -> Result<(), Error> {
        let curation = curation();
        assert_eq!(is_oncogenic_alteration(&curation, &curation, &kit(name))?, expected);

        Ok(())
    }

    #[test_log::test]
    fn neutral_and_inconclusive_evidences_fall_through_to_hotspot() -> Result<(), Error> {
        // Both labels are curated for D816V, on separate evidences, so neither
        // decides and the hotspot does.
        let curation = curation();
        assert_eq!(
            is_oncogenic_alteration(&curation, &curation, &kit("D816V"))?,
            Some(true)
        );

        Ok(())
    }

    #[test_log::test]
    fn oncogenic_over_alterations() -> Result<(), Error> {
        let curation = curation();
        assert_eq!(get_oncogenic(&curation, &[kit("D816V"), kit("T670I")])?, "Likely Oncogenic");
        assert_eq!(get_oncogenic(&curation, &[kit("A1B")])?, "");
        assert_eq!(
            curated_oncogenicities(&curation, &kit("D816V"))?,
            BTreeSet::from([Oncogenicity::Inconclusive, Oncogenicity::LikelyNeutral])
        );

        Ok(())
    }
}
