//! Data structures for representing genes and alterations.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::static_data::{
    AlterationType, ReferenceGenome, VariantConsequence, MISSENSE_VARIANT, NA,
    POSITION_END_BOUNDARY, POSITION_START_BOUNDARY,
};

/// A gene from the gene directory.
///
/// Identity is the Entrez gene ID; symbol and aliases are informational.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Gene {
    pub entrez_gene_id: i32,
    pub hugo_symbol: String,
    #[serde(default)]
    pub gene_aliases: BTreeSet<String>,
}

impl Gene {
    pub fn new(entrez_gene_id: i32, hugo_symbol: &str) -> Self {
        Self {
            entrez_gene_id,
            hugo_symbol: hugo_symbol.to_string(),
            gene_aliases: BTreeSet::new(),
        }
    }
}

impl PartialEq for Gene {
    fn eq(&self, other: &Self) -> bool {
        self.entrez_gene_id == other.entrez_gene_id
    }
}

impl Eq for Gene {}

impl std::hash::Hash for Gene {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.entrez_gene_id.hash(state);
    }
}

/// Normalized representation of a protein or structural alteration.
///
/// Two alterations are equal iff gene, alteration string, alteration type and
/// reference genome set are equal.  All deduplicating containers in this
/// crate rely on that.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Alteration {
    pub gene: Option<Gene>,
    pub alteration_type: Option<AlterationType>,
    /// Parseable notation, e.g., `V600E` or `Truncating Mutations`.
    pub alteration: String,
    /// Display name.
    pub name: String,
    pub ref_residues: Option<String>,
    pub variant_residues: Option<String>,
    pub protein_start: Option<i32>,
    pub protein_end: Option<i32>,
    pub consequence: Option<VariantConsequence>,
    pub reference_genomes: BTreeSet<ReferenceGenome>,
}

impl PartialEq for Alteration {
    fn eq(&self, other: &Self) -> bool {
        self.gene == other.gene
            && self.alteration == other.alteration
            && self.alteration_type == other.alteration_type
            && self.reference_genomes == other.reference_genomes
    }
}

impl Eq for Alteration {}

impl std::hash::Hash for Alteration {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.gene.hash(state);
        self.alteration.hash(state);
        self.alteration_type.hash(state);
        self.reference_genomes.hash(state);
    }
}

impl Alteration {
    /// Create an unannotated alteration of the given gene.
    pub fn new(gene: Option<Gene>, alteration: &str) -> Self {
        Self {
            gene,
            alteration: alteration.to_string(),
            ..Default::default()
        }
    }

    pub fn hugo_symbol(&self) -> Option<&str> {
        self.gene.as_ref().map(|gene| gene.hugo_symbol.as_str())
    }

    pub fn consequence_term(&self) -> Option<&str> {
        self.consequence.as_ref().map(|c| c.term.as_str())
    }

    pub fn has_consequence(&self, term: &str) -> bool {
        self.consequence_term() == Some(term)
    }

    /// Start and end are both set and equal.
    pub fn is_single_position(&self) -> bool {
        matches!((self.protein_start, self.protein_end), (Some(start), Some(end)) if start == end)
    }

    /// Both positions are set and neither is a sentinel.
    pub fn has_bound_position(&self) -> bool {
        match (self.protein_start, self.protein_end) {
            (Some(start), Some(end)) => {
                start != POSITION_START_BOUNDARY && end != POSITION_END_BOUNDARY
            }
            _ => false,
        }
    }

    pub fn applies_to(&self, reference_genome: ReferenceGenome) -> bool {
        self.reference_genomes.contains(&reference_genome)
    }

    /// A single residue with known reference residue but no variant residue,
    /// e.g., `V600`.
    pub fn is_positioned(&self) -> bool {
        self.is_single_position()
            && self
                .ref_residues
                .as_ref()
                .map(|r| r.chars().count() == 1)
                .unwrap_or(false)
            && self.variant_residues.is_none()
            && (self.has_consequence(NA) || self.has_consequence(MISSENSE_VARIANT))
    }
}

#[cfg(test)]
mod test {
    use std::collections::{BTreeSet, HashSet};

    use pretty_assertions::assert_eq;

    use super::{Alteration, Gene};
    use crate::static_data::{
        AlterationType, ReferenceGenome, VariantConsequence, MISSENSE_VARIANT, NA,
        POSITION_END_BOUNDARY, POSITION_START_BOUNDARY,
    };

    fn braf() -> Gene {
        Gene::new(673, "BRAF")
    }

    #[test]
    fn gene_identity_is_entrez_id() {
        let mut other = Gene::new(673, "braf");
        other.gene_aliases.insert("BRAF1".to_string());
        assert_eq!(braf(), other);
        assert_ne!(braf(), Gene::new(5156, "BRAF"));
    }

    #[test]
    fn structural_equality() {
        let mut a = Alteration::new(Some(braf()), "V600E");
        a.alteration_type = Some(AlterationType::Mutation);
        a.reference_genomes = ReferenceGenome::all();

        let mut b = a.clone();
        b.name = "something else".to_string();
        b.protein_start = Some(600);
        b.consequence = Some(VariantConsequence::find_or_adhoc(MISSENSE_VARIANT));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a.clone());
        set.insert(b);
        assert_eq!(set.len(), 1);

        let mut c = a.clone();
        c.reference_genomes = BTreeSet::from([ReferenceGenome::Grch38]);
        assert_ne!(a, c);

        let mut d = a.clone();
        d.alteration_type = Some(AlterationType::Fusion);
        assert_ne!(a, d);
    }

    #[test]
    fn positioned() {
        let mut alt = Alteration::new(Some(braf()), "V600");
        alt.ref_residues = Some("V".to_string());
        alt.protein_start = Some(600);
        alt.protein_end = Some(600);
        alt.consequence = Some(VariantConsequence::find_or_adhoc(NA));
        assert!(alt.is_positioned());

        alt.variant_residues = Some("E".to_string());
        assert!(!alt.is_positioned());
    }

    #[test]
    fn bound_position() {
        let mut alt = Alteration::new(None, "Amplification");
        assert!(!alt.has_bound_position());
        alt.protein_start = Some(POSITION_START_BOUNDARY);
        alt.protein_end = Some(POSITION_END_BOUNDARY);
        assert!(!alt.has_bound_position());
        alt.protein_start = Some(10);
        alt.protein_end = Some(20);
        assert!(alt.has_bound_position());
    }
}
