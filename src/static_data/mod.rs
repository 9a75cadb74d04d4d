//! Static data.
//!
//! Closed enumerations and the fixed term tables that the classifier and the
//! matcher consult.  All tables are read-only after first access.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::parser::Error;

/// Reference genome build a curated alteration applies to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceGenome {
    #[serde(rename = "GRCh37", alias = "grch37", alias = "GRCH37")]
    Grch37,
    #[serde(rename = "GRCh38", alias = "grch38", alias = "GRCH38")]
    Grch38,
}

/// Genome used whenever a query or record does not name one.
pub const DEFAULT_REFERENCE_GENOME: ReferenceGenome = ReferenceGenome::Grch37;

impl ReferenceGenome {
    /// The set of all reference genomes, used when a mutation string is not tagged.
    pub fn all() -> BTreeSet<ReferenceGenome> {
        BTreeSet::from([ReferenceGenome::Grch37, ReferenceGenome::Grch38])
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReferenceGenome::Grch37 => "GRCh37",
            ReferenceGenome::Grch38 => "GRCh38",
        }
    }
}

impl fmt::Display for ReferenceGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ReferenceGenome {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grch37" => Ok(ReferenceGenome::Grch37),
            "grch38" => Ok(ReferenceGenome::Grch38),
            _ => Err(Error::InvalidReferenceGenome(s.to_string())),
        }
    }
}

/// Category of an alteration.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlterationType {
    Mutation,
    CopyNumberAlteration,
    StructuralVariant,
    Fusion,
}

impl AlterationType {
    /// Case-insensitive lookup by name, `None` for unknown names.
    pub fn by_name(name: &str) -> Option<AlterationType> {
        match name.trim().to_uppercase().as_str() {
            "MUTATION" => Some(AlterationType::Mutation),
            "COPY_NUMBER_ALTERATION" => Some(AlterationType::CopyNumberAlteration),
            "STRUCTURAL_VARIANT" => Some(AlterationType::StructuralVariant),
            "FUSION" => Some(AlterationType::Fusion),
            _ => None,
        }
    }
}

impl FromStr for AlterationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlterationType::by_name(s).ok_or_else(|| Error::InvalidAlterationType(s.to_string()))
    }
}

/// Lower sentinel for alterations without a protein position.
pub const POSITION_START_BOUNDARY: i32 = -1;
/// Upper sentinel for alterations without a protein position.
pub const POSITION_END_BOUNDARY: i32 = 100_000_000;

pub const NA: &str = "NA";
pub const ANY: &str = "any";
pub const MISSENSE_VARIANT: &str = "missense_variant";
pub const SYNONYMOUS_VARIANT: &str = "synonymous_variant";
pub const STOP_GAINED: &str = "stop_gained";
pub const STOP_LOST: &str = "stop_lost";
pub const START_LOST: &str = "start_lost";
pub const INFRAME_INSERTION: &str = "inframe_insertion";
pub const INFRAME_DELETION: &str = "inframe_deletion";
pub const FRAMESHIFT_VARIANT: &str = "frameshift_variant";
pub const FEATURE_TRUNCATION: &str = "feature_truncation";
pub const SPLICE_REGION_VARIANT: &str = "splice_region_variant";
pub const UPSTREAM_GENE_VARIANT: &str = "upstream_gene_variant";

/// Terms that are interchangeable when matching splice variants.
pub const SPLICE_SITE_VARIANTS: &[&str] = &[
    "splice_acceptor_variant",
    "splice_donor_variant",
    SPLICE_REGION_VARIANT,
];

/// A sequence ontology consequence term.
///
/// Equality and hashing only consider the term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantConsequence {
    pub term: String,
    pub description: Option<String>,
    pub is_generally_truncating: bool,
    /// Member of the splice-site equivalence class.
    pub splice_site: bool,
}

impl PartialEq for VariantConsequence {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term
    }
}

impl Eq for VariantConsequence {}

impl std::hash::Hash for VariantConsequence {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.term.hash(state);
    }
}

impl VariantConsequence {
    fn table_entry(term: &str, description: &str, is_generally_truncating: bool) -> Self {
        Self {
            term: term.to_string(),
            description: Some(description.to_string()),
            is_generally_truncating,
            splice_site: SPLICE_SITE_VARIANTS.contains(&term),
        }
    }

    /// Wrap a term that is not part of the term table.
    pub fn adhoc(term: &str) -> Self {
        Self {
            term: term.to_string(),
            description: None,
            is_generally_truncating: false,
            splice_site: false,
        }
    }

    /// Look up a term in the term table.
    pub fn find_by_term(term: &str) -> Option<&'static VariantConsequence> {
        VARIANT_CONSEQUENCES.iter().find(|c| c.term == term)
    }

    /// Look up a term, wrapping unknown terms ad hoc.
    pub fn find_or_adhoc(term: &str) -> VariantConsequence {
        Self::find_by_term(term)
            .cloned()
            .unwrap_or_else(|| Self::adhoc(term))
    }

    pub fn is_splice_site(&self) -> bool {
        self.splice_site
    }
}

lazy_static::lazy_static! {
    /// The fixed consequence term table.
    pub static ref VARIANT_CONSEQUENCES: Vec<VariantConsequence> = vec![
        VariantConsequence::table_entry("3_prime_UTR_variant", "A UTR variant of the 3' UTR", false),
        VariantConsequence::table_entry("5_prime_UTR_variant", "A UTR variant of the 5' UTR", false),
        VariantConsequence::table_entry(NA, "No consequence could be determined", false),
        VariantConsequence::table_entry(ANY, "Any consequence at the given position", false),
        VariantConsequence::table_entry("downstream_gene_variant", "A sequence variant located 3' of a gene", false),
        VariantConsequence::table_entry(FEATURE_TRUNCATION, "A sequence variant that causes the reduction of a genomic feature", true),
        VariantConsequence::table_entry(FRAMESHIFT_VARIANT, "A sequence variant which causes a disruption of the translational reading frame", true),
        VariantConsequence::table_entry(INFRAME_DELETION, "An inframe non synonymous variant that deletes bases from the coding sequence", false),
        VariantConsequence::table_entry(INFRAME_INSERTION, "An inframe non synonymous variant that inserts bases into in the coding sequence", false),
        VariantConsequence::table_entry("intergenic_variant", "A sequence variant located in the intergenic region", false),
        VariantConsequence::table_entry("intron_variant", "A transcript variant occurring within an intron", false),
        VariantConsequence::table_entry(MISSENSE_VARIANT, "A sequence variant that changes one or more bases, resulting in a different amino acid sequence but where the length is preserved", false),
        VariantConsequence::table_entry("splice_acceptor_variant", "A splice variant that changes the 2 base region at the 3' end of an intron", true),
        VariantConsequence::table_entry("splice_donor_variant", "A splice variant that changes the 2 base region at the 5' end of an intron", true),
        VariantConsequence::table_entry(SPLICE_REGION_VARIANT, "A sequence variant in which a change has occurred within the region of the splice site", true),
        VariantConsequence::table_entry(START_LOST, "A codon variant that changes at least one base of the canonical start codon", true),
        VariantConsequence::table_entry(STOP_GAINED, "A sequence variant whereby at least one base of a codon is changed, resulting in a premature stop codon", true),
        VariantConsequence::table_entry(STOP_LOST, "A sequence variant where at least one base of the terminator codon is changed, resulting in an elongated transcript", false),
        VariantConsequence::table_entry("stop_retained_variant", "A sequence variant where at least one base in the terminator codon is changed, but the terminator remains", false),
        VariantConsequence::table_entry(SYNONYMOUS_VARIANT, "A sequence variant where there is no resulting change to the encoded amino acid", false),
        VariantConsequence::table_entry(UPSTREAM_GENE_VARIANT, "A sequence variant located 5' of a gene", false),
    ];
}

pub const ONCOGENIC_MUTATIONS: &str = "Oncogenic Mutations";
pub const TRUNCATING_MUTATIONS: &str = "Truncating Mutations";
pub const FUSIONS: &str = "Fusions";
pub const AMPLIFICATION: &str = "Amplification";
pub const DELETION: &str = "Deletion";
pub const PROMOTER: &str = "Promoter";
pub const VARIANTS_OF_UNKNOWN_SIGNIFICANCE: &str = "Variants of Unknown Significance";

/// Alterations whose annotation is inferred from other curated alterations.
pub const INFERRED_MUTATIONS: &[&str] = &[
    ONCOGENIC_MUTATIONS,
    "Gain-of-function Mutations",
    "Loss-of-function Mutations",
    "Switch-of-function Mutations",
];

/// Alterations naming a structural category rather than a protein change.
pub const STRUCTURAL_ALTERATIONS: &[&str] = &[TRUNCATING_MUTATIONS, FUSIONS, AMPLIFICATION, DELETION];

/// Alterations with a fixed, non-positional meaning.
pub const SPECIAL_VARIANTS: &[&str] = &[PROMOTER, VARIANTS_OF_UNKNOWN_SIGNIFICANCE, "Wildtype"];

/// Abbreviated alteration names and the curated alteration each stands for.
pub const ALTERATION_ABBREVIATIONS: &[(&str, &str)] = &[
    ("CTD", "C-terminal domain"),
    ("vIV", "C-terminal domain"),
    ("vIVa", "C-terminal domain"),
    ("vIVb", "C-terminal domain"),
    ("vIVc", "C-terminal domain"),
    ("KDD", "Kinase Domain Duplication"),
];

/// Curated name of an abbreviated alteration, ignoring case.
pub fn expand_abbreviation(alteration: &str) -> Option<&'static str> {
    let alteration = alteration.trim();
    ALTERATION_ABBREVIATIONS
        .iter()
        .find(|(abbreviation, _)| abbreviation.eq_ignore_ascii_case(alteration))
        .map(|(_, name)| *name)
}

/// PDGFRA; D842V is never an alternative allele of the other D842 alleles.
pub const PDGFRA_ENTREZ_GENE_ID: i32 = 5156;
pub const PDGFRA_EXCLUDED_ALLELE: &str = "D842V";

/// ABL1 T315I takes part in neither allele nor positional matching.
pub const ABL1_HUGO_SYMBOL: &str = "ABL1";
pub const ABL1_EXCLUDED_ALTERATION: &str = "T315I";
