//! Definition of the interfaces of the knowledge base and the other collaborators.

use std::sync::Arc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::{
    data::error::Error,
    parser::{Alteration, Gene},
    static_data::{AlterationType, ReferenceGenome, VariantConsequence},
};

/// Type of a curated evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceType {
    GeneSummary,
    GeneBackground,
    MutationEffect,
    Oncogenic,
    Vus,
    StandardTherapeuticImplicationsForDrugSensitivity,
    StandardTherapeuticImplicationsForDrugResistance,
    InvestigationalTherapeuticImplicationsDrugSensitivity,
    InvestigationalTherapeuticImplicationsDrugResistance,
    DiagnosticImplication,
    PrognosticImplication,
}

/// A curated evidence.
///
/// ```text
/// evidence_type | ONCOGENIC
/// known_effect  | Likely Oncogenic
/// alterations   | BRAF V600E, BRAF V600K
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub evidence_type: EvidenceType,
    /// Free-text label, e.g., `Oncogenic` or `Likely Neutral`.
    pub known_effect: Option<String>,
    pub gene: Option<Gene>,
    pub alterations: IndexSet<Alteration>,
}

/// Protein position range reported by the coordinate annotator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinPosition {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

/// Consequence of a genomic variant on the canonical transcript.
///
/// ```text
/// hugo_gene_symbol  | BRAF
/// hgvsp_short       | p.V600E
/// protein_position  | 600-600
/// consequence_terms | missense_variant
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptConsequenceSummary {
    pub hugo_gene_symbol: String,
    pub hgvsp_short: Option<String>,
    pub protein_position: Option<ProteinPosition>,
    pub consequence_terms: Option<String>,
}

/// Kind of a genomic query given to the coordinate annotator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenomicQueryType {
    /// HGVS genomic notation, e.g., `7:g.140453136A>T`.
    Hgvsg,
    /// Comma-separated location, e.g., `7,140453136,140453136,A,T`.
    GenomicLocation,
}

/// Read-only queries over the curated alterations.
///
/// Methods taking a `pool` operate on the given candidates rather than the
/// whole store.
pub trait AlterationProvider {
    /// Return all curated alterations of the gene.
    fn find_alterations_by_gene(&self, gene: &Gene) -> Result<Vec<Alteration>, Error>;

    /// Find the curated alteration with the given notation.
    ///
    /// # Arguments
    ///
    /// * `gene` -- gene to search in
    /// * `alteration_type` -- restrict to this type if given
    /// * `reference_genome` -- restrict to alterations applying to this genome if given
    /// * `alteration` -- notation, compared case-insensitively
    fn find_alteration(
        &self,
        gene: &Gene,
        alteration_type: Option<AlterationType>,
        reference_genome: Option<ReferenceGenome>,
        alteration: &str,
    ) -> Result<Option<Alteration>, Error>;

    /// Return the curated alterations relevant to the annotated `alteration`
    /// in a deterministic order.
    ///
    /// # Arguments
    ///
    /// * `reference_genome` -- genome of the query
    /// * `alteration` -- annotated query alteration
    /// * `pool` -- curated alterations of the query's gene
    /// * `include_inferred` -- whether to fall back to inferred alterations,
    ///   e.g., "Oncogenic Mutations"
    fn find_relevant_alterations(
        &self,
        reference_genome: ReferenceGenome,
        alteration: &Alteration,
        pool: &IndexSet<Alteration>,
        include_inferred: bool,
    ) -> Result<IndexSet<Alteration>, Error>;

    /// Alterations of the gene in `pool` with a related consequence that
    /// overlap `[start, end]`.
    fn find_mutations_by_consequence_and_position(
        &self,
        gene: &Gene,
        reference_genome: Option<ReferenceGenome>,
        consequence: &VariantConsequence,
        start: i32,
        end: i32,
        pool: &IndexSet<Alteration>,
    ) -> Result<Vec<Alteration>, Error>;

    /// Alterations of the gene in `pool` with a related consequence at exactly
    /// `[start, end]` and a compatible reference residue.
    #[allow(clippy::too_many_arguments)]
    fn find_mutations_by_consequence_and_position_on_same_position(
        &self,
        gene: &Gene,
        reference_genome: Option<ReferenceGenome>,
        consequence: &VariantConsequence,
        start: i32,
        end: i32,
        ref_residues: Option<&str>,
        pool: &IndexSet<Alteration>,
    ) -> Result<Vec<Alteration>, Error>;
}

/// Read-only access to curated evidences.
pub trait EvidenceProvider {
    /// Evidences of the given types supporting any of the alterations.
    fn find_evidences_by_alteration(
        &self,
        alterations: &[Alteration],
        evidence_types: &[EvidenceType],
    ) -> Result<Vec<Evidence>, Error>;

    fn find_evidences_by_gene(&self, gene: &Gene) -> Result<Vec<Evidence>, Error>;
}

/// Gene directory.
pub trait GeneProvider {
    /// Look up a gene by its HUGO symbol or one of its aliases.
    fn gene_by_symbol(&self, hugo_symbol: &str) -> Result<Option<Gene>, Error>;

    fn all_genes(&self) -> Result<Vec<Gene>, Error>;
}

/// Hotspot database.
pub trait HotspotProvider {
    fn is_hotspot(&self, alteration: &Alteration) -> Result<bool, Error>;
}

/// Remote annotation of genomic coordinates.
pub trait CoordinateAnnotator {
    /// Return the consequence on the canonical transcript, `None` if the
    /// query does not hit a transcript.
    fn transcript_consequence(
        &self,
        query_type: GenomicQueryType,
        query: &str,
        reference_genome: ReferenceGenome,
    ) -> Result<Option<TranscriptConsequenceSummary>, Error>;
}

/// Canonical protein sequences.
pub trait SequenceProvider {
    fn protein_sequence(
        &self,
        reference_genome: ReferenceGenome,
        gene: &Gene,
    ) -> Result<Option<String>, Error>;
}

/// Per-gene cache of curated alterations.
///
/// Population of a gene entry must be atomic: no reader may observe a
/// partially populated entry.
pub trait AlterationCache {
    fn contains_alterations(&self, entrez_gene_id: i32) -> bool;

    /// Populate the entry of the gene, replacing an existing one.
    fn set_alterations(&self, gene: &Gene) -> Result<(), Error>;

    fn get_alterations(&self, entrez_gene_id: i32) -> Option<Arc<IndexSet<Alteration>>>;

    /// Return the alterations of the gene, populating the entry on first access.
    fn alterations(&self, gene: &Gene) -> Result<Arc<IndexSet<Alteration>>, Error>;

    /// Alterations curated as variants of unknown significance.
    fn get_vus(&self, entrez_gene_id: i32) -> Result<Arc<IndexSet<Alteration>>, Error>;

    fn get_all_genes(&self) -> Result<Vec<Gene>, Error>;
}
