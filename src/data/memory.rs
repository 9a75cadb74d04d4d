//! Knowledge base held in memory, loaded from JSON files.
//!
//! The provider implements every collaborator interface of the crate and is
//! used as the reference knowledge base, e.g., in tests.

use std::time::Instant;

use ahash::AHashMap;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::{
    data::{
        error::Error,
        interface::{
            AlterationProvider, CoordinateAnnotator, Evidence, EvidenceProvider, EvidenceType,
            GeneProvider, GenomicQueryType, HotspotProvider, SequenceProvider,
            TranscriptConsequenceSummary,
        },
    },
    matcher::{
        allele::{allele_alterations, is_abl1_t315i, positioned_alterations},
        fusion::{is_fusion, revert_fusion_name},
        overlap::{find_on_same_position, find_overlap_alteration, sort_alterations_by_the_range},
    },
    oncogenic::is_oncogenic_alteration,
    parser::{annotate_alteration, Alteration, Gene},
    static_data::{
        expand_abbreviation, AlterationType, ReferenceGenome, VariantConsequence, AMPLIFICATION,
        DELETION, FEATURE_TRUNCATION, FUSIONS, MISSENSE_VARIANT, ONCOGENIC_MUTATIONS,
        TRUNCATING_MUTATIONS, VARIANTS_OF_UNKNOWN_SIGNIFICANCE,
    },
    utils::char_at,
};

/// Configuration for the `data::memory::Provider`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Paths to the JSON files to load.
    pub json_paths: Vec<String>,
}

/// Data structures of the JSON files.
pub mod models {
    use serde::{Deserialize, Serialize};

    use crate::{
        data::interface::{EvidenceType, GenomicQueryType, TranscriptConsequenceSummary},
        parser::Gene,
        static_data::{AlterationType, ReferenceGenome},
    };

    /// Container for a knowledge base file.
    #[derive(Deserialize, Serialize, Debug, Clone, Default)]
    #[serde(default)]
    pub struct Container {
        pub genes: Vec<Gene>,
        pub alterations: Vec<Alteration>,
        pub evidences: Vec<Evidence>,
        pub hotspots: Vec<Hotspot>,
        pub sequences: Vec<Sequence>,
        pub transcript_consequences: Vec<TranscriptConsequence>,
    }

    /// A curated alteration; it is annotated from `alteration` on load.
    #[derive(Deserialize, Serialize, Debug, Clone)]
    pub struct Alteration {
        pub entrez_gene_id: i32,
        pub alteration: String,
        #[serde(default)]
        pub name: Option<String>,
        /// Defaults to `MUTATION`.
        #[serde(default)]
        pub alteration_type: Option<AlterationType>,
        #[serde(default)]
        pub consequence: Option<String>,
        #[serde(default)]
        pub protein_start: Option<i32>,
        #[serde(default)]
        pub protein_end: Option<i32>,
        /// Defaults to all reference genomes.
        #[serde(default)]
        pub reference_genomes: Vec<ReferenceGenome>,
    }

    /// A curated evidence, alterations referenced by notation.
    #[derive(Deserialize, Serialize, Debug, Clone)]
    pub struct Evidence {
        pub evidence_type: EvidenceType,
        pub entrez_gene_id: i32,
        #[serde(default)]
        pub known_effect: Option<String>,
        #[serde(default)]
        pub alterations: Vec<String>,
    }

    /// A recurrently mutated protein range.
    #[derive(Deserialize, Serialize, Debug, Clone, Copy)]
    pub struct Hotspot {
        pub entrez_gene_id: i32,
        pub protein_start: i32,
        pub protein_end: i32,
    }

    /// Canonical protein sequence of a gene.
    #[derive(Deserialize, Serialize, Debug, Clone)]
    pub struct Sequence {
        pub entrez_gene_id: i32,
        pub reference_genome: ReferenceGenome,
        pub sequence: String,
    }

    /// Precomputed answer of the coordinate annotator.
    #[derive(Deserialize, Serialize, Debug, Clone)]
    pub struct TranscriptConsequence {
        pub query_type: GenomicQueryType,
        pub query: String,
        pub reference_genome: ReferenceGenome,
        pub summary: TranscriptConsequenceSummary,
    }
}

/// In-memory knowledge base.
///
/// Alterations are kept per gene in file order; all lookups by key go
/// through hash maps.
#[derive(Debug, Default)]
pub struct Provider {
    genes: Vec<Gene>,
    gene_by_symbol: AHashMap<String, usize>,
    alterations: AHashMap<i32, Vec<Alteration>>,
    evidences: Vec<Evidence>,
    hotspots: AHashMap<i32, Vec<(i32, i32)>>,
    sequences: AHashMap<(ReferenceGenome, i32), String>,
    transcript_consequences: AHashMap<(GenomicQueryType, String, ReferenceGenome), TranscriptConsequenceSummary>,
}

impl Provider {
    pub fn new(config: Config) -> Result<Self, Error> {
        let mut result = Self::default();
        for json_path in &config.json_paths {
            result.load_and_extract(json_path)?;
        }
        log::debug!(
            "memory::Provider -- #genes = {}, #alterations = {}, #evidences = {}",
            result.genes.len(),
            result.alterations.values().map(Vec::len).sum::<usize>(),
            result.evidences.len()
        );
        Ok(result)
    }

    fn load_and_extract(&mut self, json_path: &str) -> Result<(), Error> {
        log::debug!("Loading knowledge base from {:?}", json_path);
        let start = Instant::now();
        let models::Container {
            genes,
            alterations,
            evidences,
            hotspots,
            sequences,
            transcript_consequences,
        } = serde_json::from_reader(std::io::BufReader::new(
            std::fs::File::open(json_path).map_err(|_e| Error::JsonOpen(json_path.to_string()))?,
        ))
        .map_err(|_e| Error::JsonParse(json_path.to_string()))?;
        log::debug!(
            "loading / deserializing {} genes and {} alterations took {:?}",
            genes.len(),
            alterations.len(),
            start.elapsed()
        );

        let start = Instant::now();
        for gene in genes {
            let idx = self.genes.len();
            let symbols = std::iter::once(&gene.hugo_symbol).chain(gene.gene_aliases.iter());
            for symbol in symbols {
                self.gene_by_symbol.entry(symbol.to_uppercase()).or_insert(idx);
            }
            self.genes.push(gene);
        }
        for record in alterations {
            let alteration = self.extract_alteration(record)?;
            let gene_alterations = self
                .alterations
                .entry(alteration.gene.as_ref().map(|g| g.entrez_gene_id).unwrap_or_default())
                .or_default();
            if !gene_alterations.contains(&alteration) {
                gene_alterations.push(alteration);
            }
        }
        for record in evidences {
            let evidence = self.extract_evidence(record)?;
            self.evidences.push(evidence);
        }
        for hotspot in hotspots {
            self.hotspots
                .entry(hotspot.entrez_gene_id)
                .or_default()
                .push((hotspot.protein_start, hotspot.protein_end));
        }
        for record in sequences {
            self.sequences
                .insert((record.reference_genome, record.entrez_gene_id), record.sequence);
        }
        for record in transcript_consequences {
            self.transcript_consequences.insert(
                (record.query_type, record.query, record.reference_genome),
                record.summary,
            );
        }
        log::debug!("extracting datastructures took {:?}", start.elapsed());
        Ok(())
    }

    fn gene_by_id(&self, entrez_gene_id: i32) -> Result<&Gene, Error> {
        self.genes
            .iter()
            .find(|gene| gene.entrez_gene_id == entrez_gene_id)
            .ok_or_else(|| Error::NoGeneFound(entrez_gene_id.to_string()))
    }

    fn extract_alteration(&self, record: models::Alteration) -> Result<Alteration, Error> {
        let mut alteration = Alteration {
            gene: Some(self.gene_by_id(record.entrez_gene_id)?.clone()),
            alteration_type: Some(record.alteration_type.unwrap_or(AlterationType::Mutation)),
            alteration: record.alteration,
            name: record.name.unwrap_or_default(),
            consequence: record.consequence.as_deref().map(VariantConsequence::find_or_adhoc),
            protein_start: record.protein_start,
            protein_end: record.protein_end,
            reference_genomes: if record.reference_genomes.is_empty() {
                ReferenceGenome::all()
            } else {
                record.reference_genomes.into_iter().collect()
            },
            ..Default::default()
        };
        let protein_change = alteration.alteration.clone();
        annotate_alteration(&mut alteration, &protein_change);
        Ok(alteration)
    }

    fn extract_evidence(&self, record: models::Evidence) -> Result<Evidence, Error> {
        let gene = self.gene_by_id(record.entrez_gene_id)?.clone();
        let curated = self
            .alterations
            .get(&gene.entrez_gene_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let mut alterations = IndexSet::new();
        for name in &record.alterations {
            match find_named(curated, name) {
                Some(alteration) => {
                    alterations.insert(alteration);
                }
                None => log::warn!("evidence refers to unknown alteration {} {}", gene, name),
            }
        }
        Ok(Evidence {
            evidence_type: record.evidence_type,
            known_effect: record.known_effect,
            gene: Some(gene),
            alterations,
        })
    }
}

/// First alteration whose notation equals `name`, ignoring case.
fn find_named<'a>(
    alterations: impl IntoIterator<Item = &'a Alteration>,
    name: &str,
) -> Option<Alteration> {
    alterations
        .into_iter()
        .find(|alteration| alteration.alteration.eq_ignore_ascii_case(name))
        .cloned()
}

/// Whether the reference residue of `candidate` at the query's start agrees
/// with the query's reference residue; unknown residues agree.
fn reference_residue_agrees(query: &Alteration, candidate: &Alteration) -> bool {
    let (Some(query_ref), Some(candidate_ref), Some(query_start), Some(candidate_start)) = (
        query.ref_residues.as_deref(),
        candidate.ref_residues.as_deref(),
        query.protein_start,
        candidate.protein_start,
    ) else {
        return true;
    };
    let offset = query_start - candidate_start;
    if offset < 0 {
        return true;
    }
    match (char_at(query_ref, 0), char_at(candidate_ref, offset as usize)) {
        (Some(query_residue), Some(candidate_residue)) => query_residue == candidate_residue,
        _ => true,
    }
}

impl Provider {
    /// Range alterations overlapping a positioned query, sorted by range.
    ///
    /// Single-residue missense alterations of missense queries are left to
    /// the allele matching.
    fn overlapping_ranges(
        &self,
        reference_genome: ReferenceGenome,
        alteration: &Alteration,
        candidates: &IndexSet<Alteration>,
    ) -> Result<Vec<Alteration>, Error> {
        let (Some(gene), Some(consequence), Some(start), Some(end)) = (
            &alteration.gene,
            &alteration.consequence,
            alteration.protein_start,
            alteration.protein_end,
        ) else {
            return Ok(Vec::new());
        };
        if !alteration.has_bound_position() {
            return Ok(Vec::new());
        }

        let mut ranges = self.find_mutations_by_consequence_and_position(
            gene,
            Some(reference_genome),
            consequence,
            start,
            end,
            candidates,
        )?;
        if consequence.is_generally_truncating && consequence.term != FEATURE_TRUNCATION {
            ranges.extend(self.find_mutations_by_consequence_and_position(
                gene,
                Some(reference_genome),
                &VariantConsequence::find_or_adhoc(FEATURE_TRUNCATION),
                start,
                end,
                candidates,
            )?);
        }
        let query_is_missense = alteration.has_consequence(MISSENSE_VARIANT);
        ranges.retain(|candidate| {
            candidate.has_bound_position()
                && !(query_is_missense
                    && candidate.is_single_position()
                    && candidate.has_consequence(MISSENSE_VARIANT))
                && reference_residue_agrees(alteration, candidate)
        });
        sort_alterations_by_the_range(&mut ranges, start, end);
        Ok(ranges)
    }
}

impl AlterationProvider for Provider {
    fn find_alterations_by_gene(&self, gene: &Gene) -> Result<Vec<Alteration>, Error> {
        Ok(self
            .alterations
            .get(&gene.entrez_gene_id)
            .cloned()
            .unwrap_or_default())
    }

    fn find_alteration(
        &self,
        gene: &Gene,
        alteration_type: Option<AlterationType>,
        reference_genome: Option<ReferenceGenome>,
        alteration: &str,
    ) -> Result<Option<Alteration>, Error> {
        Ok(find_named(
            self.alterations
                .get(&gene.entrez_gene_id)
                .into_iter()
                .flatten()
                .filter(|candidate| {
                    alteration_type.is_none() || candidate.alteration_type == alteration_type
                })
                .filter(|candidate| {
                    reference_genome
                        .map(|genome| candidate.applies_to(genome))
                        .unwrap_or(true)
                }),
            alteration,
        ))
    }

    fn find_relevant_alterations(
        &self,
        reference_genome: ReferenceGenome,
        alteration: &Alteration,
        pool: &IndexSet<Alteration>,
        include_inferred: bool,
    ) -> Result<IndexSet<Alteration>, Error> {
        let mut relevant = IndexSet::new();
        let Some(gene) = &alteration.gene else {
            return Ok(relevant);
        };
        let candidates = pool
            .iter()
            .filter(|candidate| {
                candidate.gene.as_ref() == Some(gene) && candidate.applies_to(reference_genome)
            })
            .cloned()
            .collect::<IndexSet<_>>();

        let exact = find_named(&candidates, &alteration.alteration)
            .or_else(|| {
                revert_fusion_name(&alteration.alteration)
                    .and_then(|reverted| find_named(&candidates, &reverted))
            })
            .or_else(|| {
                expand_abbreviation(&alteration.alteration)
                    .and_then(|name| find_named(&candidates, name))
            });
        relevant.extend(exact.clone());
        if is_abl1_t315i(alteration) {
            return Ok(relevant);
        }

        relevant.extend(allele_alterations(self, Some(reference_genome), alteration, &candidates)?);
        relevant.extend(self.overlapping_ranges(reference_genome, alteration, &candidates)?);
        relevant.extend(positioned_alterations(
            self,
            Some(reference_genome),
            alteration,
            &candidates,
        )?);

        let truncating_mutations = find_named(&candidates, TRUNCATING_MUTATIONS);
        if is_fusion(&alteration.alteration)
            || alteration.alteration_type == Some(AlterationType::Fusion)
        {
            // Fusions of genes without curated "Fusions" count as truncating.
            match find_named(&candidates, FUSIONS) {
                Some(fusions) => {
                    relevant.insert(fusions);
                }
                None => relevant.extend(truncating_mutations.clone()),
            }
        }
        if alteration
            .consequence
            .as_ref()
            .is_some_and(|consequence| consequence.is_generally_truncating)
        {
            relevant.extend(truncating_mutations.clone());
        }
        if exact.is_none() && alteration.alteration.eq_ignore_ascii_case(DELETION) {
            relevant.extend(truncating_mutations);
        }

        if let Some(vus) = find_named(&candidates, VARIANTS_OF_UNKNOWN_SIGNIFICANCE) {
            let exact_is_vus = match &exact {
                Some(exact) => !self
                    .find_evidences_by_alteration(std::slice::from_ref(exact), &[EvidenceType::Vus])?
                    .is_empty(),
                None => false,
            };
            let unmatched = relevant.is_empty() && !alteration.alteration.trim().is_empty();
            if exact_is_vus || unmatched {
                relevant.insert(vus);
            }
        }

        if include_inferred && !alteration.alteration.eq_ignore_ascii_case(AMPLIFICATION) {
            if let Some(oncogenic_mutations) = find_named(&candidates, ONCOGENIC_MUTATIONS) {
                let mut any_oncogenic = false;
                for collected in &relevant {
                    if is_oncogenic_alteration(self, self, collected)? == Some(true) {
                        any_oncogenic = true;
                        break;
                    }
                }
                if any_oncogenic {
                    relevant.insert(oncogenic_mutations);
                }
            }
        }

        log::trace!("{} relevant alterations for {}", relevant.len(), alteration);
        Ok(relevant)
    }

    fn find_mutations_by_consequence_and_position(
        &self,
        gene: &Gene,
        reference_genome: Option<ReferenceGenome>,
        consequence: &VariantConsequence,
        start: i32,
        end: i32,
        pool: &IndexSet<Alteration>,
    ) -> Result<Vec<Alteration>, Error> {
        Ok(
            find_overlap_alteration(pool, gene, reference_genome, consequence, start, end)
                .into_iter()
                .collect(),
        )
    }

    fn find_mutations_by_consequence_and_position_on_same_position(
        &self,
        gene: &Gene,
        reference_genome: Option<ReferenceGenome>,
        consequence: &VariantConsequence,
        start: i32,
        end: i32,
        ref_residues: Option<&str>,
        pool: &IndexSet<Alteration>,
    ) -> Result<Vec<Alteration>, Error> {
        Ok(find_on_same_position(
            pool,
            gene,
            reference_genome,
            consequence,
            start,
            end,
            ref_residues,
        ))
    }
}

impl EvidenceProvider for Provider {
    fn find_evidences_by_alteration(
        &self,
        alterations: &[Alteration],
        evidence_types: &[EvidenceType],
    ) -> Result<Vec<Evidence>, Error> {
        Ok(self
            .evidences
            .iter()
            .filter(|evidence| {
                evidence_types.is_empty() || evidence_types.contains(&evidence.evidence_type)
            })
            .filter(|evidence| {
                alterations
                    .iter()
                    .any(|alteration| evidence.alterations.contains(alteration))
            })
            .cloned()
            .collect())
    }

    fn find_evidences_by_gene(&self, gene: &Gene) -> Result<Vec<Evidence>, Error> {
        Ok(self
            .evidences
            .iter()
            .filter(|evidence| evidence.gene.as_ref() == Some(gene))
            .cloned()
            .collect())
    }
}

impl GeneProvider for Provider {
    fn gene_by_symbol(&self, hugo_symbol: &str) -> Result<Option<Gene>, Error> {
        Ok(self
            .gene_by_symbol
            .get(&hugo_symbol.trim().to_uppercase())
            .map(|idx| self.genes[*idx].clone()))
    }

    fn all_genes(&self) -> Result<Vec<Gene>, Error> {
        Ok(self.genes.clone())
    }
}

impl HotspotProvider for Provider {
    fn is_hotspot(&self, alteration: &Alteration) -> Result<bool, Error> {
        let (Some(gene), Some(start), Some(end)) =
            (&alteration.gene, alteration.protein_start, alteration.protein_end)
        else {
            return Ok(false);
        };
        if !alteration.has_bound_position() {
            return Ok(false);
        }
        Ok(self
            .hotspots
            .get(&gene.entrez_gene_id)
            .into_iter()
            .flatten()
            .any(|(hotspot_start, hotspot_end)| start >= *hotspot_start && end <= *hotspot_end))
    }
}

impl CoordinateAnnotator for Provider {
    fn transcript_consequence(
        &self,
        query_type: GenomicQueryType,
        query: &str,
        reference_genome: ReferenceGenome,
    ) -> Result<Option<TranscriptConsequenceSummary>, Error> {
        Ok(self
            .transcript_consequences
            .get(&(query_type, query.trim().to_string(), reference_genome))
            .cloned())
    }
}

impl SequenceProvider for Provider {
    fn protein_sequence(
        &self,
        reference_genome: ReferenceGenome,
        gene: &Gene,
    ) -> Result<Option<String>, Error> {
        Ok(self
            .sequences
            .get(&(reference_genome, gene.entrez_gene_id))
            .cloned())
    }
}

#[cfg(test)]
pub mod test_helpers {
    use anyhow::Error;

    use super::{Config, Provider};

    pub fn build_provider() -> Result<Provider, Error> {
        Ok(Provider::new(Config {
            json_paths: vec!["tests/data/memory/curated.json".to_string()],
        })?)
    }
}

#[cfg(test)]
mod test {
    use anyhow::Error;
    use indexmap::IndexSet;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{test_helpers::build_provider, Config, Provider};
    use crate::{
        data::{
            self,
            interface::{
                AlterationProvider, CoordinateAnnotator, EvidenceProvider, EvidenceType,
                GeneProvider, GenomicQueryType, HotspotProvider, SequenceProvider,
            },
        },
        matcher::filter::alterations_to_string,
        parser::{annotated, Alteration, Gene},
        static_data::{AlterationType, ReferenceGenome, MISSENSE_VARIANT},
    };

    #[test_log::test]
    fn test_sync() {
        fn is_sync<T: Sync + Send>() {}
        is_sync::<super::Provider>();
    }

    #[test_log::test]
    fn missing_file() {
        let result = Provider::new(Config {
            json_paths: vec!["tests/data/memory/missing.json".to_string()],
        });
        assert!(matches!(result, Err(data::Error::JsonOpen(_))));
    }

    #[test_log::test]
    fn genes_by_symbol_and_alias() -> Result<(), Error> {
        let provider = build_provider()?;

        assert_eq!(provider.gene_by_symbol("braf")?, Some(Gene::new(673, "BRAF")));
        assert_eq!(provider.gene_by_symbol("C-KIT")?, Some(Gene::new(3815, "KIT")));
        assert_eq!(provider.gene_by_symbol("NOPE")?, None);
        assert_eq!(provider.all_genes()?.len(), 12);

        Ok(())
    }

    #[test_log::test]
    fn alterations_are_annotated_on_load() -> Result<(), Error> {
        let provider = build_provider()?;
        let braf = Gene::new(673, "BRAF");

        let v600e = provider
            .find_alteration(&braf, Some(AlterationType::Mutation), None, "v600e")?
            .expect("V600E is curated");
        assert_eq!(v600e.consequence_term(), Some(MISSENSE_VARIANT));
        assert_eq!(v600e.protein_start, Some(600));
        assert_eq!(v600e.reference_genomes, ReferenceGenome::all());

        assert_eq!(
            provider.find_alteration(&braf, None, Some(ReferenceGenome::Grch37), "V600W")?,
            None
        );
        assert!(provider
            .find_alteration(&braf, None, Some(ReferenceGenome::Grch38), "V600W")?
            .is_some());
        assert_eq!(
            provider.find_alteration(&braf, Some(AlterationType::Fusion), None, "V600E")?,
            None
        );

        Ok(())
    }

    #[test_log::test]
    fn evidences() -> Result<(), Error> {
        let provider = build_provider()?;
        let braf = Gene::new(673, "BRAF");
        let v600e = provider
            .find_alteration(&braf, None, None, "V600E")?
            .expect("V600E is curated");

        let evidences =
            provider.find_evidences_by_alteration(&[v600e.clone()], &[EvidenceType::Oncogenic])?;
        assert_eq!(evidences.len(), 1);
        assert_eq!(evidences[0].known_effect.as_deref(), Some("Oncogenic"));
        assert!(provider
            .find_evidences_by_alteration(&[v600e], &[EvidenceType::Vus])?
            .is_empty());
        assert_eq!(provider.find_evidences_by_gene(&braf)?.len(), 2);

        Ok(())
    }

    #[rstest]
    #[case("N822K", true)]
    #[case("D816V", false)]
    #[case("Amplification", false)]
    fn hotspots(#[case] name: &str, #[case] expected: bool) -> Result<(), Error> {
        let provider = build_provider()?;
        let alteration = annotated(Alteration::new(Some(Gene::new(3815, "KIT")), name));
        assert_eq!(provider.is_hotspot(&alteration)?, expected);

        Ok(())
    }

    #[test_log::test]
    fn sequences_and_transcript_consequences() -> Result<(), Error> {
        let provider = build_provider()?;
        let braf = Gene::new(673, "BRAF");

        assert_eq!(
            provider
                .protein_sequence(ReferenceGenome::Grch37, &braf)?
                .as_deref()
                .map(|seq| &seq[..4]),
            Some("MAAL")
        );
        assert_eq!(provider.protein_sequence(ReferenceGenome::Grch38, &braf)?, None);

        let summary = provider
            .transcript_consequence(
                GenomicQueryType::Hgvsg,
                "7:g.140453136A>T",
                ReferenceGenome::Grch37,
            )?
            .expect("query is annotated");
        assert_eq!(summary.hugo_gene_symbol, "BRAF");
        assert_eq!(summary.hgvsp_short.as_deref(), Some("p.V600E"));
        assert_eq!(
            provider.transcript_consequence(
                GenomicQueryType::Hgvsg,
                "7:g.140453136A>T",
                ReferenceGenome::Grch38,
            )?,
            None
        );

        Ok(())
    }

    fn relevant(
        provider: &Provider,
        entrez_gene_id: i32,
        hugo_symbol: &str,
        name: &str,
        reference_genome: ReferenceGenome,
    ) -> Result<String, Error> {
        let gene = Gene::new(entrez_gene_id, hugo_symbol);
        let pool = provider
            .find_alterations_by_gene(&gene)?
            .into_iter()
            .collect::<IndexSet<_>>();
        let mut query = Alteration::new(Some(gene), name);
        query.alteration_type = Some(AlterationType::Mutation);
        query.reference_genomes.insert(reference_genome);
        let query = annotated(query);
        let relevant = provider.find_relevant_alterations(reference_genome, &query, &pool, true)?;
        Ok(alterations_to_string(&relevant))
    }

    #[rstest]
    #[case(673, "BRAF", "V600E", "V600E, V600A, V600D, V600G, V600K, V600L, V600M, V600Q, V600R, VK600EI, V600, Oncogenic Mutations")]
    #[case(673, "BRAF", "A600E", "")]
    #[case(9968, "MED12", "G44S", "G44S, G44A, G44C, G44D, G44V, 34_68mis")]
    #[case(9968, "MED12", "G44*", "Truncating Mutations")]
    #[case(9968, "MED12", "K42_N46del", "")]
    #[case(5156, "PDGFRA", "D842I", "D842I, D842H, D842Y, D842_I843delinsIM, C814_S852mis, Oncogenic Mutations")]
    #[case(5156, "PDGFRA", "D842V", "D842V, D842H, D842I, D842Y, D842_I843delinsIM, C814_S852mis, Oncogenic Mutations")]
    #[case(25, "ABL1", "T315I", "T315I")]
    #[case(25, "ABL1", "ABL1-BCR fusion", "BCR-ABL1 Fusion, Fusions")]
    #[case(7157, "TP53", "X33_splice", "X33_splice, Truncating Mutations, Oncogenic Mutations")]
    #[case(4233, "MET", "X1010_splice", "X1010_splice, 963_1010splice, 981_1028splice, Oncogenic Mutations")]
    #[case(4233, "MET", "X1010splice", "X1010_splice, 963_1010splice, 981_1028splice, Oncogenic Mutations")]
    #[case(4851, "NOTCH1", "Q2405Rfs*17", "Q2405Rfs*17, T2375_K2555trunc, Truncating Mutations, Oncogenic Mutations")]
    #[case(6416, "MAP2K4", "R304*", "R304*, Truncating Mutations")]
    #[case(3815, "KIT", "Amplification", "Amplification")]
    #[case(3815, "KIT", "V654G", "V654A, Oncogenic Mutations")]
    #[case(3815, "KIT", "T670A", "T670I, I669_T670delinsMI, Oncogenic Mutations")]
    #[case(3815, "KIT", "N822H", "N822K, Oncogenic Mutations")]
    #[case(675, "BRCA2", "V159M", "V159M, V159L, Variants of Unknown Significance")]
    #[case(675, "BRCA2", "R2659G", "R2659G, R2659K, R2659T")]
    #[case(675, "BRCA2", "E3002K", "E3002K, E3002D, Oncogenic Mutations")]
    #[case(675, "BRCA2", "Y3035C", "Y3035C, Y3035S")]
    #[case(675, "BRCA2", "E790*", "Truncating Mutations, Oncogenic Mutations")]
    #[case(675, "BRCA2", "E10000A", "Variants of Unknown Significance")]
    #[case(675, "BRCA2", "Deletion", "Deletion, Oncogenic Mutations")]
    #[case(6416, "MAP2K4", "Deletion", "Truncating Mutations")]
    #[case(5295, "PIK3R1", "KCTD16-PIK3R1 fusion", "KCTD16-PIK3R1 fusion, Truncating Mutations")]
    #[case(1956, "EGFR", "vIII", "vIII, Oncogenic Mutations")]
    #[case(1956, "EGFR", "vII", "vII, Oncogenic Mutations")]
    #[case(1956, "EGFR", "CTD", "C-terminal domain, Oncogenic Mutations")]
    #[case(1956, "EGFR", "C-terminal domain", "C-terminal domain, Oncogenic Mutations")]
    #[case(1956, "EGFR", "vIV", "C-terminal domain, Oncogenic Mutations")]
    #[case(1956, "EGFR", "vIVa", "C-terminal domain, Oncogenic Mutations")]
    #[case(1956, "EGFR", "vIVb", "C-terminal domain, Oncogenic Mutations")]
    #[case(1956, "EGFR", "vIVc", "C-terminal domain, Oncogenic Mutations")]
    #[case(1956, "EGFR", "KDD", "Kinase Domain Duplication, Oncogenic Mutations")]
    #[case(1956, "EGFR", "Kinase Domain Duplication", "Kinase Domain Duplication, Oncogenic Mutations")]
    fn relevant_alterations(
        #[case] entrez_gene_id: i32,
        #[case] hugo_symbol: &str,
        #[case] name: &str,
        #[case] expected: &str,
    ) -> Result<(), Error> {
        let provider = build_provider()?;
        assert_eq!(
            relevant(&provider, entrez_gene_id, hugo_symbol, name, ReferenceGenome::Grch37)?,
            expected
        );

        Ok(())
    }

    #[test_log::test]
    fn relevant_alterations_respect_reference_genome() -> Result<(), Error> {
        let provider = build_provider()?;
        assert_eq!(
            relevant(&provider, 673, "BRAF", "V600E", ReferenceGenome::Grch38)?,
            "V600E, V600A, V600D, V600G, V600K, V600L, V600M, V600Q, V600R, V600W, VK600EI, V600, \
            Oncogenic Mutations"
        );

        Ok(())
    }

    #[rstest]
    #[case(4233, "MET", "X1010_splice", ReferenceGenome::Grch37)]
    #[case(5156, "PDGFRA", "D842I", ReferenceGenome::Grch37)]
    #[case(5156, "PDGFRA", "D842_I843delinsIM", ReferenceGenome::Grch38)]
    #[case(673, "BRAF", "V600E", ReferenceGenome::Grch38)]
    #[case(675, "BRCA2", "V159M", ReferenceGenome::Grch37)]
    fn relevant_alterations_are_unique(
        #[case] entrez_gene_id: i32,
        #[case] hugo_symbol: &str,
        #[case] name: &str,
        #[case] reference_genome: ReferenceGenome,
    ) -> Result<(), Error> {
        let provider = build_provider()?;
        let gene = Gene::new(entrez_gene_id, hugo_symbol);
        let pool = provider
            .find_alterations_by_gene(&gene)?
            .into_iter()
            .collect::<IndexSet<_>>();
        let mut query = Alteration::new(Some(gene), name);
        query.reference_genomes.insert(reference_genome);
        let query = annotated(query);
        let relevant = provider.find_relevant_alterations(reference_genome, &query, &pool, true)?;

        // One entry per gene and notation, whatever genomes the entries cover.
        let keys = relevant
            .iter()
            .map(|a| {
                (
                    a.gene.as_ref().map(|g| g.entrez_gene_id),
                    a.alteration.to_lowercase(),
                )
            })
            .collect::<IndexSet<_>>();
        assert_eq!(keys.len(), relevant.len());
        assert!(relevant.iter().all(|a| pool.contains(a)));

        Ok(())
    }
}

// <LICENSE>
// Copyright 2024 altmatch Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
// </LICENSE>
