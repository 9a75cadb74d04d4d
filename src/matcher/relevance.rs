//! The relevance resolver.

use std::sync::Arc;

use indexmap::IndexSet;

use crate::{
    data::interface::{AlterationCache, AlterationProvider, GeneProvider},
    matcher::{allele, fusion, Config, Error},
    parser::{annotate_alteration, build_alteration, Alteration, AlterationQuery, Gene},
    static_data::{AlterationType, ReferenceGenome, VariantConsequence, TRUNCATING_MUTATIONS},
};

/// Resolves the curated alterations relevant to a query alteration.
///
/// The per-gene pool of curated alterations comes from the cache; the
/// knowledge base answers the relevance queries over that pool.
pub struct Resolver {
    config: Config,
    knowledge_base: Arc<dyn AlterationProvider + Send + Sync>,
    cache: Arc<dyn AlterationCache + Send + Sync>,
    genes: Arc<dyn GeneProvider + Send + Sync>,
}

impl Resolver {
    pub fn new(
        config: &Config,
        knowledge_base: Arc<dyn AlterationProvider + Send + Sync>,
        cache: Arc<dyn AlterationCache + Send + Sync>,
        genes: Arc<dyn GeneProvider + Send + Sync>,
    ) -> Self {
        Self {
            config: *config,
            knowledge_base,
            cache,
            genes,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Curated alterations of the gene, restricted to the genome if given.
    ///
    /// Populates the cache entry of the gene on first access.
    pub fn all_alterations(
        &self,
        reference_genome: Option<ReferenceGenome>,
        gene: &Gene,
    ) -> Result<IndexSet<Alteration>, Error> {
        let alterations = self.cache.alterations(gene)?;
        Ok(match reference_genome {
            Some(genome) => alterations
                .iter()
                .filter(|alteration| alteration.applies_to(genome))
                .cloned()
                .collect(),
            None => (*alterations).clone(),
        })
    }

    /// Curated alterations of every gene known to the cache.
    pub fn all_alterations_of_all_genes(&self) -> Result<IndexSet<Alteration>, Error> {
        let mut result = IndexSet::new();
        for gene in self.cache.get_all_genes()? {
            result.extend(self.all_alterations(None, &gene)?);
        }
        Ok(result)
    }

    /// The curated "Truncating Mutations" of the gene.
    pub fn truncating_mutations(&self, gene: &Gene) -> Result<Option<Alteration>, Error> {
        Ok(self
            .knowledge_base
            .find_alteration(gene, None, None, TRUNCATING_MUTATIONS)?)
    }

    /// Curated alterations relevant to the annotated `alteration`.
    pub fn relevant_alterations(
        &self,
        reference_genome: ReferenceGenome,
        alteration: &Alteration,
    ) -> Result<IndexSet<Alteration>, Error> {
        let Some(gene) = &alteration.gene else {
            return Ok(IndexSet::new());
        };
        let pool = self.all_alterations(Some(reference_genome), gene)?;
        self.alterations(
            gene,
            reference_genome,
            &alteration.alteration,
            alteration.alteration_type,
            alteration.consequence_term(),
            alteration.protein_start,
            alteration.protein_end,
            &pool,
        )
    }

    /// Curated alterations in `pool` relevant to the described alteration.
    ///
    /// A query alteration is built and annotated from the arguments; unknown
    /// consequence terms are wrapped ad hoc.  For fusions, the alterations
    /// relevant to the reversed fusion are added.
    #[allow(clippy::too_many_arguments)]
    pub fn alterations(
        &self,
        gene: &Gene,
        reference_genome: ReferenceGenome,
        alteration: &str,
        alteration_type: Option<AlterationType>,
        consequence: Option<&str>,
        protein_start: Option<i32>,
        protein_end: Option<i32>,
        pool: &IndexSet<Alteration>,
    ) -> Result<IndexSet<Alteration>, Error> {
        let mut result = IndexSet::new();
        if alteration.trim().is_empty() {
            return Ok(result);
        }

        let mut query = Alteration {
            gene: Some(gene.clone()),
            alteration_type: Some(alteration_type.unwrap_or(AlterationType::Mutation)),
            alteration: alteration.to_string(),
            consequence: consequence.map(VariantConsequence::find_or_adhoc),
            protein_start,
            protein_end,
            reference_genomes: [reference_genome].into(),
            ..Default::default()
        };
        annotate_alteration(&mut query, alteration);
        result.extend(self.knowledge_base.find_relevant_alterations(
            reference_genome,
            &query,
            pool,
            self.config.include_inferred,
        )?);

        if fusion::is_fusion(alteration) {
            if let Some(reverted) = fusion::revert_fusion(
                self.knowledge_base.as_ref(),
                Some(reference_genome),
                &query,
                Some(pool),
            )? {
                log::debug!("adding alterations relevant to reverted fusion {}", reverted);
                result.extend(self.knowledge_base.find_relevant_alterations(
                    reference_genome,
                    &reverted,
                    pool,
                    self.config.include_inferred,
                )?);
            }
        }
        Ok(result)
    }

    /// Curated alterations relevant to a textual query.
    ///
    /// # Arguments
    ///
    /// * `hugo_symbol` -- gene symbol or alias
    /// * `alteration` -- notation, an optional `p.` prefix is stripped
    /// * `alteration_type` -- e.g., `MUTATION`, defaults to `MUTATION`
    /// * `reference_genome` -- e.g., `GRCh38`, defaults to the configured genome
    ///
    /// An unknown gene yields an empty result.
    pub fn relevant_alterations_for_query(
        &self,
        hugo_symbol: &str,
        alteration: &str,
        alteration_type: Option<&str>,
        reference_genome: Option<&str>,
    ) -> Result<IndexSet<Alteration>, Error> {
        let alteration_type = alteration_type
            .map(str::parse::<AlterationType>)
            .transpose()?;
        let reference_genome = reference_genome
            .map(str::parse::<ReferenceGenome>)
            .transpose()?
            .unwrap_or(self.config.default_reference_genome);

        let query = build_alteration(
            self.genes.as_ref(),
            &AlterationQuery {
                hugo_symbol: Some(hugo_symbol),
                alteration: Some(alteration),
                alteration_type,
                reference_genome: Some(reference_genome),
                ..Default::default()
            },
        )?;
        self.relevant_alterations(reference_genome, &query)
    }

    /// Pool of the alteration's gene, empty without gene.
    fn pool_of(
        &self,
        reference_genome: ReferenceGenome,
        alteration: &Alteration,
    ) -> Result<IndexSet<Alteration>, Error> {
        match &alteration.gene {
            Some(gene) => self.all_alterations(Some(reference_genome), gene),
            None => Ok(IndexSet::new()),
        }
    }

    /// See [`allele::find_matched_alterations`].
    pub fn find_matched_alterations(
        &self,
        reference_genome: ReferenceGenome,
        alteration: &Alteration,
    ) -> Result<IndexSet<Alteration>, Error> {
        let pool = self.pool_of(reference_genome, alteration)?;
        Ok(allele::find_matched_alterations(
            self.knowledge_base.as_ref(),
            Some(reference_genome),
            alteration,
            &pool,
        )?)
    }

    /// See [`allele::allele_alterations`].
    pub fn allele_alterations(
        &self,
        reference_genome: ReferenceGenome,
        alteration: &Alteration,
    ) -> Result<Vec<Alteration>, Error> {
        let pool = self.pool_of(reference_genome, alteration)?;
        Ok(allele::allele_alterations(
            self.knowledge_base.as_ref(),
            Some(reference_genome),
            alteration,
            &pool,
        )?)
    }

    /// See [`allele::positioned_alterations`].
    pub fn positioned_alterations(
        &self,
        reference_genome: ReferenceGenome,
        alteration: &Alteration,
    ) -> Result<Vec<Alteration>, Error> {
        let pool = self.pool_of(reference_genome, alteration)?;
        Ok(allele::positioned_alterations(
            self.knowledge_base.as_ref(),
            Some(reference_genome),
            alteration,
            &pool,
        )?)
    }

    /// See [`allele::remove_alternative_allele`].
    pub fn remove_alternative_allele(
        &self,
        reference_genome: ReferenceGenome,
        alteration: &Alteration,
        relevant: &mut IndexSet<Alteration>,
    ) -> Result<(), Error> {
        Ok(allele::remove_alternative_allele(
            self.knowledge_base.as_ref(),
            Some(reference_genome),
            alteration,
            relevant,
        )?)
    }

    /// The curated alteration named like the reversed fusion, looked up in
    /// the gene's pool.
    pub fn revert_fusion(
        &self,
        reference_genome: ReferenceGenome,
        alteration: &Alteration,
    ) -> Result<Option<Alteration>, Error> {
        let pool = self.pool_of(reference_genome, alteration)?;
        Ok(fusion::revert_fusion(
            self.knowledge_base.as_ref(),
            Some(reference_genome),
            alteration,
            Some(&pool),
        )?)
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
