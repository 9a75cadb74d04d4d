//! Per-gene cache of curated alterations.

use std::sync::Arc;

use indexmap::IndexSet;
use quick_cache::sync::Cache;
use serde::{Deserialize, Serialize};

use crate::{
    data::{
        error::Error,
        interface::{AlterationCache, AlterationProvider, EvidenceProvider, EvidenceType, GeneProvider},
    },
    parser::{Alteration, Gene},
};

/// Configuration for the `GeneAlterationCache`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of genes to keep.
    pub capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

type AlterationSet = Arc<IndexSet<Alteration>>;

/// Cache of curated alterations and VUS keyed by Entrez gene ID.
///
/// Entries are computed from the knowledge base on first access.  Each entry
/// is computed under a per-key guard so that concurrent readers of the same
/// gene either wait for or observe the complete set.
pub struct GeneAlterationCache {
    alterations: Cache<i32, AlterationSet>,
    vus: Cache<i32, AlterationSet>,
    genes: Arc<dyn GeneProvider + Send + Sync>,
    alteration_provider: Arc<dyn AlterationProvider + Send + Sync>,
    evidence_provider: Arc<dyn EvidenceProvider + Send + Sync>,
}

impl GeneAlterationCache {
    pub fn new(
        config: Config,
        genes: Arc<dyn GeneProvider + Send + Sync>,
        alteration_provider: Arc<dyn AlterationProvider + Send + Sync>,
        evidence_provider: Arc<dyn EvidenceProvider + Send + Sync>,
    ) -> Self {
        Self {
            alterations: Cache::new(config.capacity),
            vus: Cache::new(config.capacity),
            genes,
            alteration_provider,
            evidence_provider,
        }
    }

    fn load_alterations(&self, gene: &Gene) -> Result<AlterationSet, Error> {
        let alterations = self
            .alteration_provider
            .find_alterations_by_gene(gene)?
            .into_iter()
            .collect::<IndexSet<_>>();
        log::debug!("cached {} alterations of {}", alterations.len(), gene);
        Ok(Arc::new(alterations))
    }

    fn load_vus(&self, entrez_gene_id: i32) -> Result<AlterationSet, Error> {
        let Some(gene) = self
            .genes
            .all_genes()?
            .into_iter()
            .find(|gene| gene.entrez_gene_id == entrez_gene_id)
        else {
            return Ok(Arc::default());
        };
        let vus = self
            .evidence_provider
            .find_evidences_by_gene(&gene)?
            .into_iter()
            .filter(|evidence| evidence.evidence_type == EvidenceType::Vus)
            .flat_map(|evidence| evidence.alterations)
            .collect::<IndexSet<_>>();
        Ok(Arc::new(vus))
    }
}

impl AlterationCache for GeneAlterationCache {
    fn contains_alterations(&self, entrez_gene_id: i32) -> bool {
        self.alterations.get(&entrez_gene_id).is_some()
    }

    fn set_alterations(&self, gene: &Gene) -> Result<(), Error> {
        let alterations = self.load_alterations(gene)?;
        self.alterations.insert(gene.entrez_gene_id, alterations);
        Ok(())
    }

    fn get_alterations(&self, entrez_gene_id: i32) -> Option<Arc<IndexSet<Alteration>>> {
        self.alterations.get(&entrez_gene_id)
    }

    fn alterations(&self, gene: &Gene) -> Result<Arc<IndexSet<Alteration>>, Error> {
        self.alterations
            .get_or_insert_with(&gene.entrez_gene_id, || self.load_alterations(gene))
    }

    fn get_vus(&self, entrez_gene_id: i32) -> Result<Arc<IndexSet<Alteration>>, Error> {
        self.vus
            .get_or_insert_with(&entrez_gene_id, || self.load_vus(entrez_gene_id))
    }

    fn get_all_genes(&self) -> Result<Vec<Gene>, Error> {
        self.genes.all_genes()
    }
}
