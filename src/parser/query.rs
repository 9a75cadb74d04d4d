//! Construction of annotated query alterations.

use crate::{
    data::{
        error::Error,
        interface::{CoordinateAnnotator, GeneProvider, GenomicQueryType},
    },
    parser::{classify::annotate_alteration, ds::Alteration},
    static_data::{AlterationType, ReferenceGenome, VariantConsequence, DEFAULT_REFERENCE_GENOME},
    utils::strip_protein_prefix,
};

/// Strip a leading `p.` from an alteration name.
pub fn trim_alteration_name(alteration: &str) -> &str {
    strip_protein_prefix(alteration)
}

/// Parameters of a query alteration, see [`build_alteration`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlterationQuery<'a> {
    pub hugo_symbol: Option<&'a str>,
    pub alteration: Option<&'a str>,
    /// Defaults to `MUTATION`.
    pub alteration_type: Option<AlterationType>,
    pub consequence: Option<&'a str>,
    pub protein_start: Option<i32>,
    /// Defaults to `protein_start`.
    pub protein_end: Option<i32>,
    /// Defaults to the default reference genome.
    pub reference_genome: Option<ReferenceGenome>,
}

/// Build and annotate a query alteration.
///
/// The gene is looked up in the gene directory; an unknown symbol leaves the
/// alteration without gene.  Unknown consequence terms are wrapped ad hoc.
pub fn build_alteration(
    genes: &dyn GeneProvider,
    query: &AlterationQuery,
) -> Result<Alteration, Error> {
    let gene = match query.hugo_symbol {
        Some(hugo_symbol) => genes.gene_by_symbol(hugo_symbol)?,
        None => None,
    };
    if gene.is_none() {
        log::debug!("no gene for query {:?}", query.hugo_symbol);
    }

    let mut alteration = Alteration {
        gene,
        alteration_type: Some(query.alteration_type.unwrap_or(AlterationType::Mutation)),
        alteration: query
            .alteration
            .map(|a| trim_alteration_name(a).to_string())
            .unwrap_or_default(),
        consequence: query.consequence.map(VariantConsequence::find_or_adhoc),
        protein_start: query.protein_start,
        protein_end: query.protein_end.or(query.protein_start),
        ..Default::default()
    };
    alteration
        .reference_genomes
        .insert(query.reference_genome.unwrap_or(DEFAULT_REFERENCE_GENOME));

    let protein_change = alteration.alteration.clone();
    annotate_alteration(&mut alteration, &protein_change);
    Ok(alteration)
}

/// Build an unannotated alteration from a genomic query.
///
/// Returns an empty alteration if the query is blank, the annotator reports
/// no transcript consequence, or its gene is not in the gene directory.
pub fn alteration_from_genomic_query(
    annotator: &dyn CoordinateAnnotator,
    genes: &dyn GeneProvider,
    query_type: GenomicQueryType,
    query: &str,
    reference_genome: ReferenceGenome,
) -> Result<Alteration, Error> {
    if query.trim().is_empty() {
        return Ok(Alteration::default());
    }
    let Some(summary) = annotator.transcript_consequence(query_type, query, reference_genome)?
    else {
        log::debug!("no transcript consequence for {:?} on {}", query, reference_genome);
        return Ok(Alteration::default());
    };
    let Some(gene) = genes.gene_by_symbol(&summary.hugo_gene_symbol)? else {
        log::debug!("gene {} of {:?} is not known", summary.hugo_gene_symbol, query);
        return Ok(Alteration::default());
    };

    // Curated alterations are named without the `p.` of the short HGVS.p.
    let mut alteration = Alteration::new(
        Some(gene),
        trim_alteration_name(summary.hgvsp_short.as_deref().unwrap_or("")),
    );
    if let Some(position) = summary.protein_position {
        if position.start.is_some() {
            alteration.protein_start = position.start;
        }
        alteration.protein_end = position.end;
    }
    alteration.consequence = summary
        .consequence_terms
        .as_deref()
        .filter(|terms| !terms.is_empty())
        .and_then(VariantConsequence::find_by_term)
        .cloned();
    Ok(alteration)
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use anyhow::Error;
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::{alteration_from_genomic_query, build_alteration, trim_alteration_name, AlterationQuery};
    use crate::{
        data::{
            self,
            interface::{
                CoordinateAnnotator, GeneProvider, GenomicQueryType, ProteinPosition,
                TranscriptConsequenceSummary,
            },
        },
        parser::{annotated, Gene},
        static_data::{AlterationType, ReferenceGenome, MISSENSE_VARIANT},
    };

    struct Genes;

    impl GeneProvider for Genes {
        fn gene_by_symbol(&self, hugo_symbol: &str) -> Result<Option<Gene>, data::Error> {
            Ok(match hugo_symbol {
                "BRAF" => Some(Gene::new(673, "BRAF")),
                _ => None,
            })
        }

        fn all_genes(&self) -> Result<Vec<Gene>, data::Error> {
            Ok(vec![Gene::new(673, "BRAF")])
        }
    }

    struct Annotator;

    impl CoordinateAnnotator for Annotator {
        fn transcript_consequence(
            &self,
            _query_type: GenomicQueryType,
            query: &str,
            _reference_genome: ReferenceGenome,
        ) -> Result<Option<TranscriptConsequenceSummary>, data::Error> {
            match query {
                "7:g.140453136A>T" => Ok(Some(TranscriptConsequenceSummary {
                    hugo_gene_symbol: "BRAF".to_string(),
                    hgvsp_short: Some("p.V600E".to_string()),
                    protein_position: Some(ProteinPosition {
                        start: Some(600),
                        end: Some(600),
                    }),
                    consequence_terms: Some(MISSENSE_VARIANT.to_string()),
                })),
                "1:g.1A>T" => Ok(Some(TranscriptConsequenceSummary {
                    hugo_gene_symbol: "UNKNOWN".to_string(),
                    hgvsp_short: None,
                    protein_position: None,
                    consequence_terms: None,
                })),
                "timeout" => Err(data::Error::RemoteAnnotation("timeout".to_string())),
                _ => Ok(None),
            }
        }
    }

    #[test]
    fn trim() {
        assert_eq!(trim_alteration_name("p.V600E"), "V600E");
        assert_eq!(trim_alteration_name("V600E"), "V600E");
    }

    #[test]
    fn build() -> Result<(), Error> {
        let alt = build_alteration(
            &Genes,
            &AlterationQuery {
                hugo_symbol: Some("BRAF"),
                alteration: Some("p.V600E"),
                ..Default::default()
            },
        )?;
        assert_eq!(alt.hugo_symbol(), Some("BRAF"));
        assert_eq!(alt.alteration, "V600E");
        assert_eq!(alt.alteration_type, Some(AlterationType::Mutation));
        assert_eq!(alt.consequence_term(), Some(MISSENSE_VARIANT));
        assert_eq!((alt.protein_start, alt.protein_end), (Some(600), Some(600)));
        assert_eq!(alt.reference_genomes, BTreeSet::from([ReferenceGenome::Grch37]));

        Ok(())
    }

    #[test]
    fn build_with_explicit_fields() -> Result<(), Error> {
        let alt = build_alteration(
            &Genes,
            &AlterationQuery {
                hugo_symbol: Some("NOPE"),
                alteration: Some("Fusions"),
                alteration_type: Some(AlterationType::StructuralVariant),
                consequence: Some("some_new_term"),
                protein_start: Some(10),
                reference_genome: Some(ReferenceGenome::Grch38),
                ..Default::default()
            },
        )?;
        assert_eq!(alt.gene, None);
        assert_eq!(alt.consequence_term(), Some("some_new_term"));
        assert_eq!((alt.protein_start, alt.protein_end), (Some(10), Some(10)));
        assert_eq!(alt.reference_genomes, BTreeSet::from([ReferenceGenome::Grch38]));

        Ok(())
    }

    #[test]
    fn from_genomic_query() -> Result<(), Error> {
        let alt = alteration_from_genomic_query(
            &Annotator,
            &Genes,
            GenomicQueryType::Hgvsg,
            "7:g.140453136A>T",
            ReferenceGenome::Grch37,
        )?;
        assert_eq!(alt.hugo_symbol(), Some("BRAF"));
        assert_eq!(alt.alteration, "V600E");
        assert_eq!((alt.protein_start, alt.protein_end), (Some(600), Some(600)));
        assert_eq!(alt.consequence_term(), Some(MISSENSE_VARIANT));
        assert_eq!(alt.alteration_type, None);

        Ok(())
    }

    #[test]
    fn genomic_query_name_drops_protein_prefix() -> Result<(), Error> {
        let alt = alteration_from_genomic_query(
            &Annotator,
            &Genes,
            GenomicQueryType::Hgvsg,
            "7:g.140453136A>T",
            ReferenceGenome::Grch37,
        )?;
        assert!(!alt.alteration.starts_with("p."));

        let alt = annotated(alt);
        assert_eq!(alt.alteration, "V600E");
        assert_eq!(alt.ref_residues.as_deref(), Some("V"));
        assert_eq!(alt.variant_residues.as_deref(), Some("E"));

        Ok(())
    }

    #[test]
    fn from_genomic_query_not_found() -> Result<(), Error> {
        for query in ["", "  ", "1:g.1A>T", "2:g.2C>G"] {
            let alt = alteration_from_genomic_query(
                &Annotator,
                &Genes,
                GenomicQueryType::Hgvsg,
                query,
                ReferenceGenome::Grch37,
            )?;
            assert_eq!(alt.gene, None, "{query}");
            assert_eq!(alt.alteration, "", "{query}");
        }

        Ok(())
    }

    #[test]
    fn from_genomic_query_propagates_failure() {
        let result = alteration_from_genomic_query(
            &Annotator,
            &Genes,
            GenomicQueryType::GenomicLocation,
            "timeout",
            ReferenceGenome::Grch38,
        );
        assert!(matches!(result, Err(data::Error::RemoteAnnotation(_))));
    }
}
