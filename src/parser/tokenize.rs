//! Splitting of free-text mutation fields into unannotated alterations.
//!
//! A field such as `"grch38:V600E/K, X33_splice [X33 splice] (see notes)"`
//! yields one alteration per variant.  Unparseable tokens are passed through
//! as literal alteration strings.

use std::collections::BTreeSet;

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_until},
    character::complete::{char, multispace0},
    combinator::value,
    sequence::{delimited, pair, terminated},
    IResult, Parser,
};
use regex::Regex;

use crate::{parser::ds::Alteration, static_data::ReferenceGenome, utils::strip_protein_prefix};

lazy_static::lazy_static! {
    static ref COMMENT: Regex =
        Regex::new(r"\([^)]+\)").expect("should not happen; invalid comment regex");
    static ref MULTI_ALLELE: Regex = Regex::new(r"(?i)^([A-Z][0-9]+)([^0-9/]+/.+)$")
        .expect("should not happen; invalid multi-allele regex");
}

/// Leading reference genome tag, e.g., `grch37:` or `GRCh38: `.
pub fn reference_genome_tag(input: &str) -> IResult<&str, ReferenceGenome> {
    terminated(
        alt((
            value(ReferenceGenome::Grch37, tag_no_case("grch37")),
            value(ReferenceGenome::Grch38, tag_no_case("grch38")),
        )),
        pair(char(':'), multispace0),
    )
    .parse(input)
}

/// Notation followed by a bracketed display name, e.g., `V600E[V600E Missense]`.
pub fn display_name(input: &str) -> IResult<&str, (&str, &str)> {
    pair(
        take_until("["),
        delimited(char('['), take_until("]"), char(']')),
    )
    .parse(input)
}

/// Split at commas that are not enclosed in square brackets.
fn split_outside_brackets(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut begin = 0;
    for (i, c) in input.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&input[begin..i]);
                begin = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[begin..]);
    parts
}

fn stub(alteration: &str, name: &str, reference_genomes: &BTreeSet<ReferenceGenome>) -> Alteration {
    Alteration {
        alteration: alteration.to_string(),
        name: name.to_string(),
        reference_genomes: reference_genomes.clone(),
        ..Default::default()
    }
}

/// Tokenize a mutation field into unannotated alterations.
///
/// Parenthesized comments are removed first.  Each comma-separated token may
/// carry a reference genome tag (otherwise both genomes apply) and a
/// bracketed display name.  The shorthand `V600E/K`, with or without `p.`,
/// expands to one alteration per variant residue.  Empty tokens are skipped.
pub fn parse_mutation_string(mutation_str: &str) -> Vec<Alteration> {
    let without_comments = COMMENT.replace_all(mutation_str, "");

    let mut result = Vec::new();
    for part in split_outside_brackets(&without_comments) {
        let part = part.trim();

        let (part, reference_genomes) = match reference_genome_tag(part) {
            Ok((rest, reference_genome)) => {
                log::trace!("token {:?} tagged with {}", part, reference_genome);
                (rest.trim(), BTreeSet::from([reference_genome]))
            }
            Err(_) => (part, ReferenceGenome::all()),
        };

        let (protein_change, name) = match display_name(part) {
            Ok((_, (notation, name))) => (notation.trim(), name.trim()),
            Err(_) => (part, part),
        };
        if protein_change.is_empty() {
            continue;
        }

        if let Some(caps) = MULTI_ALLELE.captures(strip_protein_prefix(protein_change)) {
            let prefix = &caps[1];
            for variant in caps[2].split('/').filter(|v| !v.is_empty()) {
                let allele = format!("{prefix}{variant}");
                result.push(stub(&allele, &allele, &reference_genomes));
            }
        } else {
            result.push(stub(protein_change, name, &reference_genomes));
        }
    }
    result
}
