//! Classification of protein changes into molecular consequences.
//!
//! The rules are tried in a fixed order and the first match wins.  Several
//! patterns overlap textually (e.g., `V600del` vs. `600_601del`), so the
//! order must not change.

use regex::{Captures, Regex};

use crate::{
    parser::ds::Alteration,
    static_data::{
        VariantConsequence, AMPLIFICATION, ANY, DEFAULT_REFERENCE_GENOME,
        DELETION, FEATURE_TRUNCATION, FRAMESHIFT_VARIANT, INFRAME_DELETION, INFRAME_INSERTION,
        MISSENSE_VARIANT, NA, POSITION_END_BOUNDARY, POSITION_START_BOUNDARY, PROMOTER,
        SPLICE_REGION_VARIANT, START_LOST, STOP_GAINED, STOP_LOST, SYNONYMOUS_VARIANT,
        UPSTREAM_GENE_VARIANT,
    },
    utils::strip_protein_prefix,
};

/// Result of classifying a protein change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Consequence term, `NA` if no rule matched.
    pub consequence: &'static str,
    pub ref_residues: Option<String>,
    pub variant_residues: Option<String>,
    pub protein_start: i32,
    pub protein_end: i32,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            consequence: NA,
            ref_residues: None,
            variant_residues: None,
            protein_start: POSITION_START_BOUNDARY,
            protein_end: POSITION_END_BOUNDARY,
        }
    }
}

/// A pattern together with the function interpreting its captures.
struct Rule {
    pattern: Regex,
    classify: fn(&Captures) -> Option<Classification>,
}

impl Rule {
    fn new(pattern: &str, classify: fn(&Captures) -> Option<Classification>) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("should not happen; invalid classifier regex"),
            classify,
        }
    }
}

lazy_static::lazy_static! {
    /// Classifier rules in order of precedence.
    static ref RULES: Vec<Rule> = vec![
        // V600E, R304*, VK600EI, Y1, V600
        Rule::new(r"^([A-Z*]+)([0-9]+)([A-Z*?]*)$", substitution),
        // 746_750delinsQP, A767_V769insASV
        Rule::new(r"^[A-Z]?([0-9]+)(_[A-Z]?([0-9]+))?(delins|ins)([A-Z]+)$", range_indel),
        // X33_splice, 963_1010splice
        Rule::new(r"^[A-Z]?([0-9]+)(_[A-Z]?([0-9]+))?(_)?splice$", range_splice),
        // 34_68mis, T2375_K2555trunc
        Rule::new(r"^[A-Z]?([0-9]+)_[A-Z]?([0-9]+)(.+)$", range_code),
        // Q2405Rfs*17
        Rule::new(r"^([A-Z*])([0-9]+)[A-Z]?fs.*$", frameshift),
        // E746del, 1010dup
        Rule::new(r"^([A-Z]+)?([0-9]+)(ins|del|dup)$", bare_indel),
    ];

    static ref TRUNCATING_MUTATIONS: Regex =
        Regex::new(r"^truncating mutations?$").expect("should not happen; invalid regex");
}

fn position(caps: &Captures, group: usize) -> Option<i32> {
    caps.get(group)?.as_str().parse::<i32>().ok()
}

/// Start and optional end of a `<pos>[_<pos>]` range; end defaults to start.
///
/// A reversed range, e.g., `600_500del`, is returned in ascending order.
fn range(caps: &Captures, start_group: usize, end_group: usize) -> Option<(i32, i32)> {
    let start = position(caps, start_group)?;
    let end = match caps.get(end_group) {
        Some(_) => position(caps, end_group)?,
        None => start,
    };
    Some((start.min(end), start.max(end)))
}

fn substitution(caps: &Captures) -> Option<Classification> {
    let reference = caps[1].to_string();
    let variant = caps[3].to_string();
    let start = position(caps, 2)?;
    let mut end = start;

    let ref_len = reference.chars().count() as i32;
    let var_len = variant.chars().count() as i32;

    let consequence = if reference == variant {
        SYNONYMOUS_VARIANT
    } else if reference == "*" {
        STOP_LOST
    } else if variant == "*" {
        STOP_GAINED
    } else if start == 1 {
        START_LOST
    } else if variant == "?" {
        ANY
    } else {
        end = start.checked_add(ref_len - 1)?;
        if ref_len > 1 || var_len > 1 {
            match ref_len.cmp(&var_len) {
                std::cmp::Ordering::Greater => INFRAME_DELETION,
                std::cmp::Ordering::Less => INFRAME_INSERTION,
                std::cmp::Ordering::Equal => MISSENSE_VARIANT,
            }
        } else if ref_len == 1 && var_len == 1 {
            MISSENSE_VARIANT
        } else {
            NA
        }
    };

    Some(Classification {
        consequence,
        ref_residues: Some(reference),
        variant_residues: Some(variant),
        protein_start: start,
        protein_end: end,
    })
}

fn range_indel(caps: &Captures) -> Option<Classification> {
    let (start, end) = range(caps, 1, 3)?;
    let consequence = if &caps[4] == "ins" {
        INFRAME_INSERTION
    } else {
        let deleted = end.checked_sub(start)?.checked_add(1)?;
        let inserted = caps[5].chars().count() as i32;
        match inserted.cmp(&deleted) {
            std::cmp::Ordering::Greater => INFRAME_INSERTION,
            std::cmp::Ordering::Equal => MISSENSE_VARIANT,
            std::cmp::Ordering::Less => INFRAME_DELETION,
        }
    };
    Some(Classification {
        consequence,
        protein_start: start,
        protein_end: end,
        ..Default::default()
    })
}

fn range_splice(caps: &Captures) -> Option<Classification> {
    let (start, end) = range(caps, 1, 3)?;
    Some(Classification {
        consequence: SPLICE_REGION_VARIANT,
        protein_start: start,
        protein_end: end,
        ..Default::default()
    })
}

fn range_code(caps: &Captures) -> Option<Classification> {
    let (start, end) = range(caps, 1, 2)?;
    // Unknown codes keep the range but stay unclassified.
    let consequence = match &caps[3] {
        "mis" => MISSENSE_VARIANT,
        "ins" | "dup" => INFRAME_INSERTION,
        "del" => INFRAME_DELETION,
        "fs" => FRAMESHIFT_VARIANT,
        "trunc" => FEATURE_TRUNCATION,
        "mut" => ANY,
        _ => NA,
    };
    Some(Classification {
        consequence,
        protein_start: start,
        protein_end: end,
        ..Default::default()
    })
}

fn frameshift(caps: &Captures) -> Option<Classification> {
    let start = position(caps, 2)?;
    Some(Classification {
        consequence: FRAMESHIFT_VARIANT,
        ref_residues: Some(caps[1].to_string()),
        protein_start: start,
        protein_end: start,
        ..Default::default()
    })
}

fn bare_indel(caps: &Captures) -> Option<Classification> {
    let start = position(caps, 2)?;
    let consequence = match &caps[3] {
        "del" => INFRAME_DELETION,
        _ => INFRAME_INSERTION,
    };
    Some(Classification {
        consequence,
        ref_residues: caps.get(1).map(|m| m.as_str().to_string()),
        protein_start: start,
        protein_end: start,
        ..Default::default()
    })
}

/// Normalize a protein change before classification: drop a leading `p.`,
/// everything from the first `[` on, and surrounding whitespace.
pub fn clean_protein_change(protein_change: &str) -> &str {
    let protein_change = strip_protein_prefix(protein_change);
    let protein_change = match protein_change.find('[') {
        Some(idx) => &protein_change[..idx],
        None => protein_change,
    };
    protein_change.trim()
}

/// Classify a cleaned protein change.
///
/// Unmatched input yields `NA` with sentinel positions; a literal
/// "truncating mutation(s)" always yields `feature_truncation`.
pub fn classify(protein_change: &str) -> Classification {
    let mut result = RULES
        .iter()
        .find_map(|rule| rule.pattern.captures(protein_change).map(|caps| (rule, caps)))
        .and_then(|(rule, caps)| (rule.classify)(&caps))
        .unwrap_or_default();

    if TRUNCATING_MUTATIONS.is_match(&protein_change.to_lowercase()) {
        result.consequence = FEATURE_TRUNCATION;
    }

    log::trace!("classified {:?} as {:?}", protein_change, result);
    result
}

/// Whether two consequences are interchangeable for matching.
///
/// Splice-site terms are related to each other; everything else only to
/// itself.  Two absent consequences are related.
pub fn consequence_related(
    consequence: Option<&VariantConsequence>,
    compare_to: Option<&VariantConsequence>,
) -> bool {
    match (consequence, compare_to) {
        (Some(consequence), Some(compare_to)) => {
            if consequence.is_splice_site() {
                compare_to.is_splice_site()
            } else {
                consequence == compare_to
            }
        }
        (None, None) => true,
        _ => false,
    }
}

/// Annotate an alteration from its protein change.
///
/// Residues and positions are only filled in where the alteration does not
/// carry them yet; a sentinel position is replaced by a concrete one.  A
/// pre-set consequence wins over the classified one unless it is `any`, or
/// `missense_variant` on a positioned alteration.
pub fn annotate_alteration(alteration: &mut Alteration, protein_change: &str) {
    let protein_change = clean_protein_change(protein_change);
    let classification = classify(protein_change);
    let variant_consequence = VariantConsequence::find_or_adhoc(classification.consequence);

    if alteration.ref_residues.is_none() {
        alteration.ref_residues = classification.ref_residues.filter(|r| !r.is_empty());
    }
    if alteration.variant_residues.is_none() {
        alteration.variant_residues = classification.variant_residues.filter(|v| !v.is_empty());
    }

    let start = classification.protein_start;
    match alteration.protein_start {
        None => alteration.protein_start = Some(start),
        Some(POSITION_START_BOUNDARY) if start != POSITION_START_BOUNDARY => {
            alteration.protein_start = Some(start)
        }
        _ => {}
    }
    let end = classification.protein_end;
    match alteration.protein_end {
        None => alteration.protein_end = Some(end),
        Some(POSITION_END_BOUNDARY) if end != POSITION_END_BOUNDARY => {
            alteration.protein_end = Some(end)
        }
        _ => {}
    }

    let replace_consequence = match &alteration.consequence {
        None => true,
        Some(existing) if !consequence_related(Some(existing), Some(&variant_consequence)) => {
            existing.term == ANY
                || (alteration.is_positioned() && existing.term == MISSENSE_VARIANT)
        }
        Some(_) => false,
    };
    if replace_consequence {
        alteration.consequence = Some(variant_consequence);
    }

    if alteration.alteration.is_empty() {
        alteration.alteration = protein_change.to_string();
    }
    if alteration.alteration.is_empty() {
        if alteration.has_consequence(SPLICE_REGION_VARIANT) {
            alteration.alteration = "splice mutation".to_string();
        } else if alteration.has_consequence(UPSTREAM_GENE_VARIANT) {
            alteration.alteration = PROMOTER.to_string();
        }
    } else {
        match alteration.alteration.to_lowercase().as_str() {
            "gain" => alteration.alteration = AMPLIFICATION.to_string(),
            "loss" => alteration.alteration = DELETION.to_string(),
            _ => {}
        }
    }

    if alteration.name.is_empty() && !alteration.alteration.is_empty() {
        alteration.name = if alteration.is_positioned() {
            format!("{} Missense Mutations", alteration.alteration)
        } else {
            alteration.alteration.clone()
        };
    }

    if alteration.reference_genomes.is_empty() {
        alteration.reference_genomes.insert(DEFAULT_REFERENCE_GENOME);
    }
}

/// Annotate a copy of the given alteration with its own alteration string.
pub fn annotated(mut alteration: Alteration) -> Alteration {
    let protein_change = alteration.alteration.clone();
    annotate_alteration(&mut alteration, &protein_change);
    alteration
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
