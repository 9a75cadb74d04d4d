/// Strip a leading `p.` from a protein change.
pub(crate) fn strip_protein_prefix(protein_change: &str) -> &str {
    protein_change.strip_prefix("p.").unwrap_or(protein_change)
}

/// Case-insensitive substring test.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive suffix test.
pub(crate) fn ends_with_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().ends_with(&needle.to_lowercase())
}

/// Return the character at `index` as a one-character string.
pub(crate) fn char_at(value: &str, index: usize) -> Option<String> {
    value.chars().nth(index).map(|c| c.to_string())
}
